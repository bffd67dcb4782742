//! Opaque secret generation for lead-derived accounts.
//!
//! Accounts provisioned from leads get a password the user never sees; the
//! plaintext exists only long enough to be hashed. The generated secret
//! always satisfies the self-service complexity rules (letters and digits,
//! length well above the minimum), so lead-derived accounts are never weaker
//! than self-registered ones.

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Length of generated opaque secrets.
const OPAQUE_SECRET_LEN: usize = 24;

/// Generate a random secret for an account whose owner will never log in
/// with it directly.
///
/// The caller is expected to hash the result immediately and drop the
/// plaintext.
#[must_use]
pub fn generate_opaque_secret() -> String {
    let mut rng = thread_rng();
    loop {
        let candidate: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(OPAQUE_SECRET_LEN)
            .map(char::from)
            .collect();

        // Alphanumeric sampling can, rarely, omit a character class.
        let has_letter = candidate.chars().any(|c| c.is_ascii_alphabetic());
        let has_digit = candidate.chars().any(|c| c.is_ascii_digit());
        if has_letter && has_digit {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_has_expected_length() {
        assert_eq!(generate_opaque_secret().len(), OPAQUE_SECRET_LEN);
    }

    #[test]
    fn test_secret_contains_letters_and_digits() {
        let secret = generate_opaque_secret();
        assert!(secret.chars().any(|c| c.is_ascii_alphabetic()));
        assert!(secret.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_secrets_are_unique() {
        assert_ne!(generate_opaque_secret(), generate_opaque_secret());
    }
}

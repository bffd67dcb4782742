//! Password hashing with Argon2id.
//!
//! The hash is a one-way function from the caller's point of view; nothing in
//! the provisioning subsystem ever needs the plaintext back.

use crate::error::AuthError;
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Password hasher configuration.
///
/// Uses OWASP-recommended Argon2id parameters:
/// - Memory: 19456 KiB (19 MiB)
/// - Iterations: 2
/// - Parallelism: 1
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher {
    /// Create a new password hasher with the recommended parameters.
    ///
    /// These are hardcoded constants that are always valid; failure would
    /// indicate a bug in the Argon2 library rather than a runtime condition.
    #[must_use]
    pub fn new() -> Self {
        let params = Params::new(
            19456, // m_cost: memory in KiB
            2,     // t_cost: iterations
            1,     // p_cost: parallelism
            None,  // output_len: default (32 bytes)
        )
        .expect("recommended Argon2 parameters are valid constants");

        Self { params }
    }

    /// Create a password hasher with custom parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are rejected by Argon2.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::HashingFailed(format!("Invalid parameters: {e}")))?;

        Ok(Self { params })
    }

    /// Hash a password using Argon2id.
    ///
    /// Returns a PHC-formatted hash string.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::HashingFailed` if hashing fails.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingFailed(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verify a password against a stored hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidHashFormat` if the stored hash cannot be
    /// parsed.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidHashFormat)?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(_) => Ok(false),
        }
    }
}

/// Hash a password with the default `PasswordHasher`.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    PasswordHasher::new().hash(password)
}

/// Verify a password against an Argon2id hash with the default hasher.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    PasswordHasher::new().verify(password, hash)
}

//! Signed access-token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with a service-wide secret configured at
//! startup. The rest of the platform treats the token as an opaque signed
//! credential; only the claims shape in [`crate::claims`] is contractual.

use crate::claims::AccessClaims;
use crate::error::AuthError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Issues and verifies Tutoria access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Create an issuer from the configured signing secret.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Sign the claims into a compact JWT.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SigningFailed` if encoding fails.
    pub fn issue(&self, claims: &AccessClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::SigningFailed(e.to_string()))
    }

    /// Decode and validate a token, returning its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the signature or timing claims
    /// fail validation.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 60; // clock skew tolerance in seconds

        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tutoria_core::{Role, UserId};

    #[test]
    fn test_issue_and_verify_round_trip() {
        let issuer = TokenIssuer::new(b"test-secret");
        let claims = AccessClaims::new(UserId::new(), Role::Student, "Jane", Duration::hours(1));

        let token = issuer.issue(&claims).unwrap();
        let decoded = issuer.verify(&token).unwrap();

        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let issuer = TokenIssuer::new(b"secret-a");
        let other = TokenIssuer::new(b"secret-b");
        let claims = AccessClaims::new(UserId::new(), Role::Tutor, "T", Duration::hours(1));

        let token = issuer.issue(&claims).unwrap();
        let result = other.verify(&token);

        assert!(matches!(result.unwrap_err(), AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let issuer = TokenIssuer::new(b"secret");
        assert!(issuer.verify("not.a.jwt").is_err());
    }
}

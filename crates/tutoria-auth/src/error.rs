//! Error types for credential operations.

use thiserror::Error;

/// Errors produced by hashing and token primitives.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// A stored hash could not be parsed as a PHC string.
    #[error("Invalid password hash format")]
    InvalidHashFormat,

    /// Token signing failed.
    #[error("Token signing failed: {0}")]
    SigningFailed(String),

    /// A presented token failed validation.
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl AuthError {
    /// Check if this error indicates a malformed stored hash.
    #[must_use]
    pub fn is_invalid_hash_format(&self) -> bool {
        matches!(self, AuthError::InvalidHashFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::HashingFailed("out of memory".to_string());
        assert_eq!(err.to_string(), "Password hashing failed: out of memory");
        assert!(AuthError::InvalidHashFormat.is_invalid_hash_format());
    }
}

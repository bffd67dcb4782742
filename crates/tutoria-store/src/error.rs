//! Error types for the store adapter.
//!
//! Failures reported by the store arrive in two shapes: an HTTP error status
//! whose body carries `{code, message}`, or a `200` whose payload is the
//! tagged `{"status":"error", ...}` object returned by the atomic RPCs. Both
//! funnel through [`StoreError::from_rpc_failure`] so the classification is
//! identical regardless of which path a failure took.

use thiserror::Error;

/// Store error code: the requested function is not in the schema cache yet.
pub const SCHEMA_CACHE_FUNCTION_MISSING: &str = "PGRST202";

/// Store error code: a referenced column is not in the schema cache yet.
pub const SCHEMA_CACHE_COLUMN_MISSING: &str = "PGRST204";

/// Error codes recognized universally as transient schema-cache staleness.
pub const TRANSIENT_SCHEMA_CODES: [&str; 2] =
    [SCHEMA_CACHE_FUNCTION_MISSING, SCHEMA_CACHE_COLUMN_MISSING];

/// Errors produced by the store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The HTTP request itself failed (connect, timeout, TLS).
    #[error("Store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered but the payload was not the expected shape.
    #[error("Unexpected store response (status {status}): {body}")]
    UnexpectedResponse {
        /// HTTP status of the response.
        status: u16,
        /// Truncated response body for diagnostics.
        body: String,
    },

    /// The store's schema cache has not caught up with the real schema.
    ///
    /// This is the one failure shape worth retrying: the cache refreshes on
    /// its own within seconds of a deployment.
    #[error("Schema cache is stale ({code}): {message}")]
    SchemaCacheStale {
        /// The transient error code reported by the store.
        code: String,
        /// Store-reported detail message.
        message: String,
    },

    /// Uniqueness violation on the identity email.
    #[error("Email already registered")]
    DuplicateEmail,

    /// A role profile already exists for this identity.
    #[error("Profile already exists for this identity")]
    DuplicateProfile,

    /// Any other failure reported by the store.
    ///
    /// Includes hard schema mismatches (a genuinely missing column or
    /// function), which can carry message text similar to the transient
    /// case but no transient code.
    #[error("Store operation failed: {message}")]
    Rpc {
        /// Error code reported by the store, if any.
        code: Option<String>,
        /// Store-reported message.
        message: String,
    },
}

impl StoreError {
    /// Build a typed error from a raw `(code, message)` failure reported by
    /// the store, on either the HTTP error path or the tagged-result path.
    #[must_use]
    pub fn from_rpc_failure(code: Option<String>, message: String) -> Self {
        if let Some(ref c) = code {
            if TRANSIENT_SCHEMA_CODES.contains(&c.as_str()) {
                return StoreError::SchemaCacheStale {
                    code: c.clone(),
                    message,
                };
            }
        }

        let lowered = message.to_lowercase();
        if lowered.contains("already registered") {
            return StoreError::DuplicateEmail;
        }
        if lowered.contains("profile already exists") {
            return StoreError::DuplicateProfile;
        }

        StoreError::Rpc { code, message }
    }

    /// Check if this error is transient schema-cache staleness.
    #[must_use]
    pub fn is_schema_cache_stale(&self) -> bool {
        matches!(self, StoreError::SchemaCacheStale { .. })
    }

    /// Check if this error is a uniqueness conflict (email or profile).
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::DuplicateEmail | StoreError::DuplicateProfile
        )
    }

    /// Check if this error looks like a hard schema mismatch: message text
    /// resembling cache staleness but without a transient code.
    ///
    /// The store cannot always distinguish "the cache will catch up" from
    /// "the column genuinely does not exist"; a non-coded schema-shaped
    /// message indicates an operational misconfiguration and is logged at
    /// high severity by callers.
    #[must_use]
    pub fn looks_like_schema_mismatch(&self) -> bool {
        match self {
            StoreError::Rpc { message, .. } => {
                let lowered = message.to_lowercase();
                lowered.contains("schema cache") || lowered.contains("does not exist")
            }
            _ => false,
        }
    }

    /// The store-reported message, where one exists.
    #[must_use]
    pub fn store_message(&self) -> Option<&str> {
        match self {
            StoreError::SchemaCacheStale { message, .. } | StoreError::Rpc { message, .. } => {
                Some(message)
            }
            _ => None,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_code_maps_to_schema_cache_stale() {
        let err = StoreError::from_rpc_failure(
            Some("PGRST204".to_string()),
            "Could not find the 'grade' column of 'students' in the schema cache".to_string(),
        );
        assert!(err.is_schema_cache_stale());
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_function_missing_code_is_transient() {
        let err = StoreError::from_rpc_failure(
            Some("PGRST202".to_string()),
            "Could not find the function create_student_with_user in the schema cache".to_string(),
        );
        assert!(err.is_schema_cache_stale());
    }

    #[test]
    fn test_duplicate_email_maps_to_conflict() {
        let err = StoreError::from_rpc_failure(
            Some("23505".to_string()),
            "Email already registered".to_string(),
        );
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert!(err.is_conflict());
    }

    #[test]
    fn test_duplicate_profile_maps_to_conflict() {
        let err = StoreError::from_rpc_failure(
            None,
            "Profile already exists for this identity".to_string(),
        );
        assert!(matches!(err, StoreError::DuplicateProfile));
        assert!(err.is_conflict());
    }

    #[test]
    fn test_uncoded_schema_message_is_not_transient() {
        // Same message shape as the transient case, but no transient code:
        // a genuinely missing column, not cache staleness.
        let err = StoreError::from_rpc_failure(
            Some("42703".to_string()),
            "column \"grade\" of relation \"students\" does not exist".to_string(),
        );
        assert!(!err.is_schema_cache_stale());
        assert!(err.looks_like_schema_mismatch());
    }

    #[test]
    fn test_other_failures_keep_code_and_message() {
        let err =
            StoreError::from_rpc_failure(Some("P0001".to_string()), "boom".to_string());
        match err {
            StoreError::Rpc { code, message } => {
                assert_eq!(code.as_deref(), Some("P0001"));
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}

//! Provisioning error taxonomy and store-error classification.
//!
//! Four failure families, kept distinct end to end: input errors (never
//! retried, never reach the gateway), conflicts (deterministic, never
//! retried, reported so callers can branch on "already exists"), transient
//! exhaustion (reported as "temporarily unavailable", never conflated with
//! conflict), and everything else.

use crate::retry::{ErrorClass, RetryError};
use thiserror::Error;
use tutoria_auth::AuthError;
use tutoria_core::LeadId;
use tutoria_store::StoreError;

/// Errors surfaced by the provisioning services.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A mandatory field is missing or empty.
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// Input was present but malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The email is already registered to an identity.
    #[error("Email already registered")]
    DuplicateEmail,

    /// The identity already has a role profile.
    #[error("Profile already exists for this identity")]
    DuplicateProfile,

    /// Transient store trouble outlasted the retry budget.
    #[error("Store temporarily unavailable after {attempts} attempts: {message}")]
    TransientExhausted {
        /// How many attempts were made.
        attempts: u32,
        /// The last observed store message.
        message: String,
    },

    /// Hashing or token issuance failed.
    #[error("Credential error: {0}")]
    Credential(#[from] AuthError),

    /// Any other store failure.
    #[error("Provisioning failed: {0}")]
    Store(StoreError),

    /// The referenced lead does not exist.
    #[error("Lead not found: {0}")]
    LeadNotFound(LeadId),
}

impl ProvisionError {
    /// Fold a finished retry sequence into the provisioning taxonomy.
    #[must_use]
    pub fn from_retry(err: RetryError<StoreError>) -> Self {
        match err {
            RetryError::Terminal(StoreError::DuplicateEmail) => ProvisionError::DuplicateEmail,
            RetryError::Terminal(StoreError::DuplicateProfile) => ProvisionError::DuplicateProfile,
            RetryError::Terminal(e) => ProvisionError::Store(e),
            RetryError::Exhausted { attempts, last } => ProvisionError::TransientExhausted {
                attempts,
                message: last.to_string(),
            },
        }
    }

    /// Check if this error is a uniqueness conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            ProvisionError::DuplicateEmail | ProvisionError::DuplicateProfile
        )
    }

    /// Check if this error is an exhausted transient condition.
    #[must_use]
    pub fn is_transient_exhausted(&self) -> bool {
        matches!(self, ProvisionError::TransientExhausted { .. })
    }

    /// Check if this error is a client-input failure.
    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            ProvisionError::MissingField { .. } | ProvisionError::InvalidInput(_)
        )
    }
}

/// Result type for provisioning operations.
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Build a store-error classifier for the retry executor.
///
/// Only transient schema-cache staleness is retryable, recognized by the
/// store's dedicated error codes. A call site may additionally pass literal
/// message substrings to treat as transient; anything else — conflicts,
/// hard schema mismatches, transport failures — is terminal.
pub fn classify_store_error(
    extra_transient_markers: &[String],
) -> impl Fn(&StoreError) -> ErrorClass + '_ {
    move |err: &StoreError| {
        if err.is_schema_cache_stale() {
            return ErrorClass::Retryable;
        }
        if let Some(message) = err.store_message() {
            if extra_transient_markers
                .iter()
                .any(|marker| message.contains(marker.as_str()))
            {
                return ErrorClass::Retryable;
            }
        }
        ErrorClass::Terminal
    }
}

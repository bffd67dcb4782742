//! # Tutoria Provisioning
//!
//! The account provisioning core. Everything here reduces to one primitive:
//! the atomic "create identity + role profile" operation exposed by
//! `tutoria-store`, which either creates both records durably or neither.
//!
//! ```text
//! RegistrationService ──► RetryExecutor ──► ProvisioningGateway ──► store
//! LeadIngestService ──► (persist lead) ──► LeadSyncService ──┘
//! ```
//!
//! Two retry layers exist deliberately and serve different purposes:
//!
//! - [`retry::RetryExecutor`] smooths *transient infrastructure* failures
//!   (stale schema cache) inside a single provisioning call, with
//!   exponential backoff and strict error classification.
//! - [`lead_sync::LeadSyncService`] re-runs whole sync attempts with a
//!   linear delay, converging best-effort and treating "already
//!   provisioned" as success so re-runs are idempotent.
//!
//! Uniqueness races are arbitrated solely by the store: two concurrent
//! registrations for one email both reach the gateway, and exactly one
//! wins; the loser sees a deterministic conflict that is never retried.

pub mod error;
pub mod lead_ingest;
pub mod lead_sync;
pub mod registration;
pub mod retry;

pub use error::{classify_store_error, ProvisionError, ProvisionResult};
pub use lead_ingest::{IngestOutcome, LeadIngestService};
pub use lead_sync::{LeadSyncPolicy, LeadSyncService, SyncOutcome};
pub use registration::{
    normalize_email, ProfileSummary, ProvisionedAccount, RegistrationService, StudentRegistration,
    TutorRegistration,
};
pub use retry::{ErrorClass, RetryError, RetryExecutor, RetryPolicy};

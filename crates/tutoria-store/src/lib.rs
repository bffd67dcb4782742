//! # Tutoria Store
//!
//! Adapter over the backing data store's REST surface. The store exposes
//! tables (`users`, `students`, `tutors`, `leads`) and a pair of atomic
//! RPCs that create an identity together with its role profile in a single
//! store-side transaction.
//!
//! The store's schema-resolution layer caches its view of functions and
//! columns; during deployment windows that cache can lag the real schema and
//! requests fail with dedicated transient error codes. This crate surfaces
//! those failures as typed [`StoreError`] variants so callers can decide
//! what is worth retrying — the adapter itself never retries.

pub mod client;
pub mod error;
pub mod gateway;
pub mod leads;
pub mod users;

pub use client::{StoreClient, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use gateway::{
    NewStudentAccount, NewTutorAccount, ProvisioningGateway, StudentProvisionedIds,
    TutorProvisionedIds,
};
pub use leads::{LeadKind, LeadRecord, LeadRepository, NewLead};
pub use users::{UserDirectory, UserRecord};

//! # Tutoria Core
//!
//! Shared foundation types for the Tutoria marketplace backend:
//! strongly typed identifiers and the account role tag.
//!
//! This crate is dependency-light on purpose; every other crate in the
//! workspace builds on it.

pub mod ids;
pub mod role;

pub use ids::{LeadId, ParseIdError, StudentId, TutorId, UserId};
pub use role::{ParseRoleError, Role};

//! # Tutoria Auth
//!
//! Credential primitives shared by the registration and lead-sync paths:
//!
//! - Argon2id password hashing (`PasswordHasher`)
//! - Signed access tokens embedding identity id, role, and display name
//! - Opaque secret generation for lead-derived accounts whose password is
//!   never revealed to anyone

pub mod claims;
pub mod error;
pub mod password;
pub mod secret;
pub mod token;

pub use claims::AccessClaims;
pub use error::AuthError;
pub use password::{hash_password, verify_password, PasswordHasher};
pub use secret::generate_opaque_secret;
pub use token::TokenIssuer;

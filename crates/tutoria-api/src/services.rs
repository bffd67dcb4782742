//! Login service.
//!
//! Verifies credentials against the stored hash and issues the same token
//! shape the registration path returns. Lookup misses and password
//! mismatches collapse into one generic error so the endpoint cannot be
//! used to enumerate registered emails.

use crate::error::ApiError;
use crate::models::{LoginResponse, UserSummary};
use chrono::Duration;
use tracing::{debug, info};
use tutoria_auth::{AccessClaims, PasswordHasher, TokenIssuer};
use tutoria_provisioning::normalize_email;
use tutoria_store::UserDirectory;

/// How long login-issued tokens stay valid.
const TOKEN_VALIDITY_HOURS: i64 = 24;

/// Service for credential login.
#[derive(Debug, Clone)]
pub struct LoginService {
    directory: UserDirectory,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl LoginService {
    /// Create a login service.
    #[must_use]
    pub fn new(directory: UserDirectory, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            directory,
            hasher,
            tokens,
        }
    }

    /// Authenticate an email/password pair.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidCredentials` when the email is unknown or
    /// the password does not match; both cases are indistinguishable to the
    /// caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let normalized = normalize_email(email);

        let user = self
            .directory
            .find_by_email(&normalized)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let Some(user) = user else {
            debug!(email = %normalized, "Login attempt for unknown email");
            return Err(ApiError::InvalidCredentials);
        };

        let valid = self
            .hasher
            .verify(password, &user.password_hash)
            .map_err(|e| ApiError::Internal(format!("Password verification failed: {e}")))?;

        if !valid {
            debug!(user_id = %user.id, "Invalid password attempt");
            return Err(ApiError::InvalidCredentials);
        }

        let claims = AccessClaims::new(
            user.id,
            user.role,
            &user.name,
            Duration::hours(TOKEN_VALIDITY_HOURS),
        );
        let token = self
            .tokens
            .issue(&claims)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            token,
            user: UserSummary {
                id: *user.id.as_uuid(),
                name: user.name,
                email: user.email,
                role: user.role,
            },
        })
    }
}

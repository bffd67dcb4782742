//! Access-token claims.
//!
//! The token embeds exactly what the marketplace frontend needs to render a
//! session: identity id, role, and display name, plus the standard RFC 7519
//! timing claims.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tutoria_core::{Role, UserId};
use uuid::Uuid;

/// Claims carried by a Tutoria access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    /// Subject: the identity id.
    pub sub: String,

    /// Account role, fixed at provisioning time.
    pub role: String,

    /// Display name shown in the UI.
    pub name: String,

    /// Issued-at as a Unix timestamp.
    pub iat: i64,

    /// Expiration as a Unix timestamp.
    pub exp: i64,

    /// Unique token id.
    pub jti: String,
}

impl AccessClaims {
    /// Build claims for a freshly provisioned or authenticated identity.
    #[must_use]
    pub fn new(user_id: UserId, role: Role, display_name: &str, validity: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            name: display_name.to_string(),
            iat: now.timestamp(),
            exp: (now + validity).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Check whether the token is expired at the given Unix timestamp.
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}

//! Identity lookups.
//!
//! Only the read path lives here; identity rows are *written* exclusively by
//! the atomic provisioning RPCs in [`crate::gateway`].

use crate::client::StoreClient;
use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tutoria_core::{Role, UserId};

/// An identity row as stored.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    /// Identity id.
    pub id: UserId,
    /// Normalized unique email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Account role.
    pub role: Role,
    /// When the identity was created.
    pub created_at: DateTime<Utc>,
}

/// Read-only directory of identity records.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    client: StoreClient,
}

impl UserDirectory {
    /// Create a directory over the given store client.
    #[must_use]
    pub fn new(client: StoreClient) -> Self {
        Self { client }
    }

    /// Find an identity by normalized email. Returns `None` when absent.
    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let row = self.client.select_one("users", &[("email", email)]).await?;

        match row {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|_| StoreError::UnexpectedResponse {
                    status: 200,
                    body: value.to_string(),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_record_deserializes_from_store_row() {
        let row = json!({
            "id": "123e4567-e89b-12d3-a456-426614174000",
            "email": "jane@x.com",
            "name": "Jane",
            "password_hash": "$argon2id$v=19$m=4096,t=1,p=1$salt$hash",
            "role": "student",
            "created_at": "2026-02-01T10:00:00Z"
        });
        let record: UserRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.role, Role::Student);
        assert_eq!(record.email, "jane@x.com");
    }
}

//! Atomic provisioning gateway.
//!
//! Wraps the store's `create_student_with_user` and `create_tutor_with_user`
//! RPCs. Each RPC runs as a single store-side transaction: the identity row
//! and its role profile are created together or not at all, and the store's
//! uniqueness constraint on `users.email` is the sole arbiter of concurrent
//! registrations for the same address.
//!
//! The gateway holds no state and performs no retries; callers wrap it in
//! their own retry policy.

use crate::client::StoreClient;
use crate::error::{StoreError, StoreResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::error;
use tutoria_core::{StudentId, TutorId, UserId};
use uuid::Uuid;

/// Input for the atomic student provisioning operation.
#[derive(Debug, Clone, Serialize)]
pub struct NewStudentAccount {
    /// Display name.
    pub name: String,
    /// Normalized (trimmed, lowercased) email.
    pub email: String,
    /// Argon2id password hash; the gateway never sees a plaintext password.
    pub password_hash: String,
    /// Contact phone number.
    pub contact_number: String,
    /// Academic grade (e.g. "SD", "SMP", "SMA").
    pub grade: String,
    /// Program of interest.
    pub program: String,
    /// City of residence.
    pub city: String,
    /// Whether the profile starts active.
    pub active: bool,
}

/// Input for the atomic tutor provisioning operation.
#[derive(Debug, Clone, Serialize)]
pub struct NewTutorAccount {
    /// Display name.
    pub name: String,
    /// Normalized (trimmed, lowercased) email.
    pub email: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Contact phone number.
    pub contact_number: String,
    /// Subjects the tutor teaches.
    pub subjects: Vec<String>,
    /// Highest education attained.
    pub education: String,
    /// Teaching experience summary.
    pub experience: String,
    /// Hourly rate in the marketplace currency.
    pub hourly_rate: Decimal,
    /// City or service area.
    pub area: String,
    /// Availability description.
    pub availability: String,
    /// Whether the profile starts active.
    pub active: bool,
}

/// Identifier pair returned by successful student provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentProvisionedIds {
    /// The created student profile.
    pub student_id: StudentId,
    /// The created identity.
    pub user_id: UserId,
}

/// Identifier pair returned by successful tutor provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorProvisionedIds {
    /// The created tutor profile.
    pub tutor_id: TutorId,
    /// The created identity.
    pub user_id: UserId,
}

/// Tagged result shape returned by the provisioning RPCs.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum RpcOutcome {
    Success { data: ProvisionedRow },
    Error { message: String, code: Option<String> },
}

#[derive(Debug, Deserialize)]
struct ProvisionedRow {
    id: Uuid,
    user_id: Uuid,
}

/// Stateless adapter over the atomic provisioning RPCs.
#[derive(Debug, Clone)]
pub struct ProvisioningGateway {
    client: StoreClient,
}

impl ProvisioningGateway {
    /// Create a gateway over the given store client.
    #[must_use]
    pub fn new(client: StoreClient) -> Self {
        Self { client }
    }

    /// Atomically create a student identity and profile.
    ///
    /// # Errors
    ///
    /// - `StoreError::DuplicateEmail` if the email is already registered
    /// - `StoreError::DuplicateProfile` if the identity already has a profile
    /// - `StoreError::SchemaCacheStale` on transient schema-cache staleness
    /// - `StoreError::Rpc` for any other store-reported failure
    pub async fn create_student(
        &self,
        account: &NewStudentAccount,
    ) -> StoreResult<StudentProvisionedIds> {
        let params = serde_json::to_value(account).map_err(|e| StoreError::Rpc {
            code: None,
            message: format!("Failed to encode RPC parameters: {e}"),
        })?;

        let row = self
            .invoke("create_student_with_user", &params)
            .await?;

        Ok(StudentProvisionedIds {
            student_id: StudentId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
        })
    }

    /// Atomically create a tutor identity and profile.
    ///
    /// Error surface matches [`Self::create_student`].
    pub async fn create_tutor(
        &self,
        account: &NewTutorAccount,
    ) -> StoreResult<TutorProvisionedIds> {
        let params = serde_json::to_value(account).map_err(|e| StoreError::Rpc {
            code: None,
            message: format!("Failed to encode RPC parameters: {e}"),
        })?;

        let row = self.invoke("create_tutor_with_user", &params).await?;

        Ok(TutorProvisionedIds {
            tutor_id: TutorId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
        })
    }

    async fn invoke(&self, function: &str, params: &serde_json::Value) -> StoreResult<ProvisionedRow> {
        let result = self.client.rpc(function, params).await;

        let payload = match result {
            Ok(payload) => payload,
            Err(e) => {
                log_if_misconfigured(function, &e);
                return Err(e);
            }
        };

        let outcome: RpcOutcome =
            serde_json::from_value(payload.clone()).map_err(|_| StoreError::UnexpectedResponse {
                status: 200,
                body: payload.to_string(),
            })?;

        match outcome {
            RpcOutcome::Success { data } => Ok(data),
            RpcOutcome::Error { message, code } => {
                let err = StoreError::from_rpc_failure(code, message);
                log_if_misconfigured(function, &err);
                Err(err)
            }
        }
    }
}

/// A schema-shaped message without a transient code means the schema itself
/// is wrong, not merely stale. Operators need to see these.
fn log_if_misconfigured(function: &str, err: &StoreError) {
    if err.looks_like_schema_mismatch() {
        error!(
            function,
            error = %err,
            "Store schema mismatch without a transient code; likely an operational misconfiguration"
        );
    }
}

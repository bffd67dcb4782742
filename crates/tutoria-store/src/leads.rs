//! Lead persistence.
//!
//! A lead is an untrusted raw submission: a type tag, the submitter's
//! answers as free-form JSON, and a source tag. Rows are immutable once
//! written; synchronization reads them but never updates them.

use crate::client::StoreClient;
use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tutoria_core::LeadId;

/// The kind of account a lead is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadKind {
    /// A prospective student; synchronizable into an account.
    Student,
    /// A prospective tutor; left for manual onboarding.
    Tutor,
}

/// A lead as submitted, before persistence.
#[derive(Debug, Clone, Serialize)]
pub struct NewLead {
    /// Which kind of account the submitter wants.
    #[serde(rename = "lead_type")]
    pub kind: LeadKind,
    /// The submitter's raw answers, stored verbatim.
    pub payload: Value,
    /// Where the lead came from (landing page, campaign tag).
    pub source: String,
}

/// A persisted lead row.
#[derive(Debug, Clone, Deserialize)]
pub struct LeadRecord {
    /// Row identifier.
    pub id: LeadId,
    /// Which kind of account the submitter wants.
    #[serde(rename = "lead_type")]
    pub kind: LeadKind,
    /// The submitter's raw answers.
    pub payload: Value,
    /// Source tag.
    pub source: String,
    /// When the lead was stored.
    pub created_at: DateTime<Utc>,
}

/// Repository for lead rows.
#[derive(Debug, Clone)]
pub struct LeadRepository {
    client: StoreClient,
}

impl LeadRepository {
    /// Create a repository over the given store client.
    #[must_use]
    pub fn new(client: StoreClient) -> Self {
        Self { client }
    }

    /// Persist a new lead and return the stored row.
    pub async fn insert(&self, lead: &NewLead) -> StoreResult<LeadRecord> {
        let row = serde_json::to_value(lead).map_err(|e| StoreError::Rpc {
            code: None,
            message: format!("Failed to encode lead row: {e}"),
        })?;

        let stored = self.client.insert("leads", &row).await?;
        serde_json::from_value(stored.clone()).map_err(|_| StoreError::UnexpectedResponse {
            status: 200,
            body: stored.to_string(),
        })
    }

    /// Fetch a lead by id. Returns `None` if no such row exists.
    pub async fn fetch(&self, id: LeadId) -> StoreResult<Option<LeadRecord>> {
        let id_string = id.to_string();
        let row = self
            .client
            .select_one("leads", &[("id", id_string.as_str())])
            .await?;

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
    fn test_new_lead_serializes_type_tag() {
        let lead = NewLead {
            kind: LeadKind::Student,
            payload: json!({"name": "Budi", "phone": "0812"}),
            source: "landing_page".to_string(),
        };
        let value = serde_json::to_value(&lead).unwrap();
        assert_eq!(value["lead_type"], "student");
        assert_eq!(value["payload"]["name"], "Budi");
    }

    #[test]
    fn test_lead_record_deserializes_from_store_row() {
        let row = json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "lead_type": "tutor",
            "payload": {"name": "Sari"},
            "source": "referral",
            "created_at": "2026-01-15T08:30:00Z"
        });
        let record: LeadRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.kind, LeadKind::Tutor);
        assert_eq!(record.source, "referral");
    }
}

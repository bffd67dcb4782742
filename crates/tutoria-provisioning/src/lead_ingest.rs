//! Lead ingestion.
//!
//! Persists the raw submission first, then runs the best-effort sync
//! attempt sequence. The submitter's success never depends on sync: once
//! the lead row is durable the submission has succeeded, and the response
//! only *reports* whether sync converged before responding.

use crate::error::{ProvisionError, ProvisionResult};
use crate::lead_sync::LeadSyncService;
use tracing::{info, warn};
use tutoria_store::{LeadRecord, LeadRepository, NewLead};

/// Result of a lead submission.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// The durably stored lead.
    pub lead: LeadRecord,
    /// Whether the best-effort sync sequence converged before responding.
    pub sync_success: bool,
}

/// Accepts raw lead submissions.
#[derive(Debug, Clone)]
pub struct LeadIngestService {
    leads: LeadRepository,
    sync: LeadSyncService,
}

impl LeadIngestService {
    /// Create an ingest service.
    #[must_use]
    pub fn new(leads: LeadRepository, sync: LeadSyncService) -> Self {
        Self { leads, sync }
    }

    /// Persist a lead and attempt best-effort synchronization.
    ///
    /// # Errors
    ///
    /// Fails only if the lead itself cannot be persisted. Sync trouble is
    /// reflected in `sync_success`, never as an error.
    pub async fn submit(&self, lead: NewLead) -> ProvisionResult<IngestOutcome> {
        let record = self
            .leads
            .insert(&lead)
            .await
            .map_err(ProvisionError::Store)?;

        info!(lead_id = %record.id, source = %record.source, "Lead stored");

        let sync_success = match self.sync.sync_with_retry(record.id).await {
            Ok(outcome) => {
                info!(lead_id = %record.id, ?outcome, "Lead sync converged");
                true
            }
            Err(e) => {
                warn!(
                    lead_id = %record.id,
                    error = %e,
                    "Lead sync did not converge; row kept for later reconciliation"
                );
                false
            }
        };

        Ok(IngestOutcome {
            lead: record,
            sync_success,
        })
    }
}

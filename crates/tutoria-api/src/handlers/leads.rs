//! Lead submission endpoint handler.
//!
//! POST /leads. Persists the raw submission and reports whether the
//! best-effort sync converged; submission never fails because of sync
//! trouble.

use crate::error::ApiError;
use crate::models::{LeadSubmitRequest, LeadSubmitResponse};
use axum::{http::StatusCode, Extension, Json};
use std::sync::Arc;
use tutoria_provisioning::LeadIngestService;

/// Handle a raw lead submission.
///
/// # Errors
///
/// - 400 Bad Request: malformed body
/// - 500 Internal Server Error: the lead row could not be persisted
#[utoipa::path(
    post,
    path = "/leads",
    request_body = LeadSubmitRequest,
    responses(
        (status = 201, description = "Lead stored", body = LeadSubmitResponse),
        (status = 400, description = "Validation error"),
    ),
    tag = "Leads"
)]
pub async fn submit_lead_handler(
    Extension(ingest): Extension<Arc<LeadIngestService>>,
    Json(request): Json<LeadSubmitRequest>,
) -> Result<(StatusCode, Json<LeadSubmitResponse>), ApiError> {
    if !request.payload.is_object() {
        return Err(ApiError::Validation(
            "Lead payload must be a JSON object".to_string(),
        ));
    }

    let outcome = ingest.submit(request.into_new_lead()).await?;

    Ok((
        StatusCode::CREATED,
        Json(LeadSubmitResponse {
            lead: outcome.lead.into(),
            sync_success: outcome.sync_success,
        }),
    ))
}

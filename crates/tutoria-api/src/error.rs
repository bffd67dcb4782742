//! Error types for the Tutoria API.
//!
//! Maps the provisioning taxonomy onto HTTP statuses: input errors are 400,
//! conflicts 409, exhausted transients 503, everything internal 500. The
//! 503 and 409 shapes stay distinct so clients can tell "retry the whole
//! registration later" apart from "this account already exists".

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tutoria_provisioning::ProvisionError;
use utoipa::ToSchema;

/// Error type for the Tutoria API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Email or password did not match an account.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The email is already registered.
    #[error("Email already registered")]
    Conflict,

    /// The store stayed transiently unavailable past the retry budget.
    #[error("Service temporarily unavailable: {0}")]
    Unavailable(String),

    /// Anything the client cannot act on.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ProvisionError> for ApiError {
    fn from(err: ProvisionError) -> Self {
        match err {
            ProvisionError::MissingField { field } => {
                ApiError::Validation(format!("Missing required field: {field}"))
            }
            ProvisionError::InvalidInput(msg) => ApiError::Validation(msg),
            ProvisionError::DuplicateEmail | ProvisionError::DuplicateProfile => ApiError::Conflict,
            ProvisionError::TransientExhausted { message, .. } => ApiError::Unavailable(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// RFC 7807 Problem Details response format.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemDetails {
    /// Problem type URI.
    #[serde(rename = "type")]
    pub problem_type: String,
    /// Short human-readable title.
    pub title: String,
    /// HTTP status code.
    pub status: u16,
    /// Detail message safe to show clients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ProblemDetails {
    fn new(problem_type: &str, title: &str, status: u16, detail: impl Into<String>) -> Self {
        Self {
            problem_type: format!("https://tutoria.app/problems/{problem_type}"),
            title: title.to_string(),
            status,
            detail: Some(detail.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, problem) = match &self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ProblemDetails::new("validation-error", "Validation Error", 400, msg.clone()),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ProblemDetails::new(
                    "invalid-credentials",
                    "Unauthorized",
                    401,
                    "Invalid email or password",
                ),
            ),
            ApiError::Conflict => (
                StatusCode::CONFLICT,
                ProblemDetails::new(
                    "conflict",
                    "Conflict",
                    409,
                    "This email is already registered",
                ),
            ),
            ApiError::Unavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ProblemDetails::new(
                    "temporarily-unavailable",
                    "Service Unavailable",
                    503,
                    "A synchronization issue is occurring, please retry shortly",
                ),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ProblemDetails::new(
                        "internal-error",
                        "Internal Server Error",
                        500,
                        "An internal error occurred",
                    ),
                )
            }
        };

        (status, Json(problem)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_maps_to_409() {
        let response = ApiError::from(ProvisionError::DuplicateEmail).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_transient_exhaustion_maps_to_503_not_409() {
        let err = ApiError::from(ProvisionError::TransientExhausted {
            attempts: 3,
            message: "schema cache stale".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_missing_field_maps_to_400() {
        let err = ApiError::from(ProvisionError::MissingField { field: "grade" });
        assert!(matches!(err, ApiError::Validation(_)));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_provisioning_failures_map_to_500() {
        let err = ApiError::from(ProvisionError::InvalidInput("weak password".to_string()));
        assert!(matches!(err, ApiError::Validation(_)));

        let err = ApiError::from(ProvisionError::Credential(
            tutoria_auth::AuthError::HashingFailed("boom".to_string()),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_detail_is_suppressed_from_clients() {
        let response = ApiError::Internal("secret stack trace".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Body carries the generic message, not the internal detail; the
        // detail goes to the log instead.
    }
}

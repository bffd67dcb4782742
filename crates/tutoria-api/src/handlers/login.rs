//! Login endpoint handler.

use super::validate_request;
use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse};
use crate::services::LoginService;
use axum::{Extension, Json};
use std::sync::Arc;

/// Handle credential login.
///
/// # Errors
///
/// - 400 Bad Request: malformed body
/// - 401 Unauthorized: unknown email or wrong password, indistinguishable
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "Authentication"
)]
pub async fn login_handler(
    Extension(login): Extension<Arc<LoginService>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    validate_request(&request)?;

    let response = login.login(&request.email, &request.password).await?;
    Ok(Json(response))
}

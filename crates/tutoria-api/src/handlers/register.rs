//! Self-service registration endpoint handlers.
//!
//! POST /auth/register/student and POST /auth/register/tutor. Both reduce
//! to the registration service; the handlers only translate between wire
//! DTOs and the provisioning types.

use super::validate_request;
use crate::error::ApiError;
use crate::models::{RegisterResponse, RegisterStudentRequest, RegisterTutorRequest};
use axum::{http::StatusCode, Extension, Json};
use std::sync::Arc;
use tutoria_provisioning::{RegistrationService, StudentRegistration, TutorRegistration};

/// Handle student self-registration.
///
/// # Errors
///
/// - 400 Bad Request: missing or malformed fields
/// - 409 Conflict: email already registered
/// - 503 Service Unavailable: the store stayed transiently unavailable;
///   the whole registration is safe to retry later
/// - 500 Internal Server Error: any other provisioning failure
#[utoipa::path(
    post,
    path = "/auth/register/student",
    request_body = RegisterStudentRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered"),
        (status = 503, description = "Temporarily unavailable, retry shortly"),
    ),
    tag = "Registration"
)]
pub async fn register_student_handler(
    Extension(registration): Extension<Arc<RegistrationService>>,
    Json(request): Json<RegisterStudentRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    validate_request(&request)?;

    let account = registration
        .register_student(StudentRegistration {
            name: request.name,
            email: request.email,
            password: request.password,
            contact_number: request.contact_number,
            grade: request.grade,
            program: request.program,
            city: request.city,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Handle tutor self-registration.
///
/// Status mapping matches [`register_student_handler`].
#[utoipa::path(
    post,
    path = "/auth/register/tutor",
    request_body = RegisterTutorRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered"),
        (status = 503, description = "Temporarily unavailable, retry shortly"),
    ),
    tag = "Registration"
)]
pub async fn register_tutor_handler(
    Extension(registration): Extension<Arc<RegistrationService>>,
    Json(request): Json<RegisterTutorRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    validate_request(&request)?;

    let account = registration
        .register_tutor(TutorRegistration {
            name: request.name,
            email: request.email,
            password: request.password,
            contact_number: request.contact_number,
            subjects: request.subjects,
            education: request.education,
            experience: request.experience,
            hourly_rate: request.hourly_rate,
            area: request.area,
            availability: request.availability,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

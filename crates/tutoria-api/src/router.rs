//! API router configuration.
//!
//! Routes:
//! - POST /auth/register/student
//! - POST /auth/register/tutor
//! - POST /auth/login
//! - POST /leads

use crate::handlers::{
    login_handler, register_student_handler, register_tutor_handler, submit_lead_handler,
};
use crate::services::LoginService;
use axum::{routing::post, Extension, Router};
use std::sync::Arc;
use tutoria_provisioning::{LeadIngestService, RegistrationService};

/// Shared state for the API routers.
#[derive(Clone)]
pub struct ApiState {
    /// Registration orchestration for both entry points.
    pub registration: Arc<RegistrationService>,
    /// Lead intake with best-effort sync.
    pub lead_ingest: Arc<LeadIngestService>,
    /// Credential login.
    pub login: Arc<LoginService>,
}

/// Build the API router with all provisioning endpoints.
pub fn api_router(state: ApiState) -> Router {
    Router::new()
        .route("/auth/register/student", post(register_student_handler))
        .route("/auth/register/tutor", post(register_tutor_handler))
        .route("/auth/login", post(login_handler))
        .route("/leads", post(submit_lead_handler))
        .layer(Extension(state.registration))
        .layer(Extension(state.lead_ingest))
        .layer(Extension(state.login))
}

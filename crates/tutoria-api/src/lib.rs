//! # Tutoria API
//!
//! REST endpoints for account provisioning and lead intake:
//!
//! - `POST /auth/register/student` — self-service student registration
//! - `POST /auth/register/tutor` — self-service tutor registration
//! - `POST /auth/login` — credential login
//! - `POST /leads` — raw lead submission with best-effort sync
//!
//! # Example
//!
//! ```rust,ignore
//! use tutoria_api::router::{api_router, ApiState};
//!
//! let app = api_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::{ApiError, ProblemDetails};
pub use models::{
    LeadSubmitRequest, LeadSubmitResponse, LeadTypeView, LeadView, LoginRequest, LoginResponse,
    ProfileView, RegisterResponse, RegisterStudentRequest, RegisterTutorRequest, UserSummary,
};
pub use router::{api_router, ApiState};
pub use services::LoginService;

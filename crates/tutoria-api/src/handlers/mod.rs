//! HTTP handlers.

mod leads;
mod login;
mod register;

pub use leads::submit_lead_handler;
pub use login::login_handler;
pub use register::{register_student_handler, register_tutor_handler};

use crate::error::ApiError;
use validator::Validate;

/// Run validator-derive checks, folding field messages into one 400.
pub(crate) fn validate_request<T: Validate>(request: &T) -> Result<(), ApiError> {
    request.validate().map_err(|e| {
        let messages: Vec<String> = e
            .field_errors()
            .values()
            .flat_map(|errors| {
                errors
                    .iter()
                    .filter_map(|err| err.message.as_ref().map(ToString::to_string))
            })
            .collect();
        ApiError::Validation(messages.join(", "))
    })
}

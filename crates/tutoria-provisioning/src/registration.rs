//! Self-service registration orchestration.
//!
//! The flow per entry point: fail fast on missing input (the gateway is
//! never touched), normalize the email, hash the password, run the atomic
//! provisioning call under the retry executor with the transient-cache
//! classifier, then issue the signed access token.

use crate::error::{classify_store_error, ProvisionError, ProvisionResult};
use crate::retry::{RetryExecutor, RetryPolicy};
use chrono::Duration;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use tutoria_auth::{AccessClaims, PasswordHasher, TokenIssuer};
use tutoria_core::{Role, StudentId, TutorId, UserId};
use tutoria_store::{NewStudentAccount, NewTutorAccount, ProvisioningGateway};

/// How long issued access tokens stay valid.
const TOKEN_VALIDITY_HOURS: i64 = 24;

/// Minimum password length for self-service registration.
const MIN_PASSWORD_LEN: usize = 8;

/// Student registration input.
#[derive(Debug, Clone)]
pub struct StudentRegistration {
    /// Display name.
    pub name: String,
    /// Email address, in whatever case the client sent it.
    pub email: String,
    /// Plaintext password; hashed before leaving this crate.
    pub password: String,
    /// Contact phone number.
    pub contact_number: String,
    /// Academic grade.
    pub grade: String,
    /// Program of interest.
    pub program: String,
    /// City of residence.
    pub city: String,
}

/// Tutor registration input.
#[derive(Debug, Clone)]
pub struct TutorRegistration {
    /// Display name.
    pub name: String,
    /// Email address, in whatever case the client sent it.
    pub email: String,
    /// Plaintext password; hashed before leaving this crate.
    pub password: String,
    /// Contact phone number.
    pub contact_number: String,
    /// Subjects taught.
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
}

/// Role-profile summary returned alongside the token.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ProfileSummary {
    /// Summary of a freshly created student profile.
    Student {
        /// Profile id.
        student_id: StudentId,
        /// Academic grade.
        grade: String,
        /// Program of interest.
        program: String,
        /// City of residence.
        city: String,
    },
    /// Summary of a freshly created tutor profile.
    Tutor {
        /// Profile id.
        tutor_id: TutorId,
        /// Subjects taught.
        subjects: Vec<String>,
        /// Hourly rate.
        hourly_rate: Decimal,
        /// Service area.
        area: String,
    },
}

/// A successfully provisioned account.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedAccount {
    /// Signed access token for immediate use.
    pub token: String,
    /// The created identity id.
    pub user_id: UserId,
    /// Account role.
    pub role: Role,
    /// Display name.
    pub name: String,
    /// Normalized email the identity was created under.
    pub email: String,
    /// Role-profile summary.
    pub profile: ProfileSummary,
}

/// Normalize an email address: trim surrounding whitespace, lowercase.
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Orchestrates self-service registration for both entry points.
///
/// Stateless apart from configuration; cheap to clone and safe to share
/// across concurrent requests.
#[derive(Debug, Clone)]
pub struct RegistrationService {
    gateway: ProvisioningGateway,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    retry: RetryExecutor,
    transient_markers: Vec<String>,
}

impl RegistrationService {
    /// Create a service with the default retry policy.
    #[must_use]
    pub fn new(gateway: ProvisioningGateway, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            gateway,
            hasher,
            tokens,
            retry: RetryExecutor::default(),
            transient_markers: Vec::new(),
        }
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = RetryExecutor::new(policy);
        self
    }

    /// Extend the transient classification with literal message substrings.
    #[must_use]
    pub fn with_transient_markers(mut self, markers: Vec<String>) -> Self {
        self.transient_markers = markers;
        self
    }

    /// Register a new student account.
    ///
    /// # Errors
    ///
    /// - `ProvisionError::MissingField` / `InvalidInput` on bad input
    ///   (the gateway is never invoked)
    /// - `ProvisionError::DuplicateEmail` when the email is taken
    /// - `ProvisionError::TransientExhausted` when the store stayed stale
    ///   past the retry budget
    pub async fn register_student(
        &self,
        input: StudentRegistration,
    ) -> ProvisionResult<ProvisionedAccount> {
        require("name", &input.name)?;
        require("email", &input.email)?;
        require("password", &input.password)?;
        require("contact_number", &input.contact_number)?;
        require("grade", &input.grade)?;
        require("program", &input.program)?;
        require("city", &input.city)?;
        validate_password_strength(&input.password)?;

        let email = normalize_email(&input.email);
        let password_hash = self.hasher.hash(&input.password)?;

        let account = NewStudentAccount {
            name: input.name.clone(),
            email: email.clone(),
            password_hash,
            contact_number: input.contact_number.clone(),
            grade: input.grade.clone(),
            program: input.program.clone(),
            city: input.city.clone(),
            active: true,
        };

        let classify = classify_store_error(&self.transient_markers);
        let ids = self
            .retry
            .execute(classify, || self.gateway.create_student(&account))
            .await
            .map_err(ProvisionError::from_retry)?;

        info!(
            user_id = %ids.user_id,
            student_id = %ids.student_id,
            "Student account provisioned"
        );

        let token = self.issue_token(ids.user_id, Role::Student, &input.name)?;

        Ok(ProvisionedAccount {
            token,
            user_id: ids.user_id,
            role: Role::Student,
            name: input.name,
            email,
            profile: ProfileSummary::Student {
                student_id: ids.student_id,
                grade: input.grade,
                program: input.program,
                city: input.city,
            },
        })
    }

    /// Register a new tutor account.
    ///
    /// Error surface matches [`Self::register_student`].
    pub async fn register_tutor(
        &self,
        input: TutorRegistration,
    ) -> ProvisionResult<ProvisionedAccount> {
        require("name", &input.name)?;
        require("email", &input.email)?;
        require("password", &input.password)?;
        require("contact_number", &input.contact_number)?;
        require("education", &input.education)?;
        require("area", &input.area)?;
        if input.subjects.is_empty() {
            return Err(ProvisionError::MissingField { field: "subjects" });
        }
        validate_password_strength(&input.password)?;

        let email = normalize_email(&input.email);
        let password_hash = self.hasher.hash(&input.password)?;

        let account = NewTutorAccount {
            name: input.name.clone(),
            email: email.clone(),
            password_hash,
            contact_number: input.contact_number.clone(),
            subjects: input.subjects.clone(),
            education: input.education.clone(),
            experience: input.experience.clone(),
            hourly_rate: input.hourly_rate,
            area: input.area.clone(),
            availability: input.availability.clone(),
            active: true,
        };

        let classify = classify_store_error(&self.transient_markers);
        let ids = self
            .retry
            .execute(classify, || self.gateway.create_tutor(&account))
            .await
            .map_err(ProvisionError::from_retry)?;

        info!(
            user_id = %ids.user_id,
            tutor_id = %ids.tutor_id,
            "Tutor account provisioned"
        );

        let token = self.issue_token(ids.user_id, Role::Tutor, &input.name)?;

        Ok(ProvisionedAccount {
            token,
            user_id: ids.user_id,
            role: Role::Tutor,
            name: input.name,
            email,
            profile: ProfileSummary::Tutor {
                tutor_id: ids.tutor_id,
                subjects: input.subjects,
                hourly_rate: input.hourly_rate,
                area: input.area,
            },
        })
    }

    fn issue_token(&self, user_id: UserId, role: Role, name: &str) -> ProvisionResult<String> {
        let claims = AccessClaims::new(user_id, role, name, Duration::hours(TOKEN_VALIDITY_HOURS));
        Ok(self.tokens.issue(&claims)?)
    }
}

fn require(field: &'static str, value: &str) -> ProvisionResult<()> {
    if value.trim().is_empty() {
        Err(ProvisionError::MissingField { field })
    } else {
        Ok(())
    }
}

fn validate_password_strength(password: &str) -> ProvisionResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ProvisionError::InvalidInput(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(ProvisionError::InvalidInput(
            "Password must contain at least one letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ProvisionError::InvalidInput(
            "Password must contain at least one digit".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Jane@X.COM "), "jane@x.com");
        assert_eq!(normalize_email("plain@x.com"), "plain@x.com");
    }

    #[test]
    fn test_require_rejects_blank_values() {
        assert!(require("name", "Jane").is_ok());
        let err = require("name", "   ").unwrap_err();
        assert!(matches!(err, ProvisionError::MissingField { field: "name" }));
    }

    #[test]
    fn test_password_strength_rules() {
        assert!(validate_password_strength("Abcdef12").is_ok());
        assert!(validate_password_strength("short1").is_err());
        assert!(validate_password_strength("12345678").is_err());
        assert!(validate_password_strength("abcdefgh").is_err());
    }
}

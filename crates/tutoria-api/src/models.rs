//! Request and response models for the Tutoria API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tutoria_core::Role;
use tutoria_provisioning::{ProfileSummary, ProvisionedAccount};
use tutoria_store::{LeadKind, LeadRecord, NewLead};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Student registration payload.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterStudentRequest {
    /// Display name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Email address.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password; complexity is enforced by the provisioning layer.
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    /// Contact phone number.
    #[validate(length(min = 1, message = "Contact number is required"))]
    pub contact_number: String,

    /// Academic grade.
    #[validate(length(min = 1, message = "Grade is required"))]
    pub grade: String,

    /// Program of interest.
    #[validate(length(min = 1, message = "Program is required"))]
    pub program: String,

    /// City of residence.
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
}

/// Tutor registration payload.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterTutorRequest {
    /// Display name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Email address.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password; complexity is enforced by the provisioning layer.
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    /// Contact phone number.
    #[validate(length(min = 1, message = "Contact number is required"))]
    pub contact_number: String,

    /// Subjects taught; at least one.
    #[validate(length(min = 1, message = "At least one subject is required"))]
    pub subjects: Vec<String>,

    /// Highest education attained.
    #[validate(length(min = 1, message = "Education is required"))]
    pub education: String,

    /// Teaching experience summary.
    #[serde(default)]
    pub experience: String,

    /// Hourly rate in the marketplace currency.
    pub hourly_rate: Decimal,

    /// City or service area.
    #[validate(length(min = 1, message = "Area is required"))]
    pub area: String,

    /// Availability description.
    #[serde(default)]
    pub availability: String,
}

/// Login payload.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Identity summary returned with a token.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummary {
    /// Identity id.
    pub id: Uuid,

    /// Display name.
    pub name: String,

    /// Normalized email.
    pub email: String,

    /// Account role.
    #[schema(value_type = String, example = "student")]
    pub role: Role,
}

/// Role-profile summary returned on registration.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ProfileView {
    /// A freshly created student profile.
    Student {
        /// Profile id.
        student_id: Uuid,
        /// Academic grade.
        grade: String,
        /// Program of interest.
        program: String,
        /// City of residence.
        city: String,
    },
    /// A freshly created tutor profile.
    Tutor {
        /// Profile id.
        tutor_id: Uuid,
        /// Subjects taught.
        subjects: Vec<String>,
        /// Hourly rate.
        hourly_rate: Decimal,
        /// Service area.
        area: String,
    },
}

impl From<ProfileSummary> for ProfileView {
    fn from(summary: ProfileSummary) -> Self {
        match summary {
            ProfileSummary::Student {
                student_id,
                grade,
                program,
                city,
            } => ProfileView::Student {
                student_id: *student_id.as_uuid(),
                grade,
                program,
                city,
            },
            ProfileSummary::Tutor {
                tutor_id,
                subjects,
                hourly_rate,
                area,
            } => ProfileView::Tutor {
                tutor_id: *tutor_id.as_uuid(),
                subjects,
                hourly_rate,
                area,
            },
        }
    }
}

/// Successful registration response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisterResponse {
    /// Signed access token for immediate use.
    pub token: String,

    /// The created identity.
    pub user: UserSummary,

    /// The created role profile.
    pub profile: ProfileView,
}

impl From<ProvisionedAccount> for RegisterResponse {
    fn from(account: ProvisionedAccount) -> Self {
        Self {
            token: account.token,
            user: UserSummary {
                id: *account.user_id.as_uuid(),
                name: account.name,
                email: account.email,
                role: account.role,
            },
            profile: account.profile.into(),
        }
    }
}

/// Lead submission payload.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LeadSubmitRequest {
    /// Which kind of account the submitter wants.
    pub lead_type: LeadTypeView,

    /// The submitter's raw answers; stored verbatim, never trusted.
    #[schema(value_type = Object)]
    pub payload: Value,

    /// Where the lead came from.
    #[serde(default = "default_lead_source")]
    pub source: String,
}

fn default_lead_source() -> String {
    "landing_page".to_string()
}

/// Wire form of the lead kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LeadTypeView {
    /// A prospective student.
    Student,
    /// A prospective tutor.
    Tutor,
}

impl From<LeadTypeView> for LeadKind {
    fn from(view: LeadTypeView) -> Self {
        match view {
            LeadTypeView::Student => LeadKind::Student,
            LeadTypeView::Tutor => LeadKind::Tutor,
        }
    }
}

impl From<LeadKind> for LeadTypeView {
    fn from(kind: LeadKind) -> Self {
        match kind {
            LeadKind::Student => LeadTypeView::Student,
            LeadKind::Tutor => LeadTypeView::Tutor,
        }
    }
}

impl LeadSubmitRequest {
    /// Convert into the persistence shape.
    #[must_use]
    pub fn into_new_lead(self) -> NewLead {
        NewLead {
            kind: self.lead_type.into(),
            payload: self.payload,
            source: self.source,
        }
    }
}

/// Stored-lead summary returned to the submitter.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeadView {
    /// Lead id.
    pub id: Uuid,

    /// Which kind of account the submitter wants.
    pub lead_type: LeadTypeView,

    /// Source tag.
    pub source: String,

    /// When the lead was stored.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<LeadRecord> for LeadView {
    fn from(record: LeadRecord) -> Self {
        Self {
            id: *record.id.as_uuid(),
            lead_type: record.kind.into(),
            source: record.source,
            created_at: record.created_at,
        }
    }
}

/// Lead submission response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeadSubmitResponse {
    /// The stored lead.
    pub lead: LeadView,

    /// Whether the best-effort sync converged before responding.
    pub sync_success: bool,
}

/// Login response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Signed access token.
    pub token: String,

    /// The authenticated identity.
    pub user: UserSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_student_request_validation() {
        let request = RegisterStudentRequest {
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            password: "Password1".to_string(),
            contact_number: "0812".to_string(),
            grade: "SD".to_string(),
            program: "Matematika".to_string(),
            city: "Palembang".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_student_request_rejects_bad_email() {
        let request = RegisterStudentRequest {
            name: "Jane".to_string(),
            email: "not-an-email".to_string(),
            password: "Password1".to_string(),
            contact_number: "0812".to_string(),
            grade: "SD".to_string(),
            program: "Matematika".to_string(),
            city: "Palembang".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_tutor_request_requires_a_subject() {
        let request = RegisterTutorRequest {
            name: "Sari".to_string(),
            email: "sari@x.com".to_string(),
            password: "Password1".to_string(),
            contact_number: "0812".to_string(),
            subjects: vec![],
            education: "S1".to_string(),
            experience: String::new(),
            hourly_rate: "75000".parse().unwrap(),
            area: "Jakarta".to_string(),
            availability: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_lead_request_defaults_source() {
        let request: LeadSubmitRequest = serde_json::from_value(json!({
            "lead_type": "student",
            "payload": {"name": "Budi", "phone": "0812"}
        }))
        .unwrap();
        assert_eq!(request.source, "landing_page");
        assert_eq!(request.lead_type, LeadTypeView::Student);
    }

    #[test]
    fn test_register_response_shape() {
        let account = ProvisionedAccount {
            token: "jwt".to_string(),
            user_id: tutoria_core::UserId::new(),
            role: Role::Student,
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            profile: ProfileSummary::Student {
                student_id: tutoria_core::StudentId::new(),
                grade: "SD".to_string(),
                program: "Matematika".to_string(),
                city: "Palembang".to_string(),
            },
        };
        let response = RegisterResponse::from(account);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["user"]["role"], "student");
        assert_eq!(value["profile"]["grade"], "SD");
        assert_eq!(value["token"], "jwt");
    }
}

//! Lead-to-account synchronization.
//!
//! Converts a persisted student lead into a provisioned account by reusing
//! the registration path. The lead row itself is never modified; if every
//! attempt fails it stays available for manual or later reconciliation.
//!
//! The outer attempt loop here is intentionally separate from the retry
//! executor inside the registration path: that one smooths transient
//! infrastructure per provisioning call, this one re-runs the whole sync
//! best-effort. Conflicts ("already registered", "profile already exists")
//! are converted to success — a re-run of a partially successful sync must
//! converge, not error.

use crate::error::{ProvisionError, ProvisionResult};
use crate::registration::{RegistrationService, StudentRegistration};
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};
use tutoria_auth::generate_opaque_secret;
use tutoria_core::{LeadId, UserId};
use tutoria_store::{LeadKind, LeadRecord, LeadRepository};

/// Domain suffix for placeholder emails derived from a lead's phone number.
const PLACEHOLDER_EMAIL_DOMAIN: &str = "lead.tutoria.app";

/// Outer retry policy for whole-sync attempts.
#[derive(Debug, Clone)]
pub struct LeadSyncPolicy {
    /// Maximum number of sync attempts.
    pub max_attempts: u32,
    /// Delay after the first failed attempt; grows linearly with the
    /// attempt number.
    pub base_delay: Duration,
}

impl Default for LeadSyncPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// How a sync call resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A new account was created for the lead.
    Provisioned {
        /// The created identity.
        user_id: UserId,
    },
    /// The account already existed; nothing to do.
    AlreadyProvisioned,
    /// The lead is not of a synchronizable kind.
    Skipped,
}

/// Converts leads into provisioned student accounts.
#[derive(Debug, Clone)]
pub struct LeadSyncService {
    leads: LeadRepository,
    registration: RegistrationService,
    policy: LeadSyncPolicy,
}

impl LeadSyncService {
    /// Create a sync service with the default outer policy.
    #[must_use]
    pub fn new(leads: LeadRepository, registration: RegistrationService) -> Self {
        Self {
            leads,
            registration,
            policy: LeadSyncPolicy::default(),
        }
    }

    /// Override the outer attempt policy.
    #[must_use]
    pub fn with_policy(mut self, policy: LeadSyncPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run one sync attempt for the given lead.
    ///
    /// Non-student leads no-op successfully. Conflicts are treated as
    /// convergence: the account exists, so the sync has nothing left to do.
    pub async fn sync(&self, lead_id: LeadId) -> ProvisionResult<SyncOutcome> {
        let lead = self
            .leads
            .fetch(lead_id)
            .await
            .map_err(ProvisionError::Store)?
            .ok_or(ProvisionError::LeadNotFound(lead_id))?;

        if lead.kind != LeadKind::Student {
            return Ok(SyncOutcome::Skipped);
        }

        let registration = derive_student_registration(&lead)?;
        match self.registration.register_student(registration).await {
            Ok(account) => {
                info!(
                    lead_id = %lead_id,
                    user_id = %account.user_id,
                    "Lead synchronized into a student account"
                );
                Ok(SyncOutcome::Provisioned {
                    user_id: account.user_id,
                })
            }
            Err(e) if e.is_conflict() => {
                info!(lead_id = %lead_id, "Lead already provisioned; converging");
                Ok(SyncOutcome::AlreadyProvisioned)
            }
            Err(e) => Err(e),
        }
    }

    /// Run sync attempts under the outer policy until one converges.
    ///
    /// Any error counts as retryable at this layer; the delay between
    /// attempts grows linearly. On exhaustion the last error is returned
    /// and the lead row is left untouched.
    pub async fn sync_with_retry(&self, lead_id: LeadId) -> ProvisionResult<SyncOutcome> {
        let mut attempt: u32 = 1;
        loop {
            match self.sync(lead_id).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) => {
                    if attempt >= self.policy.max_attempts {
                        warn!(
                            lead_id = %lead_id,
                            attempts = attempt,
                            error = %e,
                            "Lead sync exhausted its attempts; row kept for later reconciliation"
                        );
                        return Err(e);
                    }

                    let delay = self.policy.base_delay * attempt;
                    warn!(
                        lead_id = %lead_id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Lead sync attempt failed; retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Map a lead's raw payload onto a student registration.
///
/// The password is a generated opaque secret the submitter never sees; the
/// email falls back to a phone-derived placeholder when the payload has
/// none.
fn derive_student_registration(lead: &LeadRecord) -> ProvisionResult<StudentRegistration> {
    let payload = &lead.payload;

    let name = payload_str(payload, "name")
        .ok_or(ProvisionError::MissingField { field: "name" })?;
    let phone = payload_str(payload, "phone")
        .ok_or(ProvisionError::MissingField { field: "phone" })?;

    let email = match payload_str(payload, "email") {
        Some(email) => email,
        None => placeholder_email(&phone)?,
    };

    Ok(StudentRegistration {
        name,
        email,
        password: generate_opaque_secret(),
        contact_number: phone,
        grade: payload_str(payload, "grade").unwrap_or_default(),
        program: payload_str(payload, "program")
            .or_else(|| payload_str(payload, "subject"))
            .unwrap_or_default(),
        city: payload_str(payload, "city").unwrap_or_default(),
    })
}

/// A deterministic placeholder address derived from the phone digits, so
/// re-running sync for the same lead targets the same identity.
fn placeholder_email(phone: &str) -> ProvisionResult<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(ProvisionError::InvalidInput(
            "Phone number contains no digits".to_string(),
        ));
    }
    Ok(format!("{digits}@{PLACEHOLDER_EMAIL_DOMAIN}"))
}

fn payload_str(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn student_lead(payload: Value) -> LeadRecord {
        serde_json::from_value(json!({
            "id": LeadId::new().to_string(),
            "lead_type": "student",
            "payload": payload,
            "source": "landing_page",
            "created_at": Utc::now().to_rfc3339(),
        }))
        .unwrap()
    }

    #[test]
    fn test_derive_uses_payload_email_when_present() {
        let lead = student_lead(json!({
            "name": "Budi",
            "phone": "0812-1111-2222",
            "email": "budi@x.com",
            "grade": "SMP",
            "program": "IPA",
            "city": "Bandung"
        }));
        let registration = derive_student_registration(&lead).unwrap();
        assert_eq!(registration.email, "budi@x.com");
        assert_eq!(registration.contact_number, "0812-1111-2222");
        assert_eq!(registration.grade, "SMP");
    }

    #[test]
    fn test_derive_falls_back_to_placeholder_email() {
        let lead = student_lead(json!({"name": "Budi", "phone": "0812-1111-2222"}));
        let registration = derive_student_registration(&lead).unwrap();
        assert_eq!(registration.email, "081211112222@lead.tutoria.app");
    }

    #[test]
    fn test_placeholder_is_deterministic_per_phone() {
        assert_eq!(
            placeholder_email("0812 34").unwrap(),
            placeholder_email("(0812)-34").unwrap()
        );
    }

    #[test]
    fn test_derive_generates_a_strong_secret() {
        let lead = student_lead(json!({"name": "Budi", "phone": "08123"}));
        let a = derive_student_registration(&lead).unwrap();
        let b = derive_student_registration(&lead).unwrap();
        // Fresh secret per derivation, never derived from the payload.
        assert_ne!(a.password, b.password);
        assert!(a.password.len() >= 8);
    }

    #[test]
    fn test_derive_requires_name_and_phone() {
        let lead = student_lead(json!({"phone": "08123"}));
        assert!(matches!(
            derive_student_registration(&lead).unwrap_err(),
            ProvisionError::MissingField { field: "name" }
        ));

        let lead = student_lead(json!({"name": "Budi"}));
        assert!(matches!(
            derive_student_registration(&lead).unwrap_err(),
            ProvisionError::MissingField { field: "phone" }
        ));
    }

    #[test]
    fn test_subject_key_maps_to_program() {
        let lead = student_lead(json!({
            "name": "Budi",
            "phone": "08123",
            "subject": "Matematika"
        }));
        let registration = derive_student_registration(&lead).unwrap();
        assert_eq!(registration.program, "Matematika");
    }
}

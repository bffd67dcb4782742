//! Shared helpers for provisioning integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::time::Duration;
use tutoria_auth::{PasswordHasher, TokenIssuer};
use tutoria_provisioning::{
    LeadSyncPolicy, LeadSyncService, RegistrationService, RetryPolicy, StudentRegistration,
    TutorRegistration,
};
use tutoria_store::{LeadRepository, ProvisioningGateway, StoreClient, StoreConfig};
use wiremock::MockServer;

/// Argon2 parameters small enough for fast tests.
pub fn fast_hasher() -> PasswordHasher {
    PasswordHasher::with_params(4096, 1, 1).unwrap()
}

pub fn store_client(server: &MockServer) -> StoreClient {
    StoreClient::new(StoreConfig::new(server.uri(), "service-key")).unwrap()
}

/// A registration service with millisecond backoff so retry sequences
/// complete quickly against the mock store.
pub fn registration_service(server: &MockServer) -> RegistrationService {
    RegistrationService::new(
        ProvisioningGateway::new(store_client(server)),
        fast_hasher(),
        TokenIssuer::new(b"test-secret"),
    )
    .with_retry_policy(RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(5),
    })
}

pub fn lead_sync_service(server: &MockServer) -> LeadSyncService {
    LeadSyncService::new(
        LeadRepository::new(store_client(server)),
        registration_service(server),
    )
    .with_policy(LeadSyncPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(5),
    })
}

pub fn student_input() -> StudentRegistration {
    StudentRegistration {
        name: "Jane".to_string(),
        email: "Jane@X.com".to_string(),
        password: "Password1".to_string(),
        contact_number: "081234567890".to_string(),
        grade: "SD".to_string(),
        program: "Matematika".to_string(),
        city: "Palembang".to_string(),
    }
}

pub fn tutor_input() -> TutorRegistration {
    TutorRegistration {
        name: "Sari".to_string(),
        email: "sari@x.com".to_string(),
        password: "Password1".to_string(),
        contact_number: "081298765432".to_string(),
        subjects: vec!["Fisika".to_string()],
        education: "S1 Pendidikan Fisika".to_string(),
        experience: "5 tahun".to_string(),
        hourly_rate: "75000".parse().unwrap(),
        area: "Jakarta Selatan".to_string(),
        availability: "Senin-Jumat sore".to_string(),
    }
}

pub fn success_body(id: &str, user_id: &str) -> Value {
    json!({
        "status": "success",
        "data": { "id": id, "user_id": user_id }
    })
}

/// Tagged transient failure: the schema cache has not seen a column yet.
pub fn stale_cache_body() -> Value {
    json!({
        "status": "error",
        "code": "PGRST204",
        "message": "Could not find the 'grade' column of 'students' in the schema cache"
    })
}

pub fn duplicate_email_body() -> Value {
    json!({
        "status": "error",
        "message": "Email already registered"
    })
}

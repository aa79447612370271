use std::sync::Arc;
use std::sync::Mutex;

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::Database;
use shared_models::directory::{Patient, StaffMember, StaffRole};
use shared_models::tenant::{Tenant, TenantStatus};

use crate::clock::Clock;

pub struct TestConfig {
    pub jwt_secret: String,
    pub bind_address: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            bind_address: "127.0.0.1:0".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            jwt_secret: self.jwt_secret.clone(),
            bind_address: self.bind_address.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestIdentity {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub roles: Vec<String>,
}

impl Default for TestIdentity {
    fn default() -> Self {
        Self {
            tenant_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            roles: vec!["ADMIN".to_string()],
        }
    }
}

impl TestIdentity {
    pub fn for_tenant(tenant_id: Uuid, role: &str) -> Self {
        Self {
            tenant_id,
            user_id: Uuid::new_v4(),
            roles: vec![role.to_string()],
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(identity: &TestIdentity, secret: &str, exp_hours: Option<i64>) -> String {
        let payload = json!({
            "sub": identity.user_id,
            "tenant_id": identity.tenant_id,
            "roles": identity.roles,
            "iat": Utc::now().timestamp(),
            "exp": (Utc::now() + Duration::hours(exp_hours.unwrap_or(24))).timestamp()
        });
        Self::sign(payload, secret)
    }

    pub fn create_expired_token(identity: &TestIdentity, secret: &str) -> String {
        Self::create_test_token(identity, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(identity: &TestIdentity) -> String {
        Self::create_test_token(identity, "wrong-secret", Some(24))
    }

    /// Token signed correctly but carrying no tenant claim; the gate must
    /// reject it before any storage access.
    pub fn create_tenantless_token(identity: &TestIdentity, secret: &str) -> String {
        let payload = json!({
            "sub": identity.user_id,
            "roles": identity.roles,
            "iat": Utc::now().timestamp(),
            "exp": (Utc::now() + Duration::hours(24)).timestamp()
        });
        Self::sign(payload, secret)
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }

    fn sign(payload: serde_json::Value, secret: &str) -> String {
        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }
}

/// Clock pinned to a chosen instant, movable mid-test.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// One onboarded tenant with an admin, a schedulable doctor and a patient.
pub struct HospitalFixture {
    pub tenant_id: Uuid,
    pub admin_id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
}

pub async fn seed_hospital(db: &Database) -> HospitalFixture {
    let tenant_id = Uuid::new_v4();
    let now = Utc::now();

    let tenant = Tenant {
        id: tenant_id,
        name: "Test General Hospital".to_string(),
        address: Some("1 Test Way".to_string()),
        contact_email: "admin@test-hospital.example".to_string(),
        contact_phone: None,
        license_number: format!("LIC-{}", Uuid::new_v4()),
        status: TenantStatus::Active,
        created_at: now,
    };
    let admin = StaffMember {
        id: Uuid::new_v4(),
        tenant_id,
        first_name: "Hospital".to_string(),
        last_name: "Admin".to_string(),
        email: Some(tenant.contact_email.clone()),
        username: Some(format!("admin_{}", &tenant_id.to_string()[..6])),
        roles: vec![StaffRole::Admin],
        created_at: now,
    };
    let admin_id = admin.id;
    db.insert_tenant(tenant, admin)
        .await
        .expect("fixture tenant insert");

    let doctor_id = seed_doctor(db, tenant_id, "Grace", "Okafor").await;

    let patient = Patient {
        id: Uuid::new_v4(),
        tenant_id,
        patient_uid: format!("PAT-{}-042", now.timestamp_millis()),
        first_name: "Pat".to_string(),
        last_name: "Example".to_string(),
        phone: None,
        created_at: now,
    };
    let patient_id = patient.id;
    db.insert_patient(patient).await;

    HospitalFixture {
        tenant_id,
        admin_id,
        doctor_id,
        patient_id,
    }
}

pub async fn seed_doctor(db: &Database, tenant_id: Uuid, first: &str, last: &str) -> Uuid {
    let doctor = StaffMember {
        id: Uuid::new_v4(),
        tenant_id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: None,
        username: None,
        roles: vec![StaffRole::Doctor],
        created_at: Utc::now(),
    };
    let id = doctor.id;
    db.insert_staff(doctor).await;
    id
}

pub async fn seed_patient(db: &Database, tenant_id: Uuid, first: &str, last: &str) -> Uuid {
    let patient = Patient {
        id: Uuid::new_v4(),
        tenant_id,
        patient_uid: format!("PAT-{}-007", Utc::now().timestamp_millis()),
        first_name: first.to_string(),
        last_name: last.to_string(),
        phone: None,
        created_at: Utc::now(),
    };
    let id = patient.id;
    db.insert_patient(patient).await;
    id
}

// libs/directory-cell/src/services/registry.rs
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::Database;
use shared_models::directory::{Patient, StaffMember};
use shared_utils::clock::{Clock, SystemClock};

use crate::models::{CreatePatientRequest, CreateStaffRequest};

/// Minimal patient/staff registry. This is the collaborator behind the
/// scheduling and billing ownership checks: it only creates and lists,
/// always within one tenant.
pub struct DirectoryService {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
}

impl DirectoryService {
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    pub fn with_clock(db: Arc<Database>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub async fn create_patient(
        &self,
        tenant_id: Uuid,
        request: CreatePatientRequest,
    ) -> Patient {
        let now = self.clock.now();
        let patient = Patient {
            id: Uuid::new_v4(),
            tenant_id,
            patient_uid: self.generate_patient_uid(),
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
            created_at: now,
        };

        let patient = self.db.insert_patient(patient).await;
        info!("Patient {} ({}) registered", patient.id, patient.patient_uid);
        patient
    }

    pub async fn list_patients(&self, tenant_id: Uuid) -> Vec<Patient> {
        debug!("Listing patients for tenant {}", tenant_id);
        let mut patients = self.db.patients_for_tenant(tenant_id).await;
        patients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        patients
    }

    pub async fn create_staff(
        &self,
        tenant_id: Uuid,
        request: CreateStaffRequest,
    ) -> StaffMember {
        let member = StaffMember {
            id: Uuid::new_v4(),
            tenant_id,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            username: request.username,
            roles: request.roles,
            created_at: self.clock.now(),
        };

        let member = self.db.insert_staff(member).await;
        info!("Staff member {} registered with roles {:?}", member.id, member.roles);
        member
    }

    pub async fn list_staff(&self, tenant_id: Uuid) -> Vec<StaffMember> {
        let mut staff = self.db.staff_for_tenant(tenant_id).await;
        staff.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        staff
    }

    fn generate_patient_uid(&self) -> String {
        let suffix: u32 = rand::thread_rng().gen_range(0..1000);
        format!("PAT-{}-{}", self.clock.now().timestamp_millis(), suffix)
    }
}

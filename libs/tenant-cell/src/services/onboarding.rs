// libs/tenant-cell/src/services/onboarding.rs
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use shared_database::Database;
use shared_models::directory::{StaffMember, StaffRole};
use shared_models::tenant::{Tenant, TenantStatus};
use shared_utils::clock::{Clock, SystemClock};

use crate::models::{RegisterTenantRequest, TenantError};

/// Tenant onboarding: one atomic write creates the tenant and its bootstrap
/// admin. The license number is unique across all tenants; tenants are
/// immutable afterwards in this core.
pub struct TenantOnboardingService {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
}

impl TenantOnboardingService {
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    pub fn with_clock(db: Arc<Database>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub async fn register_tenant(
        &self,
        request: RegisterTenantRequest,
    ) -> Result<(Tenant, StaffMember), TenantError> {
        let tenant_id = Uuid::new_v4();
        let now = self.clock.now();

        let tenant = Tenant {
            id: tenant_id,
            name: request.name,
            address: request.address,
            contact_email: request.contact_email.clone(),
            contact_phone: request.contact_phone,
            license_number: request.license_number,
            status: TenantStatus::Active,
            created_at: now,
        };

        let admin = StaffMember {
            id: Uuid::new_v4(),
            tenant_id,
            first_name: "Hospital".to_string(),
            last_name: "Admin".to_string(),
            email: Some(request.contact_email),
            username: Some(format!("admin_{}", &tenant_id.to_string()[..6])),
            roles: vec![StaffRole::Admin],
            created_at: now,
        };
        let admin_clone = admin.clone();

        // The only way onboarding fails is losing the license uniqueness check.
        let tenant = self
            .db
            .insert_tenant(tenant, admin)
            .await
            .map_err(|_| TenantError::DuplicateLicense)?;

        info!("Tenant {} registered with admin {}", tenant.id, admin_clone.id);
        Ok((tenant, admin_clone))
    }

    pub async fn get_tenant(&self, tenant_id: Uuid) -> Result<Tenant, TenantError> {
        match self.db.tenant_by_id(tenant_id).await {
            Some(tenant) => Ok(tenant),
            None => {
                warn!("Tenant {} not found", tenant_id);
                Err(TenantError::NotFound)
            }
        }
    }
}

use std::sync::Arc;

use assert_matches::assert_matches;
use uuid::Uuid;

use shared_database::Database;
use shared_models::directory::StaffRole;
use shared_models::tenant::TenantStatus;
use tenant_cell::models::{RegisterTenantRequest, TenantError};
use tenant_cell::services::onboarding::TenantOnboardingService;

fn registration(license: &str) -> RegisterTenantRequest {
    RegisterTenantRequest {
        name: "St. Amara Hospital".to_string(),
        address: Some("12 Harbor Road".to_string()),
        contact_email: "contact@st-amara.example".to_string(),
        contact_phone: Some("+2348000000000".to_string()),
        license_number: license.to_string(),
    }
}

#[tokio::test]
async fn onboarding_creates_the_tenant_and_its_admin() {
    let db = Arc::new(Database::new());
    let onboarding = TenantOnboardingService::new(db.clone());

    let (tenant, admin) = onboarding
        .register_tenant(registration("HOSP-0001"))
        .await
        .unwrap();

    assert_eq!(tenant.status, TenantStatus::Active);
    assert_eq!(tenant.license_number, "HOSP-0001");

    assert_eq!(admin.tenant_id, tenant.id);
    assert!(admin.roles.contains(&StaffRole::Admin));
    assert!(admin
        .username
        .as_deref()
        .is_some_and(|name| name.starts_with("admin_")));

    // Both rows landed atomically
    assert!(db.tenant_by_id(tenant.id).await.is_some());
    assert!(db.staff_owned_by(tenant.id, admin.id).await.is_some());
}

#[tokio::test]
async fn license_numbers_are_globally_unique() {
    let db = Arc::new(Database::new());
    let onboarding = TenantOnboardingService::new(db);

    onboarding
        .register_tenant(registration("HOSP-0002"))
        .await
        .unwrap();

    assert_matches!(
        onboarding.register_tenant(registration("HOSP-0002")).await,
        Err(TenantError::DuplicateLicense)
    );

    // A different license is fine
    assert!(onboarding
        .register_tenant(registration("HOSP-0003"))
        .await
        .is_ok());
}

#[tokio::test]
async fn tenant_lookup_is_by_resolved_identity() {
    let db = Arc::new(Database::new());
    let onboarding = TenantOnboardingService::new(db);

    let (tenant, _) = onboarding
        .register_tenant(registration("HOSP-0004"))
        .await
        .unwrap();

    assert_eq!(onboarding.get_tenant(tenant.id).await.unwrap().id, tenant.id);
    assert_matches!(
        onboarding.get_tenant(Uuid::new_v4()).await,
        Err(TenantError::NotFound)
    );
}

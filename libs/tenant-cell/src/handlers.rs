// libs/tenant-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};

use shared_database::Database;
use shared_models::auth::AuthContext;
use shared_models::error::AppError;

use crate::models::RegisterTenantRequest;
use crate::services::onboarding::TenantOnboardingService;

/// The only unauthenticated operation in the system: there is no tenant
/// identity before onboarding.
#[axum::debug_handler]
pub async fn register_tenant(
    State(db): State<Arc<Database>>,
    Json(request): Json<RegisterTenantRequest>,
) -> Result<Json<Value>, AppError> {
    let onboarding = TenantOnboardingService::new(db);

    let (tenant, admin) = onboarding.register_tenant(request).await?;

    Ok(Json(json!({
        "message": "Tenant registered successfully",
        "tenant": {
            "id": tenant.id,
            "name": tenant.name,
            "status": tenant.status,
        },
        "admin": {
            "id": admin.id,
            "username": admin.username,
            "email": admin.email,
            "roles": admin.roles,
        }
    })))
}

/// Details of the caller's own tenant. The id comes from the authenticated
/// identity, never from the request.
#[axum::debug_handler]
pub async fn get_own_tenant(
    State(db): State<Arc<Database>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Value>, AppError> {
    let onboarding = TenantOnboardingService::new(db);

    let tenant = onboarding.get_tenant(ctx.tenant_id).await?;

    Ok(Json(json!({ "tenant": tenant })))
}

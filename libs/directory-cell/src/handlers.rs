// libs/directory-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};

use shared_database::Database;
use shared_models::auth::AuthContext;
use shared_models::error::AppError;

use crate::models::{CreatePatientRequest, CreateStaffRequest};
use crate::services::registry::DirectoryService;

#[axum::debug_handler]
pub async fn create_patient(
    State(db): State<Arc<Database>>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let directory = DirectoryService::new(db);

    let patient = directory.create_patient(ctx.tenant_id, request).await;

    Ok(Json(json!({
        "message": "Patient registered successfully",
        "patient": patient
    })))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(db): State<Arc<Database>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Value>, AppError> {
    let directory = DirectoryService::new(db);

    let patients = directory.list_patients(ctx.tenant_id).await;

    Ok(Json(json!({ "patients": patients })))
}

#[axum::debug_handler]
pub async fn create_staff(
    State(db): State<Arc<Database>>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<CreateStaffRequest>,
) -> Result<Json<Value>, AppError> {
    let directory = DirectoryService::new(db);

    let member = directory.create_staff(ctx.tenant_id, request).await;

    Ok(Json(json!({
        "message": "Staff member registered successfully",
        "staff": member
    })))
}

#[axum::debug_handler]
pub async fn list_staff(
    State(db): State<Arc<Database>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Value>, AppError> {
    let directory = DirectoryService::new(db);

    let staff = directory.list_staff(ctx.tenant_id).await;

    Ok(Json(json!({ "staff": staff })))
}

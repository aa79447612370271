// libs/billing-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::Database;
use shared_models::auth::AuthContext;
use shared_models::error::AppError;

use crate::models::{AddPaymentRequest, CreateBillRequest};
use crate::services::ledger::BillingLedgerService;

#[axum::debug_handler]
pub async fn create_bill(
    State(db): State<Arc<Database>>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<CreateBillRequest>,
) -> Result<Json<Value>, AppError> {
    let ledger = BillingLedgerService::new(db);

    let bill = ledger.create_bill(ctx.tenant_id, request).await?;

    Ok(Json(json!({
        "message": "Bill created successfully",
        "bill": bill
    })))
}

#[axum::debug_handler]
pub async fn get_bills(
    State(db): State<Arc<Database>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Value>, AppError> {
    let ledger = BillingLedgerService::new(db);

    let bills = ledger.get_bills(ctx.tenant_id).await;

    Ok(Json(json!({ "bills": bills })))
}

#[axum::debug_handler]
pub async fn get_patient_bills(
    State(db): State<Arc<Database>>,
    Path(patient_id): Path<Uuid>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Value>, AppError> {
    let ledger = BillingLedgerService::new(db);

    let bills = ledger.get_patient_bills(ctx.tenant_id, patient_id).await;

    Ok(Json(json!({ "bills": bills })))
}

#[axum::debug_handler]
pub async fn add_payment(
    State(db): State<Arc<Database>>,
    Path(bill_id): Path<Uuid>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<AddPaymentRequest>,
) -> Result<Json<Value>, AppError> {
    let ledger = BillingLedgerService::new(db);

    let bill = ledger
        .add_payment(ctx.tenant_id, bill_id, request.amount)
        .await?;

    Ok(Json(json!({
        "message": "Payment updated",
        "bill": bill
    })))
}

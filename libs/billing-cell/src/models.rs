// libs/billing-cell/src/models.rs
use serde::Deserialize;
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct BillItemRequest {
    pub title: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBillRequest {
    pub patient_id: Uuid,
    pub items: Vec<BillItemRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddPaymentRequest {
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BillingError {
    #[error("Invalid patient")]
    InvalidPatient,

    #[error("Bill not found")]
    NotFound,

    #[error("Payment amount must be greater than zero.")]
    InvalidAmount,

    #[error("Payment exceeds the due amount. Remaining due is {due}.")]
    PaymentExceedsDue { due: i64 },
}

impl From<BillingError> for AppError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::NotFound => AppError::NotFound(err.to_string()),
            BillingError::PaymentExceedsDue { .. } => AppError::Conflict(err.to_string()),
            _ => AppError::BadRequest(err.to_string()),
        }
    }
}

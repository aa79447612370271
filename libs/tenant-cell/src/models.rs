// libs/tenant-cell/src/models.rs
use serde::Deserialize;

use shared_models::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterTenantRequest {
    pub name: String,
    pub address: Option<String>,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub license_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TenantError {
    #[error("A tenant with this license number already exists.")]
    DuplicateLicense,

    #[error("Tenant not found")]
    NotFound,
}

impl From<TenantError> for AppError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::DuplicateLicense => AppError::Conflict(err.to_string()),
            TenantError::NotFound => AppError::NotFound(err.to_string()),
        }
    }
}

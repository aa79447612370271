// libs/directory-cell/src/models.rs
use serde::Deserialize;

use shared_models::directory::StaffRole;

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateStaffRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub roles: Vec<StaffRole>,
}

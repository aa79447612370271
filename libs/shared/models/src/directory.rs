use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    #[serde(alias = "admin")]
    Admin,
    #[serde(alias = "doctor")]
    Doctor,
    #[serde(alias = "nurse")]
    Nurse,
    #[serde(alias = "receptionist")]
    Receptionist,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub roles: Vec<StaffRole>,
    pub created_at: DateTime<Utc>,
}

impl StaffMember {
    pub fn is_doctor(&self) -> bool {
        self.roles.contains(&StaffRole::Doctor)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub patient_uid: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

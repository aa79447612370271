use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenantStatus {
    Active,
    Suspended,
}

/// An isolated hospital/organization. Immutable after onboarding in this
/// core; the license number is unique across all tenants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub license_number: String,
    pub status: TenantStatus,
    pub created_at: DateTime<Utc>,
}

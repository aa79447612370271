use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    Unpaid,
    Partial,
    Paid,
}

/// A single charge on a bill. Amounts are integer minor units; line items
/// are fixed at bill creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillItem {
    pub id: Uuid,
    pub title: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub patient_id: Uuid,
    pub items: Vec<BillItem>,
    pub total_amount: i64,
    pub paid_amount: i64,
    pub due_amount: i64,
    pub status: BillStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    /// Status derived from the ledger: paid off when nothing is due,
    /// untouched when nothing was paid, partial otherwise.
    pub fn derived_status(paid_amount: i64, due_amount: i64) -> BillStatus {
        if due_amount == 0 {
            BillStatus::Paid
        } else if paid_amount == 0 {
            BillStatus::Unpaid
        } else {
            BillStatus::Partial
        }
    }
}

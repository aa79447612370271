// libs/billing-cell/src/services/ledger.rs
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::Database;
use shared_models::billing::{Bill, BillItem, BillStatus};
use shared_utils::clock::{Clock, SystemClock};

use crate::models::{BillingError, CreateBillRequest};

/// The bill payment ledger. Bills are created with their line items fixed;
/// monetary state only ever changes by appending payments, and the
/// read-modify-write of a payment runs atomically inside the store.
pub struct BillingLedgerService {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
}

impl BillingLedgerService {
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    pub fn with_clock(db: Arc<Database>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub async fn create_bill(
        &self,
        tenant_id: Uuid,
        request: CreateBillRequest,
    ) -> Result<Bill, BillingError> {
        self.db
            .patient_owned_by(tenant_id, request.patient_id)
            .await
            .ok_or(BillingError::InvalidPatient)?;

        let total_amount: i64 = request.items.iter().map(|item| item.amount).sum();
        let now = self.clock.now();

        let bill = Bill {
            id: Uuid::new_v4(),
            tenant_id,
            patient_id: request.patient_id,
            items: request
                .items
                .into_iter()
                .map(|item| BillItem {
                    id: Uuid::new_v4(),
                    title: item.title,
                    amount: item.amount,
                })
                .collect(),
            total_amount,
            paid_amount: 0,
            due_amount: total_amount,
            status: BillStatus::Unpaid,
            created_at: now,
            updated_at: now,
        };

        let bill = self.db.insert_bill(bill).await;
        info!("Bill {} created with total {}", bill.id, bill.total_amount);
        Ok(bill)
    }

    /// Applies one payment. The amount check against the current due amount
    /// and the ledger update happen under the same write lock, so two
    /// concurrent payments cannot both spend the same remaining due.
    pub async fn add_payment(
        &self,
        tenant_id: Uuid,
        bill_id: Uuid,
        amount: i64,
    ) -> Result<Bill, BillingError> {
        if amount <= 0 {
            warn!("Rejected non-positive payment {} on bill {}", amount, bill_id);
            return Err(BillingError::InvalidAmount);
        }

        let now = self.clock.now();
        let updated = self
            .db
            .update_bill(tenant_id, bill_id, |bill| {
                if amount > bill.due_amount {
                    return Err(BillingError::PaymentExceedsDue {
                        due: bill.due_amount,
                    });
                }

                bill.paid_amount += amount;
                bill.due_amount = bill.total_amount - bill.paid_amount;
                bill.status = Bill::derived_status(bill.paid_amount, bill.due_amount);
                bill.updated_at = now;
                Ok(())
            })
            .await?
            .ok_or(BillingError::NotFound)?;

        info!(
            "Payment of {} applied to bill {} (paid {}, due {})",
            amount, bill_id, updated.paid_amount, updated.due_amount
        );
        Ok(updated)
    }

    pub async fn get_bills(&self, tenant_id: Uuid) -> Vec<Bill> {
        debug!("Listing bills for tenant {}", tenant_id);
        let mut bills = self.db.bills_for_tenant(tenant_id).await;
        bills.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bills
    }

    pub async fn get_patient_bills(&self, tenant_id: Uuid, patient_id: Uuid) -> Vec<Bill> {
        let mut bills = self.db.bills_for_patient(tenant_id, patient_id).await;
        bills.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bills
    }
}

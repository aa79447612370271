use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_database::Database;
use shared_models::scheduling::TimeSlot;

/// Point-in-time check for whether a doctor's slot is already held by an
/// active appointment in the same tenant. `exclude_appointment_id` lets an
/// edit skip the appointment being edited.
///
/// This read is advisory: the storage insert/update repeats it under the
/// write lock, so two requests that both see "free" still serialize there.
pub struct ConflictDetectionService {
    db: Arc<Database>,
}

impl ConflictDetectionService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn is_slot_taken(
        &self,
        tenant_id: Uuid,
        doctor_id: Uuid,
        date: NaiveDate,
        time: Option<TimeSlot>,
        exclude_appointment_id: Option<Uuid>,
    ) -> bool {
        debug!(
            "Checking slot for doctor {} on {} at {:?}",
            doctor_id, date, time
        );

        let taken = self
            .db
            .slot_taken(tenant_id, doctor_id, date, time, exclude_appointment_id)
            .await;

        if taken {
            warn!(
                "Slot conflict for doctor {} on {} at {:?}",
                doctor_id, date, time
            );
        }

        taken
    }
}

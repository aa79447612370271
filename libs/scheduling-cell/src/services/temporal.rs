use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use shared_models::scheduling::TimeSlot;
use shared_utils::clock::Clock;

use crate::models::SchedulingError;

/// Validates a proposed appointment date/time against "now".
///
/// Date comparisons are date-only; a time is mandatory for same-day bookings
/// and the same-day instant must not lie before the current one. For future
/// dates any time of day is acceptable.
pub struct TemporalPolicy {
    clock: Arc<dyn Clock>,
}

impl TemporalPolicy {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn validate(&self, date: NaiveDate, time: Option<TimeSlot>) -> Result<(), SchedulingError> {
        let now = self.clock.now();
        let today = now.date_naive();

        if date < today {
            debug!("Rejected past date {}", date);
            return Err(SchedulingError::PastDate);
        }

        if date == today {
            let Some(slot) = time else {
                return Err(SchedulingError::TimeRequired);
            };
            let instant = date.and_time(slot.as_time()).and_utc();
            if instant < now {
                debug!("Rejected past time {} on {}", slot, date);
                return Err(SchedulingError::PastTime);
            }
        }

        Ok(())
    }
}

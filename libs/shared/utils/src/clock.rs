use chrono::{DateTime, Utc};

/// Source of "now" for temporal validation. Injected so that boundary
/// conditions (same-day bookings, past-appointment guards) are testable
/// without racing the wall clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

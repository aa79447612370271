use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// A booking slot within a day, carried on the wire as `"HH:MM"`. Distinct
/// from the appointment date; the pair identifies the slot a doctor occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(NaiveTime);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("time must be in HH:MM format")]
pub struct InvalidTimeSlot;

impl TimeSlot {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(TimeSlot)
    }

    pub fn as_time(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for TimeSlot {
    type Err = InvalidTimeSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s, "%H:%M")
            .map(TimeSlot)
            .map_err(|_| InvalidTimeSlot)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    #[serde(alias = "scheduled")]
    Scheduled,
    #[serde(alias = "completed")]
    Completed,
    #[serde(alias = "cancelled")]
    Cancelled,
}

impl AppointmentStatus {
    /// Only scheduled appointments occupy their slot; completed and cancelled
    /// ones free it.
    pub fn occupies_slot(&self) -> bool {
        matches!(self, AppointmentStatus::Scheduled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "SCHEDULED"),
            AppointmentStatus::Completed => write!(f, "COMPLETED"),
            AppointmentStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown appointment status")]
pub struct UnknownStatus;

impl FromStr for AppointmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("SCHEDULED") {
            Ok(AppointmentStatus::Scheduled)
        } else if s.eq_ignore_ascii_case("COMPLETED") {
            Ok(AppointmentStatus::Completed)
        } else if s.eq_ignore_ascii_case("CANCELLED") {
            Ok(AppointmentStatus::Cancelled)
        } else {
            Err(UnknownStatus)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: Option<TimeSlot>,
    pub reason: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// The date combined with the slot time (midnight when no time is
    /// stored), used for all past/future comparisons.
    pub fn effective_datetime(&self) -> DateTime<Utc> {
        let time = self
            .time
            .map(|slot| slot.as_time())
            .unwrap_or(NaiveTime::MIN);
        self.date.and_time(time).and_utc()
    }
}

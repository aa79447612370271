// libs/scheduling-cell/src/models.rs
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use shared_models::error::AppError;
use shared_models::scheduling::{AppointmentStatus, TimeSlot};

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: Option<TimeSlot>,
    pub reason: Option<String>,
}

/// Partial edit: absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditAppointmentRequest {
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub time: Option<TimeSlot>,
    pub reason: Option<String>,
}

/// The status arrives as a raw string so that unknown values surface as the
/// scheduling "Invalid status" error rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentFilter {
    pub date: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
    pub doctor_id: Option<Uuid>,
    #[serde(default)]
    pub today: bool,
    #[serde(default)]
    pub upcoming: bool,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulingError {
    #[error("Cannot book an appointment for a past date.")]
    PastDate,

    #[error("Cannot book an appointment for a past time.")]
    PastTime,

    #[error("Time is required for today's appointment.")]
    TimeRequired,

    #[error("Invalid patient")]
    InvalidPatient,

    #[error("Invalid doctor")]
    InvalidDoctor,

    #[error("Doctor is unavailable for this time slot.")]
    SlotUnavailable,

    #[error("Appointment not found")]
    NotFound,

    #[error("Cannot edit past appointments.")]
    PastAppointment,

    #[error("Invalid status")]
    InvalidStatus,

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Cannot delete past or completed appointments.")]
    NotDeletable,
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::NotFound => AppError::NotFound(err.to_string()),
            SchedulingError::SlotUnavailable => AppError::Conflict(err.to_string()),
            _ => AppError::BadRequest(err.to_string()),
        }
    }
}

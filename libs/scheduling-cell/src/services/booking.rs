// libs/scheduling-cell/src/services/booking.rs
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::{AppointmentChanges, Database, StorageError};
use shared_models::scheduling::{Appointment, AppointmentStatus};
use shared_utils::clock::{Clock, SystemClock};

use crate::models::{
    AppointmentFilter, CreateAppointmentRequest, EditAppointmentRequest, SchedulingError,
};
use crate::services::conflict::ConflictDetectionService;
use crate::services::lifecycle::TransitionPolicy;
use crate::services::query;
use crate::services::temporal::TemporalPolicy;

/// Orchestrates the appointment lifecycle: create, full edit, status update,
/// delete and the tenant-scoped reads. Every storage access below goes
/// through the caller's tenant id.
pub struct AppointmentBookingService {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
    temporal: TemporalPolicy,
    conflicts: ConflictDetectionService,
    transitions: TransitionPolicy,
}

impl AppointmentBookingService {
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    pub fn with_clock(db: Arc<Database>, clock: Arc<dyn Clock>) -> Self {
        let temporal = TemporalPolicy::new(Arc::clone(&clock));
        let conflicts = ConflictDetectionService::new(Arc::clone(&db));

        Self {
            db,
            clock,
            temporal,
            conflicts,
            transitions: TransitionPolicy::default(),
        }
    }

    pub fn with_transition_policy(mut self, policy: TransitionPolicy) -> Self {
        self.transitions = policy;
        self
    }

    /// Book a new appointment. Checks run in order (temporal validity,
    /// patient ownership, doctor ownership and role, slot occupancy) and the
    /// first failure wins. The storage insert re-checks the slot, so a
    /// concurrent booking that slips past the advisory check still surfaces
    /// as "doctor unavailable".
    pub async fn create_appointment(
        &self,
        tenant_id: Uuid,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        info!(
            "Booking appointment for patient {} with doctor {}",
            request.patient_id, request.doctor_id
        );

        self.temporal.validate(request.date, request.time)?;
        self.verify_patient(tenant_id, request.patient_id).await?;
        self.verify_doctor(tenant_id, request.doctor_id).await?;

        if self
            .conflicts
            .is_slot_taken(tenant_id, request.doctor_id, request.date, request.time, None)
            .await
        {
            return Err(SchedulingError::SlotUnavailable);
        }

        let now = self.clock.now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            tenant_id,
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            date: request.date,
            time: request.time,
            reason: request.reason,
            status: AppointmentStatus::Scheduled,
            created_at: now,
            updated_at: now,
        };

        // A constraint race loss is the same outcome as a failed pre-check.
        let appointment = self
            .db
            .insert_appointment(appointment)
            .await
            .map_err(|_| SchedulingError::SlotUnavailable)?;

        info!(
            "Appointment {} booked for {} at {:?}",
            appointment.id, appointment.date, appointment.time
        );
        Ok(appointment)
    }

    /// Full edit with partial-update semantics. An appointment whose own
    /// date/time already lies in the past cannot be edited at all.
    pub async fn edit_appointment(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        request: EditAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        debug!("Editing appointment {}", id);

        let current = self
            .db
            .appointment_owned_by(tenant_id, id)
            .await
            .ok_or(SchedulingError::NotFound)?;

        let now = self.clock.now();
        if current.effective_datetime() < now {
            warn!("Rejected edit of past appointment {}", id);
            return Err(SchedulingError::PastAppointment);
        }

        // Re-validate against "now" only when the schedule actually moves,
        // using the post-edit date/time pair.
        if request.date.is_some() || request.time.is_some() {
            let date = request.date.unwrap_or(current.date);
            let time = request.time.or(current.time);
            self.temporal.validate(date, time)?;
        }

        if let Some(patient_id) = request.patient_id {
            if patient_id != current.patient_id {
                self.verify_patient(tenant_id, patient_id).await?;
            }
        }
        if let Some(doctor_id) = request.doctor_id {
            if doctor_id != current.doctor_id {
                self.verify_doctor(tenant_id, doctor_id).await?;
            }
        }

        let doctor_id = request.doctor_id.unwrap_or(current.doctor_id);
        let date = request.date.unwrap_or(current.date);
        let time = request.time.or(current.time);

        if time.is_some()
            && self
                .conflicts
                .is_slot_taken(tenant_id, doctor_id, date, time, Some(id))
                .await
        {
            return Err(SchedulingError::SlotUnavailable);
        }

        let changes = AppointmentChanges {
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            date: request.date,
            time: request.time,
            reason: request.reason,
        };

        let updated = self
            .db
            .update_appointment(tenant_id, id, changes, now)
            .await
            .map_err(|err| match err {
                StorageError::SlotTaken => SchedulingError::SlotUnavailable,
                _ => SchedulingError::NotFound,
            })?;

        info!("Appointment {} updated", id);
        Ok(updated)
    }

    /// Status-only transition. More permissive than a full edit: no temporal
    /// precondition applies, and the allowed-transition set is whatever the
    /// configured policy says.
    pub async fn update_status(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        status: &str,
    ) -> Result<Appointment, SchedulingError> {
        let status: AppointmentStatus =
            status.parse().map_err(|_| SchedulingError::InvalidStatus)?;

        let current = self
            .db
            .appointment_owned_by(tenant_id, id)
            .await
            .ok_or(SchedulingError::NotFound)?;

        self.transitions.validate(current.status, status)?;

        let updated = self
            .db
            .set_appointment_status(tenant_id, id, status, self.clock.now())
            .await
            .map_err(|err| match err {
                StorageError::SlotTaken => SchedulingError::SlotUnavailable,
                _ => SchedulingError::NotFound,
            })?;

        info!("Appointment {} moved to {}", id, status);
        Ok(updated)
    }

    /// Removes an appointment permanently. Only future, still-scheduled
    /// appointments qualify.
    pub async fn delete_appointment(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<(), SchedulingError> {
        let current = self
            .db
            .appointment_owned_by(tenant_id, id)
            .await
            .ok_or(SchedulingError::NotFound)?;

        if current.status != AppointmentStatus::Scheduled
            || current.effective_datetime() < self.clock.now()
        {
            warn!("Rejected delete of appointment {} ({})", id, current.status);
            return Err(SchedulingError::NotDeletable);
        }

        self.db
            .delete_appointment(tenant_id, id)
            .await
            .map_err(|_| SchedulingError::NotFound)?;

        info!("Appointment {} deleted", id);
        Ok(())
    }

    pub async fn get_appointment(&self, tenant_id: Uuid, id: Uuid) -> Option<Appointment> {
        self.db.appointment_owned_by(tenant_id, id).await
    }

    pub async fn list_appointments(
        &self,
        tenant_id: Uuid,
        filter: &AppointmentFilter,
    ) -> Vec<Appointment> {
        let rows = self.db.appointments_for_tenant(tenant_id).await;
        query::filter_appointments(rows, filter, self.clock.now())
    }

    pub async fn doctor_appointments(
        &self,
        tenant_id: Uuid,
        doctor_id: Uuid,
    ) -> Vec<Appointment> {
        let filter = AppointmentFilter {
            doctor_id: Some(doctor_id),
            ..Default::default()
        };
        self.list_appointments(tenant_id, &filter).await
    }

    async fn verify_patient(
        &self,
        tenant_id: Uuid,
        patient_id: Uuid,
    ) -> Result<(), SchedulingError> {
        self.db
            .patient_owned_by(tenant_id, patient_id)
            .await
            .map(|_| ())
            .ok_or(SchedulingError::InvalidPatient)
    }

    async fn verify_doctor(
        &self,
        tenant_id: Uuid,
        doctor_id: Uuid,
    ) -> Result<(), SchedulingError> {
        let member = self
            .db
            .staff_owned_by(tenant_id, doctor_id)
            .await
            .ok_or(SchedulingError::InvalidDoctor)?;
        if !member.is_doctor() {
            return Err(SchedulingError::InvalidDoctor);
        }
        Ok(())
    }
}

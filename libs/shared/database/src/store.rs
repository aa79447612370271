// libs/shared/database/src/store.rs
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::billing::Bill;
use shared_models::directory::{Patient, StaffMember};
use shared_models::scheduling::{Appointment, AppointmentStatus, TimeSlot};
use shared_models::tenant::Tenant;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("appointment slot is already booked")]
    SlotTaken,

    #[error("a tenant with this license number already exists")]
    DuplicateLicense,

    #[error("row not found")]
    NotFound,
}

/// Fields of an appointment edit. `None` leaves the stored value untouched;
/// there is no way to clear a field through an edit.
#[derive(Debug, Clone, Default)]
pub struct AppointmentChanges {
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub time: Option<TimeSlot>,
    pub reason: Option<String>,
}

#[derive(Default)]
struct Tables {
    tenants: HashMap<Uuid, Tenant>,
    staff: HashMap<Uuid, StaffMember>,
    patients: HashMap<Uuid, Patient>,
    appointments: HashMap<Uuid, Appointment>,
    bills: HashMap<Uuid, Bill>,
}

impl Tables {
    /// The conditional uniqueness rule for active appointments: one SCHEDULED
    /// row per (tenant, doctor, date, time). An absent time is a slot value of
    /// its own.
    fn slot_taken(
        &self,
        tenant_id: Uuid,
        doctor_id: Uuid,
        date: NaiveDate,
        time: Option<TimeSlot>,
        exclude: Option<Uuid>,
    ) -> bool {
        self.appointments.values().any(|appt| {
            appt.tenant_id == tenant_id
                && appt.doctor_id == doctor_id
                && appt.date == date
                && appt.time == time
                && appt.status.occupies_slot()
                && Some(appt.id) != exclude
        })
    }
}

/// Single-node transactional store. The write lock is the transaction: every
/// check-then-write the scheduling and billing cells rely on happens inside
/// one lock acquisition, so concurrent requests serialize at the storage
/// boundary exactly like rows behind a conditional unique constraint.
///
/// Every accessor takes the caller's tenant id. Lookups without a tenant
/// filter are deliberately not part of the API.
#[derive(Default)]
pub struct Database {
    tables: RwLock<Tables>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Tenants
    // ------------------------------------------------------------------

    /// Inserts a tenant together with its bootstrap admin in one critical
    /// section, enforcing global license-number uniqueness.
    pub async fn insert_tenant(
        &self,
        tenant: Tenant,
        admin: StaffMember,
    ) -> Result<Tenant, StorageError> {
        let mut tables = self.tables.write().await;

        let duplicate = tables
            .tenants
            .values()
            .any(|existing| existing.license_number == tenant.license_number);
        if duplicate {
            warn!("Rejected tenant with duplicate license {}", tenant.license_number);
            return Err(StorageError::DuplicateLicense);
        }

        tables.tenants.insert(tenant.id, tenant.clone());
        tables.staff.insert(admin.id, admin);
        debug!("Tenant {} onboarded", tenant.id);
        Ok(tenant)
    }

    pub async fn tenant_by_id(&self, tenant_id: Uuid) -> Option<Tenant> {
        let tables = self.tables.read().await;
        tables.tenants.get(&tenant_id).cloned()
    }

    // ------------------------------------------------------------------
    // Directory
    // ------------------------------------------------------------------

    pub async fn insert_patient(&self, patient: Patient) -> Patient {
        let mut tables = self.tables.write().await;
        tables.patients.insert(patient.id, patient.clone());
        patient
    }

    pub async fn insert_staff(&self, member: StaffMember) -> StaffMember {
        let mut tables = self.tables.write().await;
        tables.staff.insert(member.id, member.clone());
        member
    }

    pub async fn patient_owned_by(&self, tenant_id: Uuid, patient_id: Uuid) -> Option<Patient> {
        let tables = self.tables.read().await;
        tables
            .patients
            .get(&patient_id)
            .filter(|patient| patient.tenant_id == tenant_id)
            .cloned()
    }

    pub async fn staff_owned_by(&self, tenant_id: Uuid, staff_id: Uuid) -> Option<StaffMember> {
        let tables = self.tables.read().await;
        tables
            .staff
            .get(&staff_id)
            .filter(|member| member.tenant_id == tenant_id)
            .cloned()
    }

    pub async fn patients_for_tenant(&self, tenant_id: Uuid) -> Vec<Patient> {
        let tables = self.tables.read().await;
        tables
            .patients
            .values()
            .filter(|patient| patient.tenant_id == tenant_id)
            .cloned()
            .collect()
    }

    pub async fn staff_for_tenant(&self, tenant_id: Uuid) -> Vec<StaffMember> {
        let tables = self.tables.read().await;
        tables
            .staff
            .values()
            .filter(|member| member.tenant_id == tenant_id)
            .cloned()
            .collect()
    }

    // ------------------------------------------------------------------
    // Appointments
    // ------------------------------------------------------------------

    pub async fn appointment_owned_by(&self, tenant_id: Uuid, id: Uuid) -> Option<Appointment> {
        let tables = self.tables.read().await;
        tables
            .appointments
            .get(&id)
            .filter(|appt| appt.tenant_id == tenant_id)
            .cloned()
    }

    pub async fn appointments_for_tenant(&self, tenant_id: Uuid) -> Vec<Appointment> {
        let tables = self.tables.read().await;
        tables
            .appointments
            .values()
            .filter(|appt| appt.tenant_id == tenant_id)
            .cloned()
            .collect()
    }

    /// Point-in-time occupancy probe. Advisory only: the authoritative check
    /// is repeated inside `insert_appointment`/`update_appointment`.
    pub async fn slot_taken(
        &self,
        tenant_id: Uuid,
        doctor_id: Uuid,
        date: NaiveDate,
        time: Option<TimeSlot>,
        exclude: Option<Uuid>,
    ) -> bool {
        let tables = self.tables.read().await;
        tables.slot_taken(tenant_id, doctor_id, date, time, exclude)
    }

    /// Inserts a new appointment, re-checking slot occupancy under the write
    /// lock. Two concurrent inserts for the same slot serialize here and the
    /// loser gets `SlotTaken`.
    pub async fn insert_appointment(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, StorageError> {
        let mut tables = self.tables.write().await;

        if appointment.status.occupies_slot()
            && tables.slot_taken(
                appointment.tenant_id,
                appointment.doctor_id,
                appointment.date,
                appointment.time,
                None,
            )
        {
            warn!(
                "Slot conflict on insert for doctor {} at {} {:?}",
                appointment.doctor_id, appointment.date, appointment.time
            );
            return Err(StorageError::SlotTaken);
        }

        tables
            .appointments
            .insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    /// Applies a partial edit, re-checking the post-edit slot (excluding the
    /// edited row) under the write lock.
    pub async fn update_appointment(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        changes: AppointmentChanges,
        now: DateTime<Utc>,
    ) -> Result<Appointment, StorageError> {
        let mut tables = self.tables.write().await;

        let current = tables
            .appointments
            .get(&id)
            .filter(|appt| appt.tenant_id == tenant_id)
            .cloned()
            .ok_or(StorageError::NotFound)?;

        let doctor_id = changes.doctor_id.unwrap_or(current.doctor_id);
        let date = changes.date.unwrap_or(current.date);
        let time = changes.time.or(current.time);

        if time.is_some() && tables.slot_taken(tenant_id, doctor_id, date, time, Some(id)) {
            warn!(
                "Slot conflict on edit of appointment {} for doctor {} at {} {:?}",
                id, doctor_id, date, time
            );
            return Err(StorageError::SlotTaken);
        }

        let appt = tables
            .appointments
            .get_mut(&id)
            .ok_or(StorageError::NotFound)?;
        if let Some(patient_id) = changes.patient_id {
            appt.patient_id = patient_id;
        }
        appt.doctor_id = doctor_id;
        appt.date = date;
        appt.time = time;
        if let Some(reason) = changes.reason {
            appt.reason = Some(reason);
        }
        appt.updated_at = now;

        Ok(appt.clone())
    }

    /// Sets the status. Reviving a row to SCHEDULED goes back under the
    /// conditional uniqueness rule, so it fails if the slot was taken in the
    /// meantime.
    pub async fn set_appointment_status(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        status: AppointmentStatus,
        now: DateTime<Utc>,
    ) -> Result<Appointment, StorageError> {
        let mut tables = self.tables.write().await;

        let current = tables
            .appointments
            .get(&id)
            .filter(|appt| appt.tenant_id == tenant_id)
            .cloned()
            .ok_or(StorageError::NotFound)?;

        if status.occupies_slot()
            && !current.status.occupies_slot()
            && tables.slot_taken(tenant_id, current.doctor_id, current.date, current.time, Some(id))
        {
            warn!("Slot conflict on revival of appointment {}", id);
            return Err(StorageError::SlotTaken);
        }

        let appt = tables
            .appointments
            .get_mut(&id)
            .ok_or(StorageError::NotFound)?;
        appt.status = status;
        appt.updated_at = now;
        Ok(appt.clone())
    }

    pub async fn delete_appointment(&self, tenant_id: Uuid, id: Uuid) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;

        let owned = tables
            .appointments
            .get(&id)
            .is_some_and(|appt| appt.tenant_id == tenant_id);
        if !owned {
            return Err(StorageError::NotFound);
        }

        tables.appointments.remove(&id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Bills
    // ------------------------------------------------------------------

    pub async fn insert_bill(&self, bill: Bill) -> Bill {
        let mut tables = self.tables.write().await;
        tables.bills.insert(bill.id, bill.clone());
        bill
    }

    pub async fn bills_for_tenant(&self, tenant_id: Uuid) -> Vec<Bill> {
        let tables = self.tables.read().await;
        tables
            .bills
            .values()
            .filter(|bill| bill.tenant_id == tenant_id)
            .cloned()
            .collect()
    }

    pub async fn bills_for_patient(&self, tenant_id: Uuid, patient_id: Uuid) -> Vec<Bill> {
        let tables = self.tables.read().await;
        tables
            .bills
            .values()
            .filter(|bill| bill.tenant_id == tenant_id && bill.patient_id == patient_id)
            .cloned()
            .collect()
    }

    /// Atomic read-modify-write over one bill. The closure runs under the
    /// write lock, so a concurrent payment cannot observe the pre-update
    /// ledger. Returns `Ok(None)` when the bill does not exist for the
    /// tenant.
    pub async fn update_bill<E>(
        &self,
        tenant_id: Uuid,
        bill_id: Uuid,
        f: impl FnOnce(&mut Bill) -> Result<(), E>,
    ) -> Result<Option<Bill>, E> {
        let mut tables = self.tables.write().await;

        let Some(bill) = tables
            .bills
            .get_mut(&bill_id)
            .filter(|bill| bill.tenant_id == tenant_id)
        else {
            return Ok(None);
        };

        f(bill)?;
        Ok(Some(bill.clone()))
    }
}

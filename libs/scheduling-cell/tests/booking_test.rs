use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use scheduling_cell::models::{
    AppointmentFilter, CreateAppointmentRequest, EditAppointmentRequest, SchedulingError,
};
use scheduling_cell::services::booking::AppointmentBookingService;
use scheduling_cell::services::lifecycle::TransitionPolicy;
use shared_database::Database;
use shared_models::scheduling::{AppointmentStatus, TimeSlot};
use shared_utils::test_utils::{
    seed_doctor, seed_hospital, seed_patient, FixedClock, HospitalFixture,
};

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
}

fn tomorrow() -> NaiveDate {
    (noon() + Duration::days(1)).date_naive()
}

struct Harness {
    db: Arc<Database>,
    clock: Arc<FixedClock>,
    service: AppointmentBookingService,
    hospital: HospitalFixture,
}

async fn harness() -> Harness {
    let db = Arc::new(Database::new());
    let clock = Arc::new(FixedClock::at(noon()));
    let service = AppointmentBookingService::with_clock(db.clone(), clock.clone());
    let hospital = seed_hospital(&db).await;
    Harness {
        db,
        clock,
        service,
        hospital,
    }
}

fn booking(h: &Harness, date: NaiveDate, time: Option<TimeSlot>) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        patient_id: h.hospital.patient_id,
        doctor_id: h.hospital.doctor_id,
        date,
        time,
        reason: Some("Routine checkup".to_string()),
    }
}

// ------------------------------------------------------------------
// Creation and temporal policy
// ------------------------------------------------------------------

#[tokio::test]
async fn creates_and_reads_back_an_appointment() {
    let h = harness().await;

    let created = h
        .service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(10, 0)))
        .await
        .unwrap();

    assert_eq!(created.status, AppointmentStatus::Scheduled);
    assert_eq!(created.tenant_id, h.hospital.tenant_id);
    assert_eq!(created.date, tomorrow());
    assert_eq!(created.time, TimeSlot::new(10, 0));

    let fetched = h
        .service
        .get_appointment(h.hospital.tenant_id, created.id)
        .await
        .unwrap();
    assert_eq!(fetched.id, created.id);
}

#[tokio::test]
async fn rejects_bookings_in_the_past() {
    let h = harness().await;
    let yesterday = (noon() - Duration::days(1)).date_naive();

    assert_matches!(
        h.service
            .create_appointment(h.hospital.tenant_id, booking(&h, yesterday, TimeSlot::new(10, 0)))
            .await,
        Err(SchedulingError::PastDate)
    );

    // One minute ago on the current day
    assert_matches!(
        h.service
            .create_appointment(
                h.hospital.tenant_id,
                booking(&h, noon().date_naive(), TimeSlot::new(11, 59))
            )
            .await,
        Err(SchedulingError::PastTime)
    );

    // One minute from now is fine
    assert!(h
        .service
        .create_appointment(
            h.hospital.tenant_id,
            booking(&h, noon().date_naive(), TimeSlot::new(12, 1))
        )
        .await
        .is_ok());
}

#[tokio::test]
async fn same_day_booking_requires_a_time() {
    let h = harness().await;

    assert_matches!(
        h.service
            .create_appointment(h.hospital.tenant_id, booking(&h, noon().date_naive(), None))
            .await,
        Err(SchedulingError::TimeRequired)
    );
}

// ------------------------------------------------------------------
// Slot exclusivity
// ------------------------------------------------------------------

#[tokio::test]
async fn a_scheduled_slot_cannot_be_double_booked() {
    let h = harness().await;
    let slot = TimeSlot::new(10, 0);

    h.service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), slot))
        .await
        .unwrap();

    assert_matches!(
        h.service
            .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), slot))
            .await,
        Err(SchedulingError::SlotUnavailable)
    );

    // A different time, or a different doctor, is free
    assert!(h
        .service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(10, 30)))
        .await
        .is_ok());

    let other_doctor = seed_doctor(&h.db, h.hospital.tenant_id, "Ade", "Bello").await;
    let mut request = booking(&h, tomorrow(), slot);
    request.doctor_id = other_doctor;
    assert!(h
        .service
        .create_appointment(h.hospital.tenant_id, request)
        .await
        .is_ok());
}

#[tokio::test]
async fn concurrent_bookings_for_one_slot_admit_exactly_one() {
    let h = harness().await;
    let service = Arc::new(AppointmentBookingService::with_clock(
        h.db.clone(),
        h.clock.clone(),
    ));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        let request = booking(&h, tomorrow(), TimeSlot::new(9, 0));
        let tenant_id = h.hospital.tenant_id;
        handles.push(tokio::spawn(async move {
            service.create_appointment(tenant_id, request).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(err) => assert_eq!(err, SchedulingError::SlotUnavailable),
        }
    }
    assert_eq!(successes, 1);

    let filter = AppointmentFilter {
        doctor_id: Some(h.hospital.doctor_id),
        ..Default::default()
    };
    assert_eq!(
        h.service
            .list_appointments(h.hospital.tenant_id, &filter)
            .await
            .len(),
        1
    );
}

#[tokio::test]
async fn cancelling_frees_the_slot() {
    let h = harness().await;
    let slot = TimeSlot::new(14, 0);

    let first = h
        .service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), slot))
        .await
        .unwrap();

    h.service
        .update_status(h.hospital.tenant_id, first.id, "CANCELLED")
        .await
        .unwrap();

    assert!(h
        .service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), slot))
        .await
        .is_ok());
}

// ------------------------------------------------------------------
// Tenant isolation
// ------------------------------------------------------------------

#[tokio::test]
async fn cross_tenant_references_are_invalid() {
    let h = harness().await;
    let other = seed_hospital(&h.db).await;

    let mut request = booking(&h, tomorrow(), TimeSlot::new(10, 0));
    request.patient_id = other.patient_id;
    assert_matches!(
        h.service
            .create_appointment(h.hospital.tenant_id, request)
            .await,
        Err(SchedulingError::InvalidPatient)
    );

    let mut request = booking(&h, tomorrow(), TimeSlot::new(10, 0));
    request.doctor_id = other.doctor_id;
    assert_matches!(
        h.service
            .create_appointment(h.hospital.tenant_id, request)
            .await,
        Err(SchedulingError::InvalidDoctor)
    );
}

#[tokio::test]
async fn lookups_never_cross_the_tenant_boundary() {
    let h = harness().await;
    let other = seed_hospital(&h.db).await;

    let mut request = booking(&h, tomorrow(), TimeSlot::new(10, 0));
    request.patient_id = other.patient_id;
    request.doctor_id = other.doctor_id;
    let foreign = h
        .service
        .create_appointment(other.tenant_id, request)
        .await
        .unwrap();

    // Existence is indistinguishable from absence across the boundary
    assert!(h
        .service
        .get_appointment(h.hospital.tenant_id, foreign.id)
        .await
        .is_none());
    assert_matches!(
        h.service
            .delete_appointment(h.hospital.tenant_id, foreign.id)
            .await,
        Err(SchedulingError::NotFound)
    );
    assert!(h
        .service
        .list_appointments(h.hospital.tenant_id, &AppointmentFilter::default())
        .await
        .is_empty());
}

#[tokio::test]
async fn staff_without_the_doctor_role_is_not_schedulable() {
    let h = harness().await;

    let mut request = booking(&h, tomorrow(), TimeSlot::new(10, 0));
    request.doctor_id = h.hospital.admin_id;
    assert_matches!(
        h.service
            .create_appointment(h.hospital.tenant_id, request)
            .await,
        Err(SchedulingError::InvalidDoctor)
    );
}

// ------------------------------------------------------------------
// Editing
// ------------------------------------------------------------------

#[tokio::test]
async fn edit_applies_only_supplied_fields() {
    let h = harness().await;

    let created = h
        .service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(10, 0)))
        .await
        .unwrap();

    let edited = h
        .service
        .edit_appointment(
            h.hospital.tenant_id,
            created.id,
            EditAppointmentRequest {
                reason: Some("Follow-up visit".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(edited.reason.as_deref(), Some("Follow-up visit"));
    assert_eq!(edited.date, created.date);
    assert_eq!(edited.time, created.time);
    assert_eq!(edited.doctor_id, created.doctor_id);
    assert_eq!(edited.patient_id, created.patient_id);
}

#[tokio::test]
async fn edit_does_not_conflict_with_itself() {
    let h = harness().await;

    let created = h
        .service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(10, 0)))
        .await
        .unwrap();

    // Re-submitting the same slot is a no-op, not a conflict
    assert!(h
        .service
        .edit_appointment(
            h.hospital.tenant_id,
            created.id,
            EditAppointmentRequest {
                time: TimeSlot::new(10, 0),
                ..Default::default()
            },
        )
        .await
        .is_ok());
}

#[tokio::test]
async fn edit_into_an_occupied_slot_is_rejected() {
    let h = harness().await;

    h.service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(10, 0)))
        .await
        .unwrap();
    let second = h
        .service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(11, 0)))
        .await
        .unwrap();

    assert_matches!(
        h.service
            .edit_appointment(
                h.hospital.tenant_id,
                second.id,
                EditAppointmentRequest {
                    time: TimeSlot::new(10, 0),
                    ..Default::default()
                },
            )
            .await,
        Err(SchedulingError::SlotUnavailable)
    );
}

#[tokio::test]
async fn edit_cannot_move_an_appointment_into_the_past() {
    let h = harness().await;

    let created = h
        .service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(10, 0)))
        .await
        .unwrap();

    let yesterday = (noon() - Duration::days(1)).date_naive();
    assert_matches!(
        h.service
            .edit_appointment(
                h.hospital.tenant_id,
                created.id,
                EditAppointmentRequest {
                    date: Some(yesterday),
                    ..Default::default()
                },
            )
            .await,
        Err(SchedulingError::PastDate)
    );

    // Moving to today with a time that has already passed
    assert_matches!(
        h.service
            .edit_appointment(
                h.hospital.tenant_id,
                created.id,
                EditAppointmentRequest {
                    date: Some(noon().date_naive()),
                    time: TimeSlot::new(8, 0),
                    ..Default::default()
                },
            )
            .await,
        Err(SchedulingError::PastTime)
    );
}

#[tokio::test]
async fn past_appointments_are_frozen() {
    let h = harness().await;

    let created = h
        .service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(10, 0)))
        .await
        .unwrap();

    h.clock.set(noon() + Duration::days(2));

    assert_matches!(
        h.service
            .edit_appointment(
                h.hospital.tenant_id,
                created.id,
                EditAppointmentRequest {
                    reason: Some("Too late".to_string()),
                    ..Default::default()
                },
            )
            .await,
        Err(SchedulingError::PastAppointment)
    );
}

#[tokio::test]
async fn edit_can_move_to_a_new_patient_in_the_same_tenant() {
    let h = harness().await;

    let created = h
        .service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(10, 0)))
        .await
        .unwrap();

    let new_patient = seed_patient(&h.db, h.hospital.tenant_id, "Ngozi", "Eze").await;
    let edited = h
        .service
        .edit_appointment(
            h.hospital.tenant_id,
            created.id,
            EditAppointmentRequest {
                patient_id: Some(new_patient),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.patient_id, new_patient);
}

// ------------------------------------------------------------------
// Status updates
// ------------------------------------------------------------------

#[tokio::test]
async fn status_updates_are_permissive_by_default() {
    let h = harness().await;

    let created = h
        .service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(10, 0)))
        .await
        .unwrap();

    // A future appointment may be completed...
    let completed = h
        .service
        .update_status(h.hospital.tenant_id, created.id, "COMPLETED")
        .await
        .unwrap();
    assert_eq!(completed.status, AppointmentStatus::Completed);

    // ...and a terminal one may be brought back
    let revived = h
        .service
        .update_status(h.hospital.tenant_id, created.id, "SCHEDULED")
        .await
        .unwrap();
    assert_eq!(revived.status, AppointmentStatus::Scheduled);
}

#[tokio::test]
async fn a_cancelled_appointment_cannot_revive_into_an_occupied_slot() {
    let h = harness().await;
    let slot = TimeSlot::new(10, 0);

    let original = h
        .service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), slot))
        .await
        .unwrap();
    h.service
        .update_status(h.hospital.tenant_id, original.id, "CANCELLED")
        .await
        .unwrap();

    // Someone else takes the freed slot
    h.service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), slot))
        .await
        .unwrap();

    assert_matches!(
        h.service
            .update_status(h.hospital.tenant_id, original.id, "SCHEDULED")
            .await,
        Err(SchedulingError::SlotUnavailable)
    );
}

#[tokio::test]
async fn unknown_status_values_are_rejected() {
    let h = harness().await;

    let created = h
        .service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(10, 0)))
        .await
        .unwrap();

    assert_matches!(
        h.service
            .update_status(h.hospital.tenant_id, created.id, "RESCHEDULED")
            .await,
        Err(SchedulingError::InvalidStatus)
    );
}

#[tokio::test]
async fn restricted_policy_freezes_terminal_states() {
    let h = harness().await;
    let strict = AppointmentBookingService::with_clock(h.db.clone(), h.clock.clone())
        .with_transition_policy(TransitionPolicy::Restricted);

    let created = strict
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(10, 0)))
        .await
        .unwrap();

    strict
        .update_status(h.hospital.tenant_id, created.id, "CANCELLED")
        .await
        .unwrap();

    assert_matches!(
        strict
            .update_status(h.hospital.tenant_id, created.id, "SCHEDULED")
            .await,
        Err(SchedulingError::InvalidTransition { .. })
    );
}

// ------------------------------------------------------------------
// Deletion
// ------------------------------------------------------------------

#[tokio::test]
async fn delete_is_restricted_to_future_scheduled_appointments() {
    let h = harness().await;

    let future = h
        .service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(10, 0)))
        .await
        .unwrap();
    let completed = h
        .service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(11, 0)))
        .await
        .unwrap();
    h.service
        .update_status(h.hospital.tenant_id, completed.id, "COMPLETED")
        .await
        .unwrap();

    assert_matches!(
        h.service
            .delete_appointment(h.hospital.tenant_id, completed.id)
            .await,
        Err(SchedulingError::NotDeletable)
    );

    h.service
        .delete_appointment(h.hospital.tenant_id, future.id)
        .await
        .unwrap();
    assert!(h
        .service
        .get_appointment(h.hospital.tenant_id, future.id)
        .await
        .is_none());
}

#[tokio::test]
async fn delete_rejects_appointments_already_in_the_past() {
    let h = harness().await;

    let created = h
        .service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(10, 0)))
        .await
        .unwrap();

    h.clock.set(noon() + Duration::days(2));

    assert_matches!(
        h.service
            .delete_appointment(h.hospital.tenant_id, created.id)
            .await,
        Err(SchedulingError::NotDeletable)
    );
}

#[tokio::test]
async fn operations_on_unknown_appointments_report_not_found() {
    let h = harness().await;
    let unknown = Uuid::new_v4();

    assert_matches!(
        h.service
            .edit_appointment(h.hospital.tenant_id, unknown, EditAppointmentRequest::default())
            .await,
        Err(SchedulingError::NotFound)
    );
    assert_matches!(
        h.service
            .update_status(h.hospital.tenant_id, unknown, "COMPLETED")
            .await,
        Err(SchedulingError::NotFound)
    );
    assert_matches!(
        h.service.delete_appointment(h.hospital.tenant_id, unknown).await,
        Err(SchedulingError::NotFound)
    );
}

// ------------------------------------------------------------------
// Query layer
// ------------------------------------------------------------------

#[tokio::test]
async fn list_filters_are_stable_across_repeated_reads() {
    let h = harness().await;
    let today = noon().date_naive();

    h.service
        .create_appointment(h.hospital.tenant_id, booking(&h, today, TimeSlot::new(15, 0)))
        .await
        .unwrap();
    h.service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(9, 0)))
        .await
        .unwrap();

    let filter = AppointmentFilter {
        today: true,
        ..Default::default()
    };
    let first = h.service.list_appointments(h.hospital.tenant_id, &filter).await;
    let second = h.service.list_appointments(h.hospital.tenant_id, &filter).await;

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].date, today);
    assert_eq!(
        first.iter().map(|a| a.id).collect::<Vec<_>>(),
        second.iter().map(|a| a.id).collect::<Vec<_>>()
    );

    let upcoming = AppointmentFilter {
        upcoming: true,
        ..Default::default()
    };
    let upcoming_rows = h
        .service
        .list_appointments(h.hospital.tenant_id, &upcoming)
        .await;
    assert_eq!(upcoming_rows.len(), 1);
    assert_eq!(upcoming_rows[0].date, tomorrow());
}

#[tokio::test]
async fn listings_order_by_date_then_time() {
    let h = harness().await;
    let later = (noon() + Duration::days(2)).date_naive();

    h.service
        .create_appointment(h.hospital.tenant_id, booking(&h, later, TimeSlot::new(9, 0)))
        .await
        .unwrap();
    h.service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(14, 0)))
        .await
        .unwrap();
    h.service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(9, 30)))
        .await
        .unwrap();

    let rows = h
        .service
        .list_appointments(h.hospital.tenant_id, &AppointmentFilter::default())
        .await;
    let keys: Vec<_> = rows.iter().map(|a| (a.date, a.time)).collect();
    assert_eq!(
        keys,
        vec![
            (tomorrow(), TimeSlot::new(9, 30)),
            (tomorrow(), TimeSlot::new(14, 0)),
            (later, TimeSlot::new(9, 0)),
        ]
    );
}

#[tokio::test]
async fn doctor_listing_only_returns_that_doctors_appointments() {
    let h = harness().await;
    let other_doctor = seed_doctor(&h.db, h.hospital.tenant_id, "Ade", "Bello").await;

    h.service
        .create_appointment(h.hospital.tenant_id, booking(&h, tomorrow(), TimeSlot::new(9, 0)))
        .await
        .unwrap();
    let mut request = booking(&h, tomorrow(), TimeSlot::new(9, 0));
    request.doctor_id = other_doctor;
    h.service
        .create_appointment(h.hospital.tenant_id, request)
        .await
        .unwrap();

    let rows = h
        .service
        .doctor_appointments(h.hospital.tenant_id, other_doctor)
        .await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].doctor_id, other_doctor);
}

use chrono::{DateTime, NaiveTime, Utc};

use shared_models::scheduling::Appointment;

use crate::models::AppointmentFilter;

/// Read-side filtering of a tenant's appointments. Date-dimension filters
/// are exclusive: `upcoming` wins over `today` wins over an exact `date`.
/// Results come back ascending by date then slot time.
pub fn filter_appointments(
    appointments: Vec<Appointment>,
    filter: &AppointmentFilter,
    now: DateTime<Utc>,
) -> Vec<Appointment> {
    let today = now.date_naive();

    let mut results: Vec<Appointment> = appointments
        .into_iter()
        .filter(|appt| {
            if let Some(doctor_id) = filter.doctor_id {
                if appt.doctor_id != doctor_id {
                    return false;
                }
            }
            if let Some(status) = filter.status {
                if appt.status != status {
                    return false;
                }
            }
            if filter.upcoming {
                // Dates are stored midnight-normalized, so "upcoming" means
                // strictly future days (today's bookings are not upcoming).
                appt.date.and_time(NaiveTime::MIN).and_utc() >= now
            } else if filter.today {
                appt.date == today
            } else if let Some(date) = filter.date {
                appt.date == date
            } else {
                true
            }
        })
        .collect();

    sort_appointments(&mut results);
    results
}

pub fn sort_appointments(appointments: &mut [Appointment]) {
    appointments.sort_by(|a, b| a.date.cmp(&b.date).then(a.time.cmp(&b.time)));
}

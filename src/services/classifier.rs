use chrono::NaiveDate;

use crate::models::{Appointment, AppointmentStatus};

/// Temporal/status classification of an appointment. `today` is the
/// reference instant truncated to the local calendar date; the stored
/// time-of-day plays no part in bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Upcoming,
    Past,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    All,
    Upcoming,
    Past,
}

pub fn bucket(appointment: &Appointment, today: NaiveDate) -> Bucket {
    let finished = matches!(
        appointment.status,
        AppointmentStatus::Cancelled | AppointmentStatus::Completed
    );

    if appointment.appointment_date >= today && !finished {
        Bucket::Upcoming
    } else {
        Bucket::Past
    }
}

/// Order-preserving subsequence matching the selector; `All` is identity.
pub fn filter(
    appointments: &[Appointment],
    selector: Selector,
    today: NaiveDate,
) -> Vec<Appointment> {
    appointments
        .iter()
        .filter(|a| match selector {
            Selector::All => true,
            Selector::Upcoming => bucket(a, today) == Bucket::Upcoming,
            Selector::Past => bucket(a, today) == Bucket::Past,
        })
        .cloned()
        .collect()
}

/// Only pending upcoming appointments offer a cancel action; confirmed
/// ones are cancelled through the provider, not the app.
pub fn is_cancellable(appointment: &Appointment, today: NaiveDate) -> bool {
    bucket(appointment, today) == Bucket::Upcoming
        && appointment.status == AppointmentStatus::Pending
}

pub fn is_reviewable(appointment: &Appointment) -> bool {
    appointment.status == AppointmentStatus::Completed && !appointment.has_review()
}

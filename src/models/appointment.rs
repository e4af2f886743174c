use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no_show",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "confirmed" => AppointmentStatus::Confirmed,
            "completed" => AppointmentStatus::Completed,
            "cancelled" => AppointmentStatus::Cancelled,
            "no_show" => AppointmentStatus::NoShow,
            _ => AppointmentStatus::Pending,
        }
    }
}

/// Service fields frozen at booking time. Later catalog edits do not
/// change what the customer agreed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(rename = "duration", default)]
    pub duration_minutes: i32,
}

/// Both the submission payload for a completed appointment's review and
/// the snapshot embedded on an appointment that already has one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub rating: u8,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    #[serde(default)]
    pub service: Option<i64>,
    #[serde(default)]
    pub service_details: Option<ServiceSnapshot>,
    #[serde(default)]
    pub provider_name: String,
    pub appointment_date: NaiveDate,
    #[serde(default)]
    pub appointment_time: String,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub review: Option<Review>,
}

impl Appointment {
    pub fn has_review(&self) -> bool {
        self.review.is_some()
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// In-progress booking state for one service. A selected time is only
/// meaningful for the date it was picked on, so changing `date` must
/// clear `time` (the booking flow enforces this).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub service_id: i64,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub notes: String,
}

impl BookingDraft {
    pub fn new(service_id: i64) -> Self {
        Self {
            service_id,
            date: None,
            time: None,
            notes: String::new(),
        }
    }
}

/// Wire payload for `POST /appointments/` and `PUT /appointments/{id}/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub service: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    #[serde(default)]
    pub notes: String,
}

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::ApiError;

/// Candidate booking times for a date. The remote service does not expose
/// real availability, so the default source serves a fixed reference list;
/// a real availability engine can replace it without touching the booking
/// flow's state machine.
#[async_trait]
pub trait SlotSource: Send + Sync {
    async fn slots_for(&self, service_id: i64, date: NaiveDate) -> Result<Vec<String>, ApiError>;
}

pub const REFERENCE_SLOTS: [&str; 12] = [
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "14:00", "14:30", "15:00", "15:30",
    "16:00", "16:30",
];

pub struct FixedSlots;

#[async_trait]
impl SlotSource for FixedSlots {
    async fn slots_for(&self, _service_id: i64, _date: NaiveDate) -> Result<Vec<String>, ApiError> {
        Ok(REFERENCE_SLOTS.iter().map(|s| s.to_string()).collect())
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCategory {
    pub id: i64,
    pub name: String,
}

/// Immutable catalog snapshot. `price` stays a server-formatted decimal
/// string; the client only displays it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(rename = "duration", default)]
    pub duration_minutes: i32,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub provider: Option<i64>,
    #[serde(default)]
    pub provider_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessHours {
    pub day_of_week: u8,
    #[serde(default)]
    pub opening_time: String,
    #[serde(default)]
    pub closing_time: String,
    #[serde(default)]
    pub is_closed: bool,
}

impl BusinessHours {
    /// Day 0 is Monday on the wire.
    pub fn day_name(&self) -> &'static str {
        const DAYS: [&str; 7] = [
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
        ];
        DAYS.get(self.day_of_week as usize).copied().unwrap_or("")
    }
}

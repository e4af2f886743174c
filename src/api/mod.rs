pub mod client;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::ApiError;
use crate::models::{
    Appointment, BusinessHours, NewAppointment, Registration, Review, Service, ServiceCategory,
    UserProfile,
};

pub use client::HttpApiClient;

/// Session + profile returned by login and registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Query parameters for service browsing.
#[derive(Debug, Clone, Default)]
pub struct ServiceQuery {
    pub category: Option<i64>,
    pub search: Option<String>,
    pub page_size: Option<u32>,
}

/// List endpoints answer with either a page object or a bare array
/// depending on server pagination settings; accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Page { results: Vec<T> },
    Plain(Vec<T>),
}

impl<T> ListPayload<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListPayload::Page { results } => results,
            ListPayload::Plain(items) => items,
        }
    }
}

/// The single gateway to the remote booking service.
///
/// Controllers depend on this trait rather than on the HTTP client so
/// tests can substitute an in-memory implementation. Any call may fail
/// with `ApiError::Auth`, in which case the stored credential has
/// already been evicted.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError>;
    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
    async fn profile(&self) -> Result<UserProfile, ApiError>;

    async fn categories(&self) -> Result<Vec<ServiceCategory>, ApiError>;
    async fn services(&self, query: &ServiceQuery) -> Result<Vec<Service>, ApiError>;
    async fn service(&self, id: i64) -> Result<Service, ApiError>;
    async fn business_hours(&self, provider_id: i64) -> Result<Vec<BusinessHours>, ApiError>;

    async fn appointments(&self) -> Result<Vec<Appointment>, ApiError>;
    async fn create_appointment(&self, appointment: &NewAppointment)
        -> Result<Appointment, ApiError>;
    async fn update_appointment(
        &self,
        id: i64,
        appointment: &NewAppointment,
    ) -> Result<Appointment, ApiError>;
    async fn cancel_appointment(&self, id: i64) -> Result<(), ApiError>;
    async fn submit_review(&self, appointment_id: i64, review: &Review) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_payload_accepts_page_object() {
        let payload: ListPayload<ServiceCategory> =
            serde_json::from_str(r#"{"results":[{"id":1,"name":"Beauty"}]}"#).unwrap();
        let items = payload.into_vec();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Beauty");
    }

    #[test]
    fn test_list_payload_accepts_bare_array() {
        let payload: ListPayload<ServiceCategory> =
            serde_json::from_str(r#"[{"id":1,"name":"Beauty"},{"id":2,"name":"Fitness"}]"#)
                .unwrap();
        assert_eq!(payload.into_vec().len(), 2);
    }
}

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::{AuthResponse, BookingApi, ListPayload, ServiceQuery};
use crate::errors::ApiError;
use crate::models::{
    Appointment, BusinessHours, NewAppointment, Registration, Review, Service, ServiceCategory,
    UserProfile,
};
use crate::session::SessionStore;

/// Applies to every request; a hit is surfaced as a network error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Arc<SessionStore>,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            http,
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Attaches the bearer credential when one is stored, sends, and
    /// normalizes failures. A 401 evicts the credential before the error
    /// is returned so no later call reuses a dead token.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let req = match self.session.credential() {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Network("request timed out".to_string())
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("credential rejected, signing out");
            self.session.clear_credential();
            return Err(ApiError::Auth);
        }

        if status.is_client_error() || status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            let message = error_message(&body);
            if status.is_server_error() {
                return Err(ApiError::Server {
                    status: status.as_u16(),
                    message,
                });
            }
            return Err(ApiError::Client {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp)
    }

    async fn json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = self.send(req).await?;
        resp.json()
            .await
            .map_err(|e| ApiError::Network(format!("failed to decode response: {e}")))
    }

    async fn empty(&self, req: reqwest::RequestBuilder) -> Result<(), ApiError> {
        self.send(req).await?;
        Ok(())
    }
}

/// Pulls the human-readable message out of an error body. The service
/// uses `message`; DRF-style endpoints use `detail` or `error`.
fn error_message(body: &str) -> String {
    let data: serde_json::Value = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(_) => return String::new(),
    };

    for key in ["message", "detail", "error"] {
        if let Some(msg) = data.get(key).and_then(|v| v.as_str()) {
            return msg.to_string();
        }
    }

    String::new()
}

#[async_trait]
impl BookingApi for HttpApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = serde_json::json!({ "username": username, "password": password });
        let auth: AuthResponse = self
            .json(self.http.post(self.url("/accounts/login/")).json(&body))
            .await?;

        self.session.sign_in(&auth.token, auth.user.clone());
        Ok(auth)
    }

    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let auth: AuthResponse = self
            .json(
                self.http
                    .post(self.url("/accounts/register/"))
                    .json(registration),
            )
            .await?;

        self.session.sign_in(&auth.token, auth.user.clone());
        Ok(auth)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let result = self.empty(self.http.post(self.url("/accounts/logout/"))).await;
        // Local sign-out happens even when the remote call fails.
        self.session.clear_credential();
        result
    }

    async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.json(self.http.get(self.url("/accounts/profile/"))).await
    }

    async fn categories(&self) -> Result<Vec<ServiceCategory>, ApiError> {
        let payload: ListPayload<ServiceCategory> = self
            .json(self.http.get(self.url("/services/categories/")))
            .await?;
        Ok(payload.into_vec())
    }

    async fn services(&self, query: &ServiceQuery) -> Result<Vec<Service>, ApiError> {
        let mut req = self.http.get(self.url("/services/"));
        if let Some(category) = query.category {
            req = req.query(&[("category", category.to_string())]);
        }
        if let Some(search) = &query.search {
            req = req.query(&[("search", search.as_str())]);
        }
        if let Some(page_size) = query.page_size {
            req = req.query(&[("page_size", page_size.to_string())]);
        }

        let payload: ListPayload<Service> = self.json(req).await?;
        Ok(payload.into_vec())
    }

    async fn service(&self, id: i64) -> Result<Service, ApiError> {
        self.json(self.http.get(self.url(&format!("/services/{id}/"))))
            .await
    }

    async fn business_hours(&self, provider_id: i64) -> Result<Vec<BusinessHours>, ApiError> {
        let payload: ListPayload<BusinessHours> = self
            .json(
                self.http
                    .get(self.url(&format!("/services/business-hours/{provider_id}/"))),
            )
            .await?;
        Ok(payload.into_vec())
    }

    async fn appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        let payload: ListPayload<Appointment> =
            self.json(self.http.get(self.url("/appointments/"))).await?;
        Ok(payload.into_vec())
    }

    async fn create_appointment(
        &self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, ApiError> {
        self.json(self.http.post(self.url("/appointments/")).json(appointment))
            .await
    }

    async fn update_appointment(
        &self,
        id: i64,
        appointment: &NewAppointment,
    ) -> Result<Appointment, ApiError> {
        self.json(
            self.http
                .put(self.url(&format!("/appointments/{id}/")))
                .json(appointment),
        )
        .await
    }

    async fn cancel_appointment(&self, id: i64) -> Result<(), ApiError> {
        self.empty(
            self.http
                .post(self.url(&format!("/appointments/{id}/cancel/"))),
        )
        .await
    }

    async fn submit_review(&self, appointment_id: i64, review: &Review) -> Result<(), ApiError> {
        self.empty(
            self.http
                .post(self.url(&format!("/appointments/{appointment_id}/review/")))
                .json(review),
        )
        .await
    }
}

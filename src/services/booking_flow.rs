use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};

use crate::api::BookingApi;
use crate::errors::ApiError;
use crate::models::{Appointment, BookingDraft, NewAppointment};
use crate::services::slots::SlotSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingStage {
    Idle,
    SlotsLoading,
    SlotsReady,
    TimeSelected,
    Submitting,
    Succeeded,
    Failed { message: String },
}

struct FlowState {
    draft: BookingDraft,
    stage: BookingStage,
    slots: Vec<String>,
    load_seq: u64,
    submitting: bool,
}

/// Drives one booking from date selection through submission.
///
/// Shared behind an `Arc`; all methods take `&self` and the state lock is
/// never held across an await, so a double-tap can race two `submit`
/// calls and still produce exactly one request.
pub struct BookingFlow {
    api: Arc<dyn BookingApi>,
    slot_source: Arc<dyn SlotSource>,
    state: Mutex<FlowState>,
}

impl BookingFlow {
    pub fn new(
        api: Arc<dyn BookingApi>,
        slot_source: Arc<dyn SlotSource>,
        service_id: i64,
    ) -> Self {
        Self {
            api,
            slot_source,
            state: Mutex::new(FlowState {
                draft: BookingDraft::new(service_id),
                stage: BookingStage::Idle,
                slots: Vec::new(),
                load_seq: 0,
                submitting: false,
            }),
        }
    }

    pub fn stage(&self) -> BookingStage {
        self.state.lock().unwrap().stage.clone()
    }

    pub fn draft(&self) -> BookingDraft {
        self.state.lock().unwrap().draft.clone()
    }

    pub fn available_slots(&self) -> Vec<String> {
        self.state.lock().unwrap().slots.clone()
    }

    /// Picks a date and loads its candidate times. Selecting a new date
    /// always clears the selected time; a load that resolves after a
    /// newer selection is discarded.
    pub async fn select_date(&self, date: NaiveDate) -> Result<(), ApiError> {
        let today = Local::now().date_naive();
        if date < today {
            // The calendar UI already blocks past dates.
            return Err(ApiError::validation("appointment date cannot be in the past"));
        }

        let (service_id, seq) = {
            let mut st = self.state.lock().unwrap();
            st.draft.date = Some(date);
            st.draft.time = None;
            st.slots.clear();
            st.load_seq += 1;
            st.stage = BookingStage::SlotsLoading;
            (st.draft.service_id, st.load_seq)
        };

        let loaded = self.slot_source.slots_for(service_id, date).await;

        let mut st = self.state.lock().unwrap();
        if st.load_seq != seq {
            // Superseded by a newer date selection.
            return Ok(());
        }

        match loaded {
            Ok(slots) => {
                st.slots = slots;
                st.stage = BookingStage::SlotsReady;
                Ok(())
            }
            Err(e) => {
                st.stage = BookingStage::Idle;
                Err(e)
            }
        }
    }

    /// Picks one slot from the loaded candidates. Re-picking the same
    /// slot is a no-op; a different slot overwrites the selection. Also
    /// allowed after a failed submission, where the slots are still
    /// loaded and the user may want a different time before retrying.
    pub fn select_time(&self, slot: &str) -> Result<(), ApiError> {
        let mut st = self.state.lock().unwrap();

        if !matches!(
            st.stage,
            BookingStage::SlotsReady | BookingStage::TimeSelected | BookingStage::Failed { .. }
        ) {
            return Err(ApiError::validation("select a date first"));
        }
        if !st.slots.iter().any(|s| s == slot) {
            return Err(ApiError::validation(format!(
                "{slot} is not an available time"
            )));
        }

        st.draft.time = Some(slot.to_string());
        st.stage = BookingStage::TimeSelected;
        Ok(())
    }

    pub fn set_notes(&self, notes: &str) {
        self.state.lock().unwrap().draft.notes = notes.to_string();
    }

    /// Submits the draft. Refused without a date and time, and while a
    /// submission is already in flight. Failure preserves the draft so
    /// the user can retry without re-entering anything.
    pub async fn submit(&self) -> Result<Appointment, ApiError> {
        let payload = {
            let mut st = self.state.lock().unwrap();

            if st.submitting {
                return Err(ApiError::validation("a booking is already being submitted"));
            }
            let (date, time) = match (st.draft.date, st.draft.time.clone()) {
                (Some(date), Some(time)) => (date, time),
                _ => return Err(ApiError::validation("Please select a date and time")),
            };

            st.submitting = true;
            st.stage = BookingStage::Submitting;
            NewAppointment {
                service: st.draft.service_id,
                appointment_date: date,
                appointment_time: time,
                notes: st.draft.notes.trim().to_string(),
            }
        };

        let result = self.api.create_appointment(&payload).await;

        let mut st = self.state.lock().unwrap();
        st.submitting = false;
        match result {
            Ok(appointment) => {
                tracing::info!(appointment_id = appointment.id, "appointment booked");
                st.draft = BookingDraft::new(st.draft.service_id);
                st.slots.clear();
                st.stage = BookingStage::Succeeded;
                Ok(appointment)
            }
            Err(e) => {
                let message = e
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        "Failed to book appointment. Please try again.".to_string()
                    });
                tracing::warn!("booking failed: {e}");
                st.stage = BookingStage::Failed { message };
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::api::{AuthResponse, ServiceQuery};
    use crate::models::{
        AppointmentStatus, BusinessHours, Registration, Review, Service, ServiceCategory,
        UserProfile,
    };
    use crate::services::slots::FixedSlots;

    fn tomorrow() -> NaiveDate {
        Local::now().date_naive() + Duration::days(1)
    }

    /// Counts create calls; optionally delays or fails them.
    struct MockApi {
        created: AtomicUsize,
        delay_ms: u64,
        fail_with: Option<(u16, &'static str)>,
    }

    impl MockApi {
        fn new() -> Self {
            Self {
                created: AtomicUsize::new(0),
                delay_ms: 0,
                fail_with: None,
            }
        }

        fn slow(delay_ms: u64) -> Self {
            Self {
                delay_ms,
                ..Self::new()
            }
        }

        fn failing(status: u16, message: &'static str) -> Self {
            Self {
                fail_with: Some((status, message)),
                ..Self::new()
            }
        }

        fn create_calls(&self) -> usize {
            self.created.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BookingApi for MockApi {
        async fn login(&self, _: &str, _: &str) -> Result<AuthResponse, ApiError> {
            unimplemented!()
        }
        async fn register(&self, _: &Registration) -> Result<AuthResponse, ApiError> {
            unimplemented!()
        }
        async fn logout(&self) -> Result<(), ApiError> {
            unimplemented!()
        }
        async fn profile(&self) -> Result<UserProfile, ApiError> {
            unimplemented!()
        }
        async fn categories(&self) -> Result<Vec<ServiceCategory>, ApiError> {
            unimplemented!()
        }
        async fn services(&self, _: &ServiceQuery) -> Result<Vec<Service>, ApiError> {
            unimplemented!()
        }
        async fn service(&self, _: i64) -> Result<Service, ApiError> {
            unimplemented!()
        }
        async fn business_hours(&self, _: i64) -> Result<Vec<BusinessHours>, ApiError> {
            unimplemented!()
        }
        async fn appointments(&self) -> Result<Vec<Appointment>, ApiError> {
            unimplemented!()
        }

        async fn create_appointment(
            &self,
            appointment: &NewAppointment,
        ) -> Result<Appointment, ApiError> {
            if self.delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
            }
            if let Some((status, message)) = self.fail_with {
                return Err(ApiError::Server {
                    status,
                    message: message.to_string(),
                });
            }

            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Appointment {
                id: 100,
                service: Some(appointment.service),
                service_details: None,
                provider_name: "Studio".to_string(),
                appointment_date: appointment.appointment_date,
                appointment_time: appointment.appointment_time.clone(),
                status: AppointmentStatus::Pending,
                notes: appointment.notes.clone(),
                review: None,
            })
        }

        async fn update_appointment(
            &self,
            _: i64,
            _: &NewAppointment,
        ) -> Result<Appointment, ApiError> {
            unimplemented!()
        }
        async fn cancel_appointment(&self, _: i64) -> Result<(), ApiError> {
            unimplemented!()
        }
        async fn submit_review(&self, _: i64, _: &Review) -> Result<(), ApiError> {
            unimplemented!()
        }
    }

    fn flow_with(api: Arc<MockApi>) -> BookingFlow {
        BookingFlow::new(api, Arc::new(FixedSlots), 7)
    }

    #[tokio::test]
    async fn test_select_date_loads_slots() {
        let flow = flow_with(Arc::new(MockApi::new()));
        flow.select_date(tomorrow()).await.unwrap();

        assert_eq!(flow.stage(), BookingStage::SlotsReady);
        assert_eq!(flow.available_slots().len(), 12);
        assert_eq!(flow.draft().date, Some(tomorrow()));
    }

    #[tokio::test]
    async fn test_past_date_is_rejected() {
        let flow = flow_with(Arc::new(MockApi::new()));
        let yesterday = Local::now().date_naive() - Duration::days(1);

        let err = flow.select_date(yesterday).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(flow.stage(), BookingStage::Idle);
        assert_eq!(flow.draft().date, None);
    }

    #[tokio::test]
    async fn test_changing_date_resets_time() {
        let flow = flow_with(Arc::new(MockApi::new()));
        flow.select_date(tomorrow()).await.unwrap();
        flow.select_time("14:00").unwrap();
        assert_eq!(flow.draft().time, Some("14:00".to_string()));

        flow.select_date(tomorrow() + Duration::days(1)).await.unwrap();
        assert_eq!(flow.draft().time, None);
        assert_eq!(flow.stage(), BookingStage::SlotsReady);
    }

    #[tokio::test]
    async fn test_select_time_requires_known_slot() {
        let flow = flow_with(Arc::new(MockApi::new()));

        assert!(flow.select_time("14:00").is_err());

        flow.select_date(tomorrow()).await.unwrap();
        assert!(flow.select_time("03:15").is_err());
        assert_eq!(flow.draft().time, None);

        flow.select_time("14:00").unwrap();
        flow.select_time("14:00").unwrap();
        flow.select_time("15:30").unwrap();
        assert_eq!(flow.draft().time, Some("15:30".to_string()));
    }

    #[tokio::test]
    async fn test_submit_refused_without_date_and_time() {
        let api = Arc::new(MockApi::new());
        let flow = flow_with(Arc::clone(&api));

        let err = flow.submit().await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        flow.select_date(tomorrow()).await.unwrap();
        let err = flow.submit().await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        // Refusal left state untouched and made no network call.
        assert_eq!(flow.stage(), BookingStage::SlotsReady);
        assert_eq!(flow.draft().date, Some(tomorrow()));
        assert_eq!(api.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_submit_discards_draft() {
        let api = Arc::new(MockApi::new());
        let flow = flow_with(Arc::clone(&api));

        flow.select_date(tomorrow()).await.unwrap();
        flow.select_time("14:00").unwrap();
        flow.set_notes("  first visit  ");

        let appointment = flow.submit().await.unwrap();
        assert_eq!(appointment.appointment_time, "14:00");
        assert_eq!(appointment.notes, "first visit");
        assert_eq!(appointment.status, AppointmentStatus::Pending);

        assert_eq!(flow.stage(), BookingStage::Succeeded);
        let draft = flow.draft();
        assert_eq!(draft.date, None);
        assert_eq!(draft.time, None);
        assert_eq!(draft.notes, "");
        assert_eq!(api.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_submit_preserves_draft_and_surfaces_message() {
        let api = Arc::new(MockApi::failing(400, "slot unavailable"));
        let flow = flow_with(Arc::clone(&api));

        flow.select_date(tomorrow()).await.unwrap();
        flow.select_time("14:00").unwrap();
        flow.set_notes("first visit");

        let err = flow.submit().await.unwrap_err();
        assert_eq!(err.server_message(), Some("slot unavailable"));

        assert_eq!(
            flow.stage(),
            BookingStage::Failed {
                message: "slot unavailable".to_string()
            }
        );
        let draft = flow.draft();
        assert_eq!(draft.date, Some(tomorrow()));
        assert_eq!(draft.time, Some("14:00".to_string()));
        assert_eq!(draft.notes, "first visit");
    }

    #[tokio::test]
    async fn test_slot_can_be_changed_after_failed_submit() {
        let api = Arc::new(MockApi::failing(400, "slot unavailable"));
        let flow = flow_with(api);

        flow.select_date(tomorrow()).await.unwrap();
        flow.select_time("14:00").unwrap();
        flow.submit().await.unwrap_err();

        flow.select_time("15:00").unwrap();
        assert_eq!(flow.draft().time, Some("15:00".to_string()));
        assert_eq!(flow.stage(), BookingStage::TimeSelected);
    }

    #[tokio::test]
    async fn test_failed_submit_without_server_message_uses_generic_text() {
        let api = Arc::new(MockApi::failing(500, ""));
        let flow = flow_with(api);

        flow.select_date(tomorrow()).await.unwrap();
        flow.select_time("14:00").unwrap();
        flow.submit().await.unwrap_err();

        assert_eq!(
            flow.stage(),
            BookingStage::Failed {
                message: "Failed to book appointment. Please try again.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_double_submit_sends_one_request() {
        let api = Arc::new(MockApi::slow(50));
        let flow = Arc::new(flow_with(Arc::clone(&api)));

        flow.select_date(tomorrow()).await.unwrap();
        flow.select_time("14:00").unwrap();

        let first = tokio::spawn({
            let flow = Arc::clone(&flow);
            async move { flow.submit().await }
        });
        // Let the first submission reach the in-flight guard.
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let second = flow.submit().await;
        assert!(matches!(second, Err(ApiError::Validation(_))));

        first.await.unwrap().unwrap();
        assert_eq!(api.create_calls(), 1);
    }

    /// A slot load for D1 resolving after the user moved on to D2 must
    /// not overwrite D2's state.
    #[tokio::test]
    async fn test_stale_slot_load_is_discarded() {
        struct PerDateSlots;

        #[async_trait]
        impl SlotSource for PerDateSlots {
            async fn slots_for(
                &self,
                _service_id: i64,
                date: NaiveDate,
            ) -> Result<Vec<String>, ApiError> {
                // The earlier date answers slower than the later one.
                if date == Local::now().date_naive() + Duration::days(1) {
                    tokio::time::sleep(std::time::Duration::from_millis(60)).await;
                    Ok(vec!["09:00".to_string()])
                } else {
                    Ok(vec!["14:00".to_string()])
                }
            }
        }

        let flow = Arc::new(BookingFlow::new(
            Arc::new(MockApi::new()),
            Arc::new(PerDateSlots),
            7,
        ));
        let d1 = tomorrow();
        let d2 = tomorrow() + Duration::days(1);

        let slow = tokio::spawn({
            let flow = Arc::clone(&flow);
            async move { flow.select_date(d1).await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        flow.select_date(d2).await.unwrap();

        slow.await.unwrap().unwrap();

        assert_eq!(flow.draft().date, Some(d2));
        assert_eq!(flow.available_slots(), vec!["14:00".to_string()]);
        assert_eq!(flow.stage(), BookingStage::SlotsReady);
    }
}

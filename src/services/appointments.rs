use std::sync::{Arc, Mutex};

use chrono::Local;

use crate::api::BookingApi;
use crate::errors::ApiError;
use crate::models::Appointment;
use crate::services::classifier::{self, Selector};

struct ListState {
    items: Vec<Appointment>,
    loading: bool,
    refreshing: bool,
}

/// The user's appointment collection: load, refresh, filter, cancel.
///
/// The server owns the list; a successful fetch replaces local state
/// wholesale and a failed one leaves the previous list intact.
pub struct AppointmentList {
    api: Arc<dyn BookingApi>,
    state: Mutex<ListState>,
}

impl AppointmentList {
    pub fn new(api: Arc<dyn BookingApi>) -> Self {
        Self {
            api,
            state: Mutex::new(ListState {
                items: Vec::new(),
                loading: false,
                refreshing: false,
            }),
        }
    }

    pub async fn load(&self) -> Result<(), ApiError> {
        self.fetch(false).await
    }

    /// Same semantics as `load`; only the in-progress flag differs so
    /// pull-to-refresh can render differently from the initial load.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        self.fetch(true).await
    }

    async fn fetch(&self, refreshing: bool) -> Result<(), ApiError> {
        {
            let mut st = self.state.lock().unwrap();
            if st.loading || st.refreshing {
                // One fetch at a time; the pending one will deliver.
                return Ok(());
            }
            if refreshing {
                st.refreshing = true;
            } else {
                st.loading = true;
            }
        }

        let result = self.api.appointments().await;

        let mut st = self.state.lock().unwrap();
        st.loading = false;
        st.refreshing = false;
        match result {
            Ok(items) => {
                tracing::debug!(count = items.len(), "appointments loaded");
                st.items = items;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("failed to load appointments: {e}");
                Err(e)
            }
        }
    }

    /// Cancels an appointment the UI has already confirmed with the
    /// user, then reloads the whole list so status reflects server truth
    /// instead of patching the item locally.
    pub async fn cancel(&self, id: i64) -> Result<(), ApiError> {
        self.api.cancel_appointment(id).await?;
        tracing::info!(appointment_id = id, "appointment cancelled");
        self.load().await
    }

    /// Derived view over the current list; never mutates stored state.
    pub fn view(&self, selector: Selector) -> Vec<Appointment> {
        let today = Local::now().date_naive();
        let st = self.state.lock().unwrap();
        classifier::filter(&st.items, selector, today)
    }

    pub fn items(&self) -> Vec<Appointment> {
        self.state.lock().unwrap().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.state.lock().unwrap().refreshing
    }
}

use chrono::NaiveDate;

use crate::api::{BookingApi, ServiceQuery};
use crate::errors::ApiError;
use crate::models::{Appointment, Service, ServiceCategory};
use crate::services::classifier::{self, Selector};

const RECENT_SERVICES_PAGE: u32 = 4;
const UPCOMING_PREVIEW: usize = 3;

#[derive(Debug, Clone)]
pub struct HomeData {
    pub categories: Vec<ServiceCategory>,
    pub recent_services: Vec<Service>,
    pub upcoming_appointments: Vec<Appointment>,
}

/// Loads everything the home view renders: three independent reads fired
/// together and joined. A failure of one does not cancel the others; the
/// first error is reported once all three have settled.
pub async fn load_home_data(api: &dyn BookingApi, today: NaiveDate) -> Result<HomeData, ApiError> {
    let query = ServiceQuery {
        page_size: Some(RECENT_SERVICES_PAGE),
        ..Default::default()
    };

    let (categories, services, appointments) =
        tokio::join!(api.categories(), api.services(&query), api.appointments());

    let categories = categories?;
    let recent_services = services?;
    let mut upcoming_appointments = classifier::filter(&appointments?, Selector::Upcoming, today);
    upcoming_appointments.truncate(UPCOMING_PREVIEW);

    Ok(HomeData {
        categories,
        recent_services,
        upcoming_appointments,
    })
}

use crate::api::BookingApi;
use crate::errors::ApiError;
use crate::models::{BusinessHours, Service};

#[derive(Debug, Clone)]
pub struct ServiceDetail {
    pub service: Service,
    pub business_hours: Vec<BusinessHours>,
}

/// Service first, then its provider's hours: the second call needs the
/// provider id from the first, so the two run in program order.
pub async fn load_service_detail(
    api: &dyn BookingApi,
    service_id: i64,
) -> Result<ServiceDetail, ApiError> {
    let service = api.service(service_id).await?;

    let business_hours = match service.provider {
        Some(provider_id) => api.business_hours(provider_id).await?,
        None => Vec::new(),
    };

    Ok(ServiceDetail {
        service,
        business_hours,
    })
}

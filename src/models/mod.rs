pub mod appointment;
pub mod booking;
pub mod service;
pub mod user;

pub use appointment::{Appointment, AppointmentStatus, Review, ServiceSnapshot};
pub use booking::{BookingDraft, NewAppointment};
pub use service::{BusinessHours, Service, ServiceCategory};
pub use user::{Registration, UserProfile};

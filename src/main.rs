use std::env;
use std::sync::Arc;

use chrono::Local;
use tracing_subscriber::EnvFilter;

use tendii::api::{BookingApi, HttpApiClient};
use tendii::config::AppConfig;
use tendii::db;
use tendii::services::home;
use tendii::session::SessionStore;

/// Dev smoke harness: signs in with the credentials from the
/// environment (or reuses a persisted session) and loads the home view
/// data once. The real UI lives in the mobile shell, not here.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let session = Arc::new(SessionStore::new(conn));
    let api = HttpApiClient::new(config.base_url.clone(), Arc::clone(&session));

    if session.credential().is_none() {
        let username = env::var("TENDII_USERNAME").unwrap_or_default();
        let password = env::var("TENDII_PASSWORD").unwrap_or_default();
        anyhow::ensure!(
            !username.is_empty() && !password.is_empty(),
            "no stored session; set TENDII_USERNAME and TENDII_PASSWORD to sign in"
        );

        let auth = api.login(&username, &password).await?;
        tracing::info!(username = %auth.user.username, "signed in");
    } else {
        tracing::info!("reusing persisted session");
    }

    let today = Local::now().date_naive();
    let data = home::load_home_data(&api, today).await?;
    tracing::info!(
        categories = data.categories.len(),
        services = data.recent_services.len(),
        upcoming = data.upcoming_appointments.len(),
        "home data loaded"
    );

    for appointment in &data.upcoming_appointments {
        tracing::info!(
            id = appointment.id,
            date = %appointment.appointment_date,
            time = %appointment.appointment_time,
            status = appointment.status.as_str(),
            "upcoming appointment"
        );
    }

    Ok(())
}

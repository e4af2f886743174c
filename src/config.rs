use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub base_url: String,
    pub database_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("TENDII_BASE_URL")
                .unwrap_or_else(|_| "https://alx-capstone.onrender.com/api".to_string()),
            database_url: env::var("TENDII_DATABASE_URL")
                .unwrap_or_else(|_| "tendii.db".to_string()),
        }
    }
}

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub gotrue_url: String,
    pub gotrue_service_role_key: String,
    pub storage_url: String,
    pub storage_api_key: String,
    pub storage_bucket: String,
    /// Cron expression for the periodic full badge-counter rebuild.
    pub reconcile_schedule: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            gotrue_url: env::var("GOTRUE_URL").context("GOTRUE_URL must be set")?,
            gotrue_service_role_key: env::var("GOTRUE_SERVICE_ROLE_KEY")
                .context("GOTRUE_SERVICE_ROLE_KEY must be set")?,
            storage_url: env::var("STORAGE_URL").context("STORAGE_URL must be set")?,
            storage_api_key: env::var("STORAGE_API_KEY").context("STORAGE_API_KEY must be set")?,
            storage_bucket: env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "avatars".to_string()),
            reconcile_schedule: env::var("RECONCILE_SCHEDULE")
                .unwrap_or_else(|_| "0 0 3 * * *".to_string()),
        })
    }
}

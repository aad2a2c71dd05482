use crate::i18n::Language;
use anyhow::{bail, Context, Result};
use std::time::Duration;

/// Polls faster than this would mostly refetch an unchanged menu.
pub const MIN_POLL_INTERVAL_MS: u64 = 250;

#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    /// Postgres connection string. Without one the service runs on an
    /// in-memory store that is lost on restart.
    pub database_url: Option<String>,
    pub seed_on_start: bool,

    // HTTP
    pub port: u16,
    pub admin_api_key: String,

    // Storefront
    pub poll_interval: Duration,
    pub default_language: Language,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let admin_api_key = std::env::var("ADMIN_API_KEY").context("ADMIN_API_KEY not set")?;
        if admin_api_key.trim().is_empty() {
            bail!("ADMIN_API_KEY must not be empty");
        }

        let poll_interval_ms = std::env::var("POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(1500)
            .max(MIN_POLL_INTERVAL_MS);

        let default_language = match std::env::var("DEFAULT_LANGUAGE") {
            Ok(code) => Language::from_code(code.trim())
                .with_context(|| format!("DEFAULT_LANGUAGE '{}' is not supported", code))?,
            Err(_) => Language::canonical(),
        };

        Ok(Self {
            // Storage
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            seed_on_start: std::env::var("SEED_ON_START")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),

            // HTTP
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            admin_api_key,

            // Storefront
            poll_interval: Duration::from_millis(poll_interval_ms),
            default_language,
        })
    }
}

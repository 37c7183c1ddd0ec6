//! Shared configuration logic
//!
//! Handles loading of common environment variables.

use crate::error::ConfigError;
use crate::timezone::{DEFAULT_TIMEZONE, parse_timezone};
use chrono_tz::Tz;
use std::env;

/// Common configuration used across services
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections (default: 20)
    pub db_max_connections: u32,

    /// Timezone event dates and "today" are expressed in
    pub timezone: Tz,
}

impl CoreConfig {
    /// Load common configuration from environment variables
    ///
    /// This will also initialize dotenv if it hasn't been done yet.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let tz_name = env::var("APP_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string());
        let timezone = parse_timezone(&tz_name).map_err(|_| ConfigError::InvalidValue {
            name: "APP_TIMEZONE".to_string(),
            value: tz_name.clone(),
        })?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?,
            db_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
            timezone,
        })
    }
}

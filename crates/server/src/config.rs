use anyhow::Result;
use std::env;

/// Settings for the `whatsfest` binary
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub api: api::config::Config,
    /// Apply pending migrations at startup (`RUN_MIGRATIONS`, default true)
    pub run_migrations: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api: api::config::Config::from_env()?,
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| !v.eq_ignore_ascii_case("false") && v != "0")
                .unwrap_or(true),
        })
    }
}

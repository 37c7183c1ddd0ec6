//! Server configuration from environment variables

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use whatsfest_core::config::CoreConfig;

/// Default flyer size cap: 5 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub core: CoreConfig,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origin: String,
    /// HS256 secret for admin session tokens
    pub jwt_secret: String,
    pub jwt_expiry_mins: i64,
    pub admin_username: String,
    /// Argon2id hash of the admin password
    pub admin_password_hash: String,
    /// Directory flyers are written to
    pub upload_dir: PathBuf,
    /// URL prefix flyers are served under
    pub upload_public_base: String,
    pub max_upload_bytes: usize,
    /// Optional newline-separated list replacing the built-in cities
    pub cities_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let core = CoreConfig::from_env()?;

        Ok(Self {
            core,
            host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("Failed to parse API_PORT as u16")?,
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").unwrap_or_else(|_| "*".into()),
            jwt_secret: env::var("JWT_SECRET")
                .ok()
                .filter(|s| !s.is_empty())
                .context("JWT_SECRET environment variable not set")?,
            jwt_expiry_mins: env::var("JWT_EXPIRY_MINS")
                .unwrap_or_else(|_| "720".to_string())
                .parse()
                .context("Failed to parse JWT_EXPIRY_MINS as i64")?,
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH")
                .context("ADMIN_PASSWORD_HASH environment variable not set")?,
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".to_string())
                .into(),
            upload_public_base: env::var("UPLOAD_PUBLIC_BASE")
                .unwrap_or_else(|_| "/uploads".to_string())
                .trim_end_matches('/')
                .to_string(),
            max_upload_bytes: match env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v.parse().context("Failed to parse MAX_UPLOAD_BYTES as usize")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            cities_file: env::var("CITIES_FILE").ok().map(PathBuf::from),
        })
    }
}

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use whatsfest_core::config::CoreConfig;

/// Initialize dotenvy
pub fn init_env() {
    dotenvy::dotenv().ok();
}

/// Whether JSON file logging is on (`ENABLE_FILE_LOGGING`, default true)
fn file_logging_enabled() -> bool {
    std::env::var("ENABLE_FILE_LOGGING")
        .map(|v| !v.eq_ignore_ascii_case("false") && v != "0")
        .unwrap_or(true)
}

fn log_file_name(service_name: &str, started: &chrono::DateTime<chrono::Local>) -> String {
    format!(
        "whatsfest-{}.log.{}.jsonl",
        service_name,
        started.format("%y-%m-%d-%H-%M-%S")
    )
}

/// Initialize tracing: stdout plus an optional JSON file under `LOG_DIR`
///
/// The returned guard must be held until exit so buffered lines are flushed.
pub fn init_tracing(service_name: &str) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let default_filter = format!("info,{}=debug,api=debug,whatsfest_core=debug,sqlx=warn", service_name);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true));

    if !file_logging_enabled() {
        registry.init();
        return None;
    }

    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());
    let file_appender =
        tracing_appender::rolling::never(&log_dir, log_file_name(service_name, &chrono::Local::now()));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    registry
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .json(),
        )
        .init();

    Some(guard)
}

/// Initialize database pool
pub async fn init_db(config: &CoreConfig) -> Result<sqlx::PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800)) // 30 minutes
        .connect(&config.database_url)
        .await?;

    tracing::info!(
        "✓ Database pool established (max_connections: {})",
        config.db_max_connections
    );

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serial_test::serial;

    #[test]
    fn test_log_file_name() {
        let started = chrono::Local
            .with_ymd_and_hms(2024, 3, 20, 21, 5, 9)
            .single()
            .unwrap();
        assert_eq!(
            log_file_name("server", &started),
            "whatsfest-server.log.24-03-20-21-05-09.jsonl"
        );
    }

    #[test]
    #[serial]
    fn test_file_logging_toggle() {
        unsafe { std::env::remove_var("ENABLE_FILE_LOGGING") };
        assert!(file_logging_enabled());

        for off in ["false", "FALSE", "0"] {
            unsafe { std::env::set_var("ENABLE_FILE_LOGGING", off) };
            assert!(!file_logging_enabled(), "{}", off);
        }

        unsafe { std::env::set_var("ENABLE_FILE_LOGGING", "true") };
        assert!(file_logging_enabled());
        unsafe { std::env::remove_var("ENABLE_FILE_LOGGING") };
    }
}

use anyhow::Result;
use sqlx::PgPool;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use whatsfest_shared::bootstrap;

mod config;

#[tokio::main]
async fn main() -> Result<()> {
    bootstrap::init_env();

    // The guard must outlive every service so file logs are flushed
    let _guard = bootstrap::init_tracing("server");

    tracing::info!("🚀 Starting WhatsFest server");

    let config = config::ServerConfig::from_env()?;
    tracing::info!(
        timezone = %config.api.core.timezone,
        "✓ Configuration loaded"
    );

    let pool = bootstrap::init_db(&config.api.core).await?;

    if config.run_migrations {
        sqlx::migrate!("../../migrations").run(&pool).await?;
        tracing::info!("✓ Migrations completed");
    } else {
        tracing::info!("Skipping migrations (RUN_MIGRATIONS=false)");
    }

    let shutdown = CancellationToken::new();
    let api_handle = spawn_api(pool.clone(), config, shutdown.clone());

    tracing::info!("✓ All services started");

    tokio::select! {
        () = wait_for_shutdown() => {
            tracing::info!("📡 Shutdown signal received");
        }
        () = shutdown.cancelled() => {
            tracing::warn!("A service stopped unexpectedly, shutting down");
        }
    }

    shutdown.cancel();

    let api_result = api_handle.await;
    pool.close().await;

    match api_result {
        Ok(Ok(())) => {
            tracing::info!("✓ All services stopped gracefully");
            Ok(())
        }
        Ok(Err(e)) => Err(e),
        Err(e) => Err(anyhow::anyhow!("API task panicked: {}", e)),
    }
}

fn spawn_api(
    pool: PgPool,
    config: config::ServerConfig,
    shutdown: CancellationToken,
) -> tokio::task::JoinHandle<Result<()>> {
    tokio::spawn(async move {
        let state = match api::AppState::from_config(pool, &config.api).await {
            Ok(state) => state,
            Err(e) => {
                shutdown.cancel();
                return Err(e);
            }
        };

        tokio::select! {
            result = api::run_api(state, &config.api) => {
                tracing::error!("API service exited: {:?}", result);
                shutdown.cancel();
                result
            }
            () = shutdown.cancelled() => {
                tracing::info!("API service shutting down");
                Ok(())
            }
        }
    })
}

async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

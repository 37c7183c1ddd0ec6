//! WhatsFest API Server Library

pub mod auth;
pub mod config;
mod db;
pub mod docs;
pub mod error;
mod middleware;
mod routes;
pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::extract::FromRef;
use axum::{Router, middleware as axum_middleware};
use chrono_tz::Tz;
use moka::future::Cache;
use sqlx::PgPool;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use whatsfest_core::cities::CityCatalog;

use crate::auth::JwtKeys;
use crate::docs::ApiDoc;
use crate::middleware::admin_auth::require_admin;
use crate::middleware::rate_limit::{
    API_BURST_SIZE, API_PERIOD_MS, ClientIpKeyExtractor, LOGIN_BURST_SIZE, LOGIN_PERIOD_MS,
};
use crate::storage::LocalBlobStore;

/// City suggestion cache lifetime
const CITY_CACHE_TTL: Duration = Duration::from_secs(3600);
const CITY_CACHE_CAPACITY: u64 = 10_000;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Timezone "today" and legacy timestamps are evaluated in
    pub timezone: Tz,
    pub jwt: JwtKeys,
    pub admin_username: String,
    pub admin_password_hash: String,
    pub blob_store: LocalBlobStore,
    pub cities: Arc<CityCatalog>,
    /// `"<lowercased query>|<limit>"` to suggestions
    pub city_cache: Cache<String, Vec<String>>,
}

impl AppState {
    pub fn new(pool: PgPool, config: &config::Config, cities: CityCatalog) -> Self {
        Self {
            pool,
            timezone: config.core.timezone,
            jwt: JwtKeys::new(&config.jwt_secret, config.jwt_expiry_mins),
            admin_username: config.admin_username.clone(),
            admin_password_hash: config.admin_password_hash.clone(),
            blob_store: LocalBlobStore::new(
                &config.upload_dir,
                &config.upload_public_base,
                config.max_upload_bytes,
            ),
            cities: Arc::new(cities),
            city_cache: Cache::builder()
                .max_capacity(CITY_CACHE_CAPACITY)
                .time_to_live(CITY_CACHE_TTL)
                .build(),
        }
    }

    /// Build state from config, loading `CITIES_FILE` when it is set
    pub async fn from_config(pool: PgPool, config: &config::Config) -> anyhow::Result<Self> {
        let cities = match &config.cities_file {
            Some(path) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read cities file {}", path.display()))?;
                let catalog = CityCatalog::from_lines(&text);
                tracing::info!(count = catalog.len(), path = %path.display(), "Loaded city list");
                catalog
            }
            None => CityCatalog::builtin(),
        };
        if cities.is_empty() {
            tracing::warn!("City list is empty, autocomplete will return nothing");
        }

        Ok(Self::new(pool, config, cities))
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

fn cors_layer(cors_origin: &str) -> anyhow::Result<CorsLayer> {
    if cors_origin == "*" {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }
    let origin = cors_origin
        .parse::<axum::http::HeaderValue>()
        .with_context(|| format!("Invalid CORS origin '{}'", cors_origin))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Create the application router
pub fn create_router(state: AppState, cors_origin: &str) -> anyhow::Result<Router> {
    let cors = cors_layer(cors_origin)?;

    let api_limit = GovernorConfigBuilder::default()
        .period(Duration::from_millis(API_PERIOD_MS))
        .burst_size(API_BURST_SIZE)
        .key_extractor(ClientIpKeyExtractor)
        .finish()
        .context("Failed to create API governor config")?;
    let login_limit = GovernorConfigBuilder::default()
        .period(Duration::from_millis(LOGIN_PERIOD_MS))
        .burst_size(LOGIN_BURST_SIZE)
        .key_extractor(ClientIpKeyExtractor)
        .finish()
        .context("Failed to create login governor config")?;

    let admin = routes::admin::routes()
        .merge(routes::uploads::routes(state.blob_store.max_bytes()))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    let api = routes::events::routes()
        .merge(routes::calendar::routes())
        .merge(routes::cities::routes())
        .merge(admin)
        .layer(GovernorLayer::new(api_limit))
        .merge(routes::auth::routes().layer(GovernorLayer::new(login_limit)));

    let mut router = Router::new()
        .merge(routes::health::routes())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api);

    if let Some(mount) = state.blob_store.local_mount() {
        router = router.nest_service(mount, ServeDir::new(state.blob_store.root()));
    }

    let router = router
        .layer(cors)
        .layer(axum_middleware::from_fn(
            crate::middleware::security_headers::security_headers,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let remote_addr = request
                        .extensions()
                        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
                        .map(|ci| ci.0.to_string())
                        .unwrap_or_else(|| "unknown".into());

                    let user_agent = request
                        .headers()
                        .get(axum::http::header::USER_AGENT)
                        .and_then(|h| h.to_str().ok())
                        .unwrap_or("unknown");

                    let forwarded_for = request
                        .headers()
                        .get("x-forwarded-for")
                        .and_then(|h| h.to_str().ok());

                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        remote_addr = %remote_addr,
                        forwarded_for = ?forwarded_for,
                        user_agent = %user_agent,
                    )
                })
                .on_request(|_request: &axum::http::Request<_>, _span: &tracing::Span| {
                    tracing::debug!("started processing request");
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, _span: &tracing::Span| {
                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %response.status(),
                            "finished processing request"
                        );
                    },
                ),
        )
        .with_state(state);

    Ok(router)
}

/// Run the API server
///
/// Starts the HTTP server and blocks until it exits.
pub async fn run_api(state: AppState, config: &config::Config) -> anyhow::Result<()> {
    let app = create_router(state, &config.cors_allowed_origin)?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_rejects_bad_origin() {
        assert!(cors_layer("*").is_ok());
        assert!(cors_layer("https://whatsfest.example").is_ok());
        assert!(cors_layer("bad\norigin").is_err());
    }
}

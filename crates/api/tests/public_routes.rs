//! Router behaviour that needs no live database
//!
//! The pool points at a closed port, so every query fails fast.

use api::config::Config;
use api::{AppState, create_router};
use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tower::ServiceExt;
use whatsfest_core::cities::CityCatalog;
use whatsfest_core::config::CoreConfig;
use whatsfest_core::timezone::default_timezone;

fn setup_app() -> Router {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(250))
        .connect_lazy("postgres://nobody@127.0.0.1:1/whatsfest")
        .unwrap();

    let config = Config {
        core: CoreConfig {
            database_url: "postgres://nobody@127.0.0.1:1/whatsfest".to_string(),
            db_max_connections: 1,
            timezone: default_timezone(),
        },
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_allowed_origin: "*".to_string(),
        jwt_secret: "public-routes-secret".to_string(),
        jwt_expiry_mins: 5,
        admin_username: "admin".to_string(),
        admin_password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$aGFzaA".to_string(),
        upload_dir: std::env::temp_dir().join("whatsfest-public-routes"),
        upload_public_base: "/uploads".to_string(),
        max_upload_bytes: 1024,
        cities_file: None,
    };

    let state = AppState::new(pool, &config, CityCatalog::builtin());
    create_router(state, "*").unwrap()
}

fn create_request(method: &str, uri: &str) -> Request<Body> {
    let mut req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    req.extensions_mut().insert(ConnectInfo(SocketAddr::new(
        IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
        8080,
    )));
    req
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app.clone().oneshot(create_request("GET", uri)).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_listing_fails_soft() {
    let app = setup_app();

    let (status, body) = get_json(&app, "/api/events?cityHint=Santos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_calendar_without_database_is_empty_grid() {
    let app = setup_app();

    // February 2024: Thursday start, leap year
    let (status, grid) = get_json(&app, "/api/calendar/2024/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(grid["leadingBlanks"], 4);
    assert_eq!(grid["daysInMonth"], 29);
    assert_eq!(grid["cells"].as_array().unwrap().len(), 33);
}

#[tokio::test]
async fn test_invalid_month_and_query() {
    let app = setup_app();

    for uri in [
        "/api/calendar/2024/0",
        "/api/calendar/2024/13",
        "/api/calendar/2024/4/31",
        "/api/events?from=yesterday",
        "/api/events?lat=north",
    ] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], "Bad Request");
    }
}

#[tokio::test]
async fn test_city_autocomplete() {
    let app = setup_app();

    let (status, body) = get_json(&app, "/api/cities?q=santos&limit=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0], "Santos (SP)");

    // served from cache the second time
    let (_, again) = get_json(&app, "/api/cities?q=SANTOS&limit=3").await;
    assert_eq!(again, body);

    let (_, empty) = get_json(&app, "/api/cities?q=%20").await;
    assert_eq!(empty, json!([]));
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = setup_app();

    for (method, uri) in [
        ("GET", "/api/admin/events"),
        ("POST", "/api/admin/events"),
        ("PUT", "/api/admin/events/1"),
        ("DELETE", "/api/admin/events/1"),
        ("POST", "/api/admin/events/import"),
        ("POST", "/api/admin/uploads"),
    ] {
        let response = app.clone().oneshot(create_request(method, uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }

    let mut req = create_request("GET", "/api/admin/events");
    req.headers_mut()
        .insert(header::AUTHORIZATION, "Bearer not-a-token".parse().unwrap());
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_reports_degraded() {
    let app = setup_app();

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], "unhealthy");
}

#[tokio::test]
async fn test_openapi_and_security_headers() {
    let app = setup_app();

    let response = app
        .clone()
        .oneshot(create_request("GET", "/api-docs/openapi.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let doc: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(doc["paths"]["/api/calendar/{year}/{month}"].is_object());
}

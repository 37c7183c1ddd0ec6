//! Admin login

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use whatsfest_core::security::verify_password;

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin")]
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for `/api/admin/*`
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Exchange admin credentials for a session token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 401, description = "Wrong username or password", body = crate::error::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let hash = state.admin_password_hash.clone();
    let password = req.password;

    // argon2 verification is CPU-bound
    let password_ok = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("Password check task failed: {}", e)))?
        .map_err(|e| ApiError::Internal(format!("Password check failed: {}", e)))?;

    if !password_ok || req.username != state.admin_username {
        tracing::warn!(username = %req.username, "Rejected admin login");
        return Err(ApiError::Unauthorized("Invalid username or password".into()));
    }

    let token = state
        .jwt
        .issue(&req.username)
        .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))?;

    tracing::info!(username = %req.username, "Admin logged in");

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt.expiry_secs(),
    }))
}

/// Auth routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

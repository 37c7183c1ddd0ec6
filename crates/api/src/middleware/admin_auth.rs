//! Bearer-token guard for admin routes

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::AppState;
use crate::error::ApiError;

const AUTH_HEADER_PREFIX: &str = "Bearer ";

/// Pull the token out of an `Authorization: Bearer <token>` header value
fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix(AUTH_HEADER_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware that rejects requests without a valid admin token and
/// inserts the decoded [`crate::auth::AdminClaims`] into extensions
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Malformed Authorization header".into()))?;

    let token = bearer_token(header)
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization scheme".into()))?;

    let claims = state.jwt.verify(token).map_err(|e| {
        tracing::debug!("Rejected admin token: {}", e);
        ApiError::Unauthorized("Invalid or expired token".into())
    })?;

    if claims.sub != state.admin_username {
        tracing::warn!(subject = %claims.sub, "Token subject is not the configured admin");
        return Err(ApiError::Unauthorized("Invalid or expired token".into()));
    }

    tracing::debug!(admin = %claims.sub, "Admin request authorized");
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Bearer   abc "), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("bearer abc"), None);
    }
}

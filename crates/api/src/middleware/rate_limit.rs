//! Rate limiting middleware
//!
//! Implements rate limiting using `tower-governor`.

use axum::{extract::ConnectInfo, http::Request};
use std::net::{IpAddr, SocketAddr};
use tower_governor::{errors::GovernorError, key_extractor::KeyExtractor};

// Public API: 300 requests/minute = 1 request every 200ms
pub const API_PERIOD_MS: u64 = 200;
pub const API_BURST_SIZE: u32 = 300;

// Login: 10 requests/minute = 1 request every 6s
pub const LOGIN_PERIOD_MS: u64 = 6_000;
pub const LOGIN_BURST_SIZE: u32 = 10;

/// Keys requests by the client address, honouring proxy headers
#[derive(Debug, Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<B>(&self, req: &Request<B>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();

        // 1. X-Forwarded-For: first entry is the client
        if let Some(ip) = headers
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        // 2. X-Real-IP
        if let Some(ip) = headers
            .get("x-real-ip")
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        // 3. Direct connection
        if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
            return Ok(addr.ip());
        }

        Err(GovernorError::UnableToExtractKey)
    }
}

//! HTTP middleware

pub mod admin_auth;
pub mod rate_limit;
pub mod security_headers;

//! Admin session tokens
//!
//! There is a single admin account whose password is configured as an
//! Argon2id hash. A successful login returns an HS256-signed JWT carrying
//! [`AdminClaims`].

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT claims embedded in every admin token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin username
    pub sub: String,
    /// Expiration time (UTC Unix timestamp)
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp)
    pub iat: i64,
}

/// Signing material and lifetime for admin tokens
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_mins: i64,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("expiry_mins", &self.expiry_mins)
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    pub fn new(secret: &str, expiry_mins: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_mins,
        }
    }

    pub const fn expiry_secs(&self) -> i64 {
        self.expiry_mins * 60
    }

    /// Issue a token for `username`
    pub fn issue(&self, username: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp();
        let claims = AdminClaims {
            sub: username.to_string(),
            exp: now + self.expiry_secs(),
            iat: now,
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Validate signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<AdminClaims, jsonwebtoken::errors::Error> {
        decode::<AdminClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie minting and decoding.
//!
//! A session cookie is an HS256 JWT carrying the uid, the issue instant in
//! milliseconds (for revocation checks) and the ID token's sign-in time.

use crate::config::{Config, SESSION_COOKIE, SESSION_TTL};
use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Session cookie claims.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject (Firebase uid)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Issued at, millisecond precision
    pub iat_ms: i64,
    /// Sign-in time of the ID token the session was created from
    pub auth_time: u64,
}

/// Mints and decodes session cookies.
#[derive(Clone)]
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    secure_cookies: bool,
}

impl SessionService {
    pub fn new(config: &Config) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&config.session_signing_key),
            decoding_key: DecodingKey::from_secret(&config.session_signing_key),
            secure_cookies: config.cookie_secure,
        }
    }

    /// Create a session cookie value for `uid` valid for `expires_in`.
    pub fn mint(&self, uid: &str, auth_time: u64, expires_in: Duration) -> anyhow::Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?;

        let claims = SessionClaims {
            sub: uid.to_string(),
            iat: now.as_secs(),
            iat_ms: i64::try_from(now.as_millis())?,
            exp: now.as_secs() + expires_in.as_secs(),
            auth_time,
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Check signature and expiry of a session cookie value.
    ///
    /// Revocation is checked by the identity service, which owns account state.
    pub fn decode(&self, value: &str) -> Option<SessionClaims> {
        if value.is_empty() {
            return None;
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<SessionClaims>(value, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| tracing::debug!(error = %e, "Session cookie rejected"))
            .ok()
    }

    /// The `Set-Cookie` value for a freshly minted session.
    pub fn cookie(&self, value: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .max_age(time::Duration::seconds(SESSION_TTL.as_secs() as i64))
            .build()
    }

    /// A cookie matching the session cookie's attributes, for removal.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .build()
    }
}

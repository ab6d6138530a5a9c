// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Double-submit CSRF nonces.
//!
//! Every visit to the login page receives its own nonce:
//! `base64url(32 random bytes) "." hex(HMAC-SHA256(nonce))`.
//! The login form posts the value back and it must equal the cookie.

use crate::config::{Config, CSRF_COOKIE};
use axum_extra::extract::cookie::{Cookie, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

const NONCE_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CsrfError {
    #[error("CSRF cookie missing")]
    MissingCookie,
    #[error("CSRF form value missing")]
    MissingFormValue,
    #[error("CSRF cookie is not a token issued by this server")]
    Forged,
    #[error("CSRF form value does not match cookie")]
    Mismatch,
}

/// Issues and checks CSRF nonces.
#[derive(Clone)]
pub struct CsrfService {
    key: Vec<u8>,
    rng: SystemRandom,
    secure_cookies: bool,
}

impl CsrfService {
    pub fn new(config: &Config) -> Self {
        Self {
            key: config.csrf_signing_key.clone(),
            rng: SystemRandom::new(),
            secure_cookies: config.cookie_secure,
        }
    }

    /// Generate a fresh signed nonce.
    pub fn issue(&self) -> anyhow::Result<String> {
        let mut nonce = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce)
            .map_err(|_| anyhow::anyhow!("system RNG failure"))?;

        let nonce = URL_SAFE_NO_PAD.encode(nonce);
        let tag = hex::encode(self.tag(&nonce)?);
        Ok(format!("{nonce}.{tag}"))
    }

    /// Check the cookie-borne token against the form-submitted one.
    pub fn verify_pair(&self, cookie: Option<&str>, submitted: &str) -> Result<(), CsrfError> {
        let cookie = cookie
            .filter(|c| !c.is_empty())
            .ok_or(CsrfError::MissingCookie)?;
        if submitted.is_empty() {
            return Err(CsrfError::MissingFormValue);
        }

        if !self.is_authentic(cookie) {
            return Err(CsrfError::Forged);
        }

        if bool::from(cookie.as_bytes().ct_eq(submitted.as_bytes())) {
            Ok(())
        } else {
            Err(CsrfError::Mismatch)
        }
    }

    /// The `csrfToken` cookie; scripts on the login page read it.
    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((CSRF_COOKIE, token))
            .path("/")
            .same_site(SameSite::Strict)
            .secure(self.secure_cookies)
            .build()
    }

    fn is_authentic(&self, token: &str) -> bool {
        let Some((nonce, tag_hex)) = token.split_once('.') else {
            return false;
        };
        let Ok(tag) = hex::decode(tag_hex) else {
            return false;
        };

        let Ok(mut mac) = HmacSha256::new_from_slice(&self.key) else {
            return false;
        };
        mac.update(nonce.as_bytes());
        mac.verify_slice(&tag).is_ok()
    }

    fn tag(&self, nonce: &str) -> anyhow::Result<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| anyhow::anyhow!("HMAC init failed: {}", e))?;
        mac.update(nonce.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

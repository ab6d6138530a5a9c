// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! The session and CSRF keys are both derived from `SESSION_SECRET` with HKDF.

use hkdf::Hkdf;
use sha2::Sha256;
use std::env;
use std::time::Duration;

/// Name of the HTTP-only session cookie.
pub const SESSION_COOKIE: &str = "session";
/// Name of the double-submitted CSRF cookie (readable by page scripts).
pub const CSRF_COOKIE: &str = "csrfToken";
/// Session cookie lifetime.
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 5);
/// A login must present an ID token whose sign-in happened this recently.
pub const MAX_AUTH_AGE: Duration = Duration::from_secs(5 * 60);

const MIN_SECRET_LEN: usize = 32;
const DEFAULT_IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Firebase project ID (ID token audience and Firestore project)
    pub firebase_project_id: String,
    /// Directory holding the static login page
    pub public_dir: String,
    /// Whether cookies carry the `Secure` attribute
    pub cookie_secure: bool,
    /// Keep documents in process memory instead of Firestore
    pub use_memory_store: bool,
    /// Identity Toolkit REST base URL for Firebase Auth admin calls
    pub identity_toolkit_url: String,
    /// Firebase Auth emulator `host:port`, when set
    pub auth_emulator_host: Option<String>,

    // --- Derived secrets ---
    /// HS256 key for session cookies (raw bytes)
    pub session_signing_key: Vec<u8>,
    /// HMAC key for CSRF nonces (raw bytes)
    pub csrf_signing_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let secret = env::var("SESSION_SECRET")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("SESSION_SECRET"))?;

        let (session_signing_key, csrf_signing_key) = derive_keys(secret.as_bytes())?;

        let auth_emulator_host = env::var("FIREBASE_AUTH_EMULATOR_HOST")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let identity_toolkit_url = match &auth_emulator_host {
            Some(host) => format!("http://{host}/identitytoolkit.googleapis.com/v1"),
            None => env::var("IDENTITY_TOOLKIT_URL")
                .unwrap_or_else(|_| DEFAULT_IDENTITY_TOOLKIT_URL.to_string()),
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            firebase_project_id: env::var("FIREBASE_PROJECT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_PROJECT_ID"))?,
            public_dir: env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".to_string()),
            cookie_secure: env_flag("COOKIE_SECURE"),
            use_memory_store: env_flag("USE_MEMORY_STORE"),
            identity_toolkit_url,
            auth_emulator_host,
            session_signing_key,
            csrf_signing_key,
        })
    }

    /// Fixed configuration for tests.
    pub fn test_default() -> Self {
        let (session_signing_key, csrf_signing_key) =
            derive_keys(b"test_session_secret_32_bytes_min!!")
                .unwrap_or_else(|_| (b"session".to_vec(), b"csrf".to_vec()));

        Self {
            port: 3000,
            firebase_project_id: "test-project".to_string(),
            public_dir: "public".to_string(),
            cookie_secure: false,
            use_memory_store: true,
            identity_toolkit_url: DEFAULT_IDENTITY_TOOLKIT_URL.to_string(),
            auth_emulator_host: None,
            session_signing_key,
            csrf_signing_key,
        }
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Split the master secret into independent session and CSRF keys.
fn derive_keys(secret: &[u8]) -> Result<(Vec<u8>, Vec<u8>), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::Invalid(format!(
            "SESSION_SECRET must be at least {MIN_SECRET_LEN} bytes"
        )));
    }

    let hk = Hkdf::<Sha256>::new(None, secret);
    let mut session_key = vec![0u8; 32];
    let mut csrf_key = vec![0u8; 32];
    hk.expand(b"daily-tips session cookie", &mut session_key)
        .map_err(|e| ConfigError::Invalid(format!("HKDF expand failed: {e}")))?;
    hk.expand(b"daily-tips csrf nonce", &mut csrf_key)
        .map_err(|e| ConfigError::Invalid(format!("HKDF expand failed: {e}")))?;

    Ok((session_key, csrf_key))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("FIREBASE_PROJECT_ID", "tips-project");
        env::set_var("SESSION_SECRET", "an_adequately_long_session_secret_value");
        env::remove_var("PORT");
        env::remove_var("FIREBASE_AUTH_EMULATOR_HOST");
        env::remove_var("IDENTITY_TOOLKIT_URL");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.firebase_project_id, "tips-project");
        assert_eq!(config.identity_toolkit_url, DEFAULT_IDENTITY_TOOLKIT_URL);
        assert!(config.auth_emulator_host.is_none());
        assert_eq!(config.port, 3000);
        assert_eq!(config.session_signing_key.len(), 32);
        assert_ne!(config.session_signing_key, config.csrf_signing_key);
    }

    #[test]
    fn short_secret_rejected() {
        assert!(matches!(
            derive_keys(b"too short"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn derived_keys_are_deterministic() {
        let secret = b"0123456789abcdef0123456789abcdef";
        assert_eq!(derive_keys(secret).unwrap(), derive_keys(secret).unwrap());
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Authentication admin calls over the Identity Toolkit REST API.
//!
//! - `accounts:delete` removes the user from Firebase Auth
//! - `accounts:update` with `validSince` revokes the user's refresh tokens
//!
//! Requests carry a Google OAuth access token from `gcloud-sdk`, or a fixed
//! token when talking to the Auth emulator.

use crate::config::Config;
use crate::error::{AppError, Result};
use gcloud_sdk::{GoogleAuthTokenGenerator, TokenSourceType, GCP_DEFAULT_SCOPES};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
/// Bearer token the Auth emulator accepts for admin requests.
const EMULATOR_TOKEN: &str = "owner";
const USER_NOT_FOUND: &str = "USER_NOT_FOUND";

#[derive(Clone)]
enum Credentials {
    Google(Arc<GoogleAuthTokenGenerator>),
    Static(String),
}

#[derive(Clone)]
enum AdminMode {
    Remote {
        http: Client,
        base_url: String,
        credentials: Credentials,
    },
    /// In-memory deployments have no Firebase project to talk to.
    Offline,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteAccountRequest<'a> {
    local_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAccountRequest<'a> {
    local_id: &'a str,
    /// Unix seconds, encoded as a string (int64 in the REST API)
    valid_since: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Admin client for the Firebase Auth user registry.
#[derive(Clone)]
pub struct AuthAdminClient {
    project_id: String,
    mode: AdminMode,
}

impl AuthAdminClient {
    /// Build the client that matches the configuration.
    ///
    /// The Auth emulator wins when `FIREBASE_AUTH_EMULATOR_HOST` is set; the
    /// in-memory store runs offline; otherwise Google credentials are used.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        if config.auth_emulator_host.is_some() {
            tracing::info!(url = %config.identity_toolkit_url, "Using Firebase Auth emulator");
            return Self::with_static_token(
                &config.identity_toolkit_url,
                &config.firebase_project_id,
                EMULATOR_TOKEN,
            );
        }

        if config.use_memory_store {
            tracing::warn!("Firebase Auth admin calls disabled for the in-memory store");
            return Ok(Self::offline(&config.firebase_project_id));
        }

        let generator =
            GoogleAuthTokenGenerator::new(TokenSourceType::Default, GCP_DEFAULT_SCOPES.clone())
                .await
                .map_err(|e| anyhow::anyhow!("Failed to load Google credentials: {}", e))?;

        Ok(Self {
            project_id: config.firebase_project_id.clone(),
            mode: AdminMode::Remote {
                http: http_client()?,
                base_url: trim_base_url(&config.identity_toolkit_url),
                credentials: Credentials::Google(Arc::new(generator)),
            },
        })
    }

    /// Client that authenticates with a fixed bearer token.
    pub fn with_static_token(
        base_url: &str,
        project_id: &str,
        token: &str,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            project_id: project_id.to_string(),
            mode: AdminMode::Remote {
                http: http_client()?,
                base_url: trim_base_url(base_url),
                credentials: Credentials::Static(token.to_string()),
            },
        })
    }

    /// Client that accepts every call without contacting Firebase.
    pub fn offline(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            mode: AdminMode::Offline,
        }
    }

    /// Delete the Firebase Auth user. A user that is already gone counts
    /// as deleted.
    pub async fn delete_account(&self, uid: &str) -> Result<()> {
        match self
            .post("accounts:delete", &DeleteAccountRequest { local_id: uid })
            .await
        {
            Err(AppError::NotFound(_)) => {
                tracing::debug!(uid, "Firebase Auth user already deleted");
                Ok(())
            }
            other => other,
        }
    }

    /// Invalidate every refresh token issued before `valid_since_secs`.
    pub async fn revoke_refresh_tokens(&self, uid: &str, valid_since_secs: i64) -> Result<()> {
        self.post(
            "accounts:update",
            &UpdateAccountRequest {
                local_id: uid,
                valid_since: valid_since_secs.to_string(),
            },
        )
        .await
    }

    async fn post<B: Serialize>(&self, method: &str, body: &B) -> Result<()> {
        let AdminMode::Remote {
            http,
            base_url,
            credentials,
        } = &self.mode
        else {
            tracing::debug!(method, "Skipping Firebase Auth call (offline)");
            return Ok(());
        };

        let url = format!("{}/projects/{}/{}", base_url, self.project_id, method);
        let authorization = authorization_header(credentials).await?;

        let response = http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::IdentityProvider(format!("{method} request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let envelope: ErrorEnvelope = response.json().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST && envelope.error.message.starts_with(USER_NOT_FOUND)
        {
            return Err(AppError::NotFound(format!(
                "Firebase Auth user not found ({method})"
            )));
        }

        Err(AppError::IdentityProvider(format!(
            "{method} returned {status}: {}",
            envelope.error.message
        )))
    }
}

async fn authorization_header(credentials: &Credentials) -> Result<String> {
    match credentials {
        Credentials::Static(token) => Ok(format!("Bearer {token}")),
        Credentials::Google(generator) => generator
            .create_token()
            .await
            .map(|token| token.header_value())
            .map_err(|e| AppError::IdentityProvider(format!("Access token unavailable: {}", e))),
    }
}

fn http_client() -> anyhow::Result<Client> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lifecycle routes: login, logout and account deletion.

use axum::{
    extract::{FromRequest, Request, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::config::{CSRF_COOKIE, SESSION_COOKIE, SESSION_TTL};
use crate::error::{AppError, Result};
use crate::routes::found;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessionLogin", post(session_login))
        .route("/logout", get(logout))
        .route("/delete", get(delete_account))
}

/// Body of `POST /sessionLogin`, JSON or URL-encoded.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(max = 8192))]
    pub id_token: String,
    #[serde(default)]
    #[validate(length(max = 512))]
    pub csrf_token: String,
}

impl LoginRequest {
    /// Parse the body according to its content type.
    async fn extract(request: Request) -> Result<Self> {
        let is_json = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let login = if is_json {
            Json::<Self>::from_request(request, &())
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?
                .0
        } else {
            Form::<Self>::from_request(request, &())
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?
                .0
        };

        login
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok(login)
    }
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
}

/// Exchange an ID token for a session cookie.
///
/// 1. The form's CSRF token must match the `csrfToken` cookie.
/// 2. The ID token must verify and its sign-in must be recent.
/// 3. The session cookie is set HTTP-only for five days.
async fn session_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let login = LoginRequest::extract(request).await?;

    let csrf_cookie = jar.get(CSRF_COOKIE).map(|c| c.value());
    state
        .csrf
        .verify_pair(csrf_cookie, &login.csrf_token)
        .map_err(|e| {
            tracing::warn!(reason = %e, "Login blocked by CSRF check");
            AppError::CsrfMismatch
        })?;

    let session_cookie = state
        .identity
        .create_session_cookie(&login.id_token, SESSION_TTL)
        .await
        .map_err(|e| {
            if !e.is_auth_failure() {
                tracing::error!(error = %e, "Session creation failed");
            }
            AppError::Unauthorized
        })?;

    let jar = jar.add(state.identity.sessions().cookie(session_cookie));

    Ok((jar, Json(LoginResponse { status: "success" })))
}

/// Sign out: clear the cookie and revoke every session of the user.
///
/// Always ends on the login page.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let cookie = session_cookie_value(&jar);
    let jar = jar.remove(state.identity.sessions().removal_cookie());

    if let Some(cookie) = cookie {
        let result = async {
            let claims = state.identity.verify_session_cookie(&cookie, true).await?;
            state.identity.revoke_refresh_tokens(&claims.sub).await
        }
        .await;

        if let Err(e) = result {
            tracing::warn!(error = %e, "Logout could not revoke sessions");
        }
    }

    (jar, found("/")).into_response()
}

/// Delete the signed-in user's account.
///
/// Always ends on the login page.
async fn delete_account(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let cookie = session_cookie_value(&jar);
    let jar = jar.remove(state.identity.sessions().removal_cookie());

    if let Some(cookie) = cookie {
        let result = async {
            let claims = state.identity.verify_session_cookie(&cookie, true).await?;
            state.identity.delete_user(&claims.sub).await
        }
        .await;

        if let Err(e) = result {
            tracing::warn!(error = %e, "Account deletion failed");
        }
    }

    (jar, found("/")).into_response()
}

fn session_cookie_value(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

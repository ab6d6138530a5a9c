// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login page gate.
//!
//! `GET /` goes straight to the profile when the browser already holds a
//! live session. Otherwise the static login page is served with a fresh
//! CSRF nonce cookie for the sign-in form to echo back.

use crate::config::SESSION_COOKIE;
use crate::routes::found;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

pub async fn login_page_gate(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET || request.uri().path() != "/" {
        return next.run(request).await;
    }

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        // Revocation is checked too, otherwise a revoked session would bounce
        // between `/` and `/profile`.
        if state
            .identity
            .verify_session_cookie(cookie.value(), true)
            .await
            .is_ok()
        {
            return found("/profile");
        }
    }

    match state.csrf.issue() {
        Ok(token) => {
            let jar = jar.add(state.csrf.cookie(token));
            (jar, next.run(request).await).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to issue CSRF token");
            next.run(request).await
        }
    }
}

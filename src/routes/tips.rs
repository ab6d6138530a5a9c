// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tip routes for the signed-in user.
//!
//! The `{id}` segment is only accepted when it names the session's own
//! user; the acting identity always comes from the session cookie.

use crate::error::{AppError, Result};
use crate::middleware::auth::SessionUser;
use crate::models::UserProgress;
use crate::services::TipsResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;

/// Tip routes (require a session).
/// The session middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tips/{id}", get(get_tips))
        .route("/complete_tip/{id}", get(complete_tip))
}

fn ensure_self(user: &SessionUser, id: &str) -> Result<()> {
    if user.uid == id {
        Ok(())
    } else {
        tracing::warn!(uid = %user.uid, requested = %id, "Blocked access to another user's tips");
        Err(AppError::Unauthorized)
    }
}

/// Current tip text for the user.
async fn get_tips(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<TipsResponse>> {
    ensure_self(&user, &id)?;

    let account = state
        .identity
        .get_user(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account {} not found", user.uid)))?;

    Ok(Json(state.tips.tips_for(&account).await?))
}

/// Advance the user to the next day's tip.
async fn complete_tip(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<UserProgress>> {
    ensure_self(&user, &id)?;

    let progress = state.tips.complete_tip(&user.uid).await?;
    tracing::info!(uid = %user.uid, day = progress.day, "Tip completed");

    Ok(Json(progress))
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily tips server
//!
//! Serves the login page, exchanges Firebase ID tokens for session cookies
//! and tracks each user's progress through the daily tips.

use daily_tips::{
    config::Config,
    db::FirestoreDb,
    models::default_tips,
    services::{AuthAdminClient, IdTokenVerifier},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting daily-tips server");

    let db = if config.use_memory_store {
        tracing::warn!("Using in-memory document store; data is lost on restart");
        FirestoreDb::new_in_memory()
    } else {
        FirestoreDb::new(&config.firebase_project_id).await?
    };

    db.seed_tips(&default_tips()).await?;

    let verifier = Arc::new(IdTokenVerifier::new(&config)?);
    let admin = AuthAdminClient::from_config(&config).await?;

    let state = Arc::new(AppState::new(config.clone(), db, verifier, admin));

    // Build router
    let app = daily_tips::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("daily_tips=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}

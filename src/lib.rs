// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily tips: session-cookie sign-in against Firebase Authentication
//! with a per-user "tip of the day" counter stored in Firestore.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{
    AuthAdminClient, CsrfService, IdTokenVerifier, IdentityService, SessionService, TipsService,
};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub identity: IdentityService,
    pub csrf: CsrfService,
    pub tips: TipsService,
}

impl AppState {
    /// Wire the services together over one store and identity provider.
    pub fn new(
        config: Config,
        db: FirestoreDb,
        verifier: Arc<IdTokenVerifier>,
        admin: AuthAdminClient,
    ) -> Self {
        let identity =
            IdentityService::new(verifier, SessionService::new(&config), admin, db.clone());
        let csrf = CsrfService::new(&config);
        let tips = TipsService::new(db.clone());

        Self {
            config,
            db,
            identity,
            csrf,
            tips,
        }
    }
}

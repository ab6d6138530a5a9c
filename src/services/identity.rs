// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider facade.
//!
//! Combines Firebase ID token verification, session cookie minting, the
//! Firebase Auth admin API and the local account registry (records in the
//! `accounts` collection). Route handlers only talk to this service.

use crate::config::MAX_AUTH_AGE;
use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::Account;
use crate::services::auth_admin::AuthAdminClient;
use crate::services::id_token::{IdTokenClaims, IdTokenError, IdTokenVerifier};
use crate::services::session::{SessionClaims, SessionService};
use crate::time_utils::{format_utc_rfc3339, now_unix_millis};
use std::sync::Arc;
use std::time::Duration;

/// Identity provider used by the HTTP layer.
#[derive(Clone)]
pub struct IdentityService {
    verifier: Arc<IdTokenVerifier>,
    sessions: SessionService,
    admin: AuthAdminClient,
    db: FirestoreDb,
}

impl IdentityService {
    pub fn new(
        verifier: Arc<IdTokenVerifier>,
        sessions: SessionService,
        admin: AuthAdminClient,
        db: FirestoreDb,
    ) -> Self {
        Self {
            verifier,
            sessions,
            admin,
            db,
        }
    }

    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }

    /// Verify a Firebase ID token.
    pub async fn verify_id_token(&self, id_token: &str) -> Result<IdTokenClaims> {
        self.verifier.verify(id_token).await.map_err(|e| match e {
            IdTokenError::Rejected(reason) => {
                tracing::warn!(reason = %reason, "ID token rejected");
                AppError::InvalidToken
            }
            IdTokenError::Transient(reason) => AppError::IdentityProvider(reason),
        })
    }

    /// Exchange a recently issued ID token for a session cookie value.
    ///
    /// The token is verified again, its sign-in must be within
    /// [`MAX_AUTH_AGE`], and the account record is refreshed from its claims.
    pub async fn create_session_cookie(
        &self,
        id_token: &str,
        expires_in: Duration,
    ) -> Result<String> {
        let claims = self.verify_id_token(id_token).await?;

        if claims.auth_age_secs() >= MAX_AUTH_AGE.as_secs() {
            tracing::warn!(
                uid = %claims.sub,
                auth_age_secs = claims.auth_age_secs(),
                "Sign-in too old to create a session"
            );
            return Err(AppError::StaleLogin);
        }

        self.record_login(&claims).await?;

        let cookie = self
            .sessions
            .mint(&claims.sub, claims.auth_time, expires_in)
            .map_err(AppError::Internal)?;

        tracing::info!(uid = %claims.sub, "Session created");
        Ok(cookie)
    }

    /// Verify a session cookie value.
    ///
    /// With `check_revoked`, sessions of deleted accounts and sessions issued
    /// before the account's revocation cutoff are rejected as well.
    pub async fn verify_session_cookie(
        &self,
        value: &str,
        check_revoked: bool,
    ) -> Result<SessionClaims> {
        let claims = self.sessions.decode(value).ok_or(AppError::InvalidToken)?;

        if check_revoked {
            let account = self
                .db
                .get_account(&claims.sub)
                .await?
                .ok_or(AppError::InvalidToken)?;

            if account.is_revoked(claims.iat_ms) {
                tracing::debug!(uid = %claims.sub, "Session cookie revoked");
                return Err(AppError::InvalidToken);
            }
        }

        Ok(claims)
    }

    /// Revoke every session of `uid` issued up to now.
    ///
    /// The local cutoff is written first; it is what session checks read.
    /// Firebase Auth then drops the user's refresh tokens.
    pub async fn revoke_refresh_tokens(&self, uid: &str) -> Result<()> {
        let now_ms = now_unix_millis();
        self.db.set_tokens_valid_after(uid, now_ms).await?;
        self.admin
            .revoke_refresh_tokens(uid, now_ms.div_euclid(1000))
            .await?;
        tracing::info!(uid, "All sessions revoked");
        Ok(())
    }

    /// Fetch an account record.
    pub async fn get_user(&self, uid: &str) -> Result<Option<Account>> {
        self.db.get_account(uid).await
    }

    /// Delete an account and the data it owns.
    ///
    /// The local account goes first so no session of `uid` verifies while
    /// the rest is removed. Progress is deleted even when Firebase Auth
    /// fails; that failure is reported afterwards.
    pub async fn delete_user(&self, uid: &str) -> Result<()> {
        self.db.delete_account(uid).await?;
        let provider = self.admin.delete_account(uid).await;
        self.db.delete_progress(uid).await?;
        provider?;
        tracing::info!(uid, "Account deleted");
        Ok(())
    }

    /// Create or refresh the account record from verified ID token claims.
    ///
    /// The revocation cutoff and creation time survive the refresh.
    pub async fn record_login(&self, claims: &IdTokenClaims) -> Result<Account> {
        let now = format_utc_rfc3339(chrono::Utc::now());

        let login = Account {
            uid: claims.sub.clone(),
            display_name: claims.name.clone(),
            email: claims.email.clone(),
            email_verified: claims.email_verified,
            photo_url: claims.picture.clone(),
            tokens_valid_after_ms: None,
            created_at: now.clone(),
            last_login_at: now,
        };

        self.db.merge_login(&login).await
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Accounts (identity records and revocation cutoffs)
//! - User tips (per-user day counter)
//! - Tips (static tip texts, seeded at startup)

use crate::db::{collections, MemoryStore};
use crate::error::AppError;
use crate::models::{Account, Tip, UserProgress};
use futures_util::{stream, StreamExt};
use std::sync::Arc;

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Firestore(firestore::FirestoreDb),
    Memory(Arc<MemoryStore>),
}

fn db_err(e: impl std::fmt::Display) -> AppError {
    AppError::Database(e.to_string())
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create a store that keeps every collection in process memory.
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::new())),
        }
    }

    // ─── Account Operations ──────────────────────────────────────

    /// Get an account by uid.
    pub async fn get_account(&self, uid: &str) -> Result<Option<Account>, AppError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.get_account(uid)),
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .by_id_in(collections::ACCOUNTS)
                .obj()
                .one(uid)
                .await
                .map_err(db_err),
        }
    }

    /// Record a login: create the account or refresh its profile fields.
    ///
    /// Runs as a read-write transaction so a revocation cutoff written
    /// concurrently is never overwritten by a stale copy.
    pub async fn merge_login(&self, profile: &Account) -> Result<Account, AppError> {
        let client = match &self.backend {
            Backend::Memory(store) => return Ok(store.merge_login(profile)),
            Backend::Firestore(client) => client,
        };

        client
            .run_transaction(|db, transaction| {
                let profile = profile.clone();
                Box::pin(async move {
                    let current: Option<Account> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::ACCOUNTS)
                        .obj()
                        .one(&profile.uid)
                        .await?;

                    let account = match current {
                        Some(mut account) => {
                            account.apply_login(&profile);
                            account
                        }
                        None => profile,
                    };

                    db.fluent()
                        .update()
                        .in_col(collections::ACCOUNTS)
                        .document_id(&account.uid)
                        .object(&account)
                        .add_to_transaction(transaction)?;

                    Ok(account)
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Login transaction failed: {}", e)))
    }

    /// Delete an account record.
    pub async fn delete_account(&self, uid: &str) -> Result<(), AppError> {
        match &self.backend {
            Backend::Memory(store) => {
                store.delete_account(uid);
            }
            Backend::Firestore(client) => {
                client
                    .fluent()
                    .delete()
                    .from(collections::ACCOUNTS)
                    .document_id(uid)
                    .execute()
                    .await
                    .map_err(db_err)?;
            }
        }
        Ok(())
    }

    /// Mark every session issued at or before `valid_after_ms` as revoked.
    pub async fn set_tokens_valid_after(
        &self,
        uid: &str,
        valid_after_ms: i64,
    ) -> Result<(), AppError> {
        let client = match &self.backend {
            Backend::Memory(store) => {
                return if store.set_tokens_valid_after(uid, valid_after_ms) {
                    Ok(())
                } else {
                    Err(AppError::NotFound(format!("Account {} not found", uid)))
                };
            }
            Backend::Firestore(client) => client,
        };

        let uid = uid.to_string();
        let updated = client
            .run_transaction(|db, transaction| {
                let uid = uid.clone();
                Box::pin(async move {
                    let current: Option<Account> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::ACCOUNTS)
                        .obj()
                        .one(&uid)
                        .await?;

                    let Some(mut account) = current else {
                        return Ok(false);
                    };
                    account.tokens_valid_after_ms = Some(valid_after_ms);

                    db.fluent()
                        .update()
                        .in_col(collections::ACCOUNTS)
                        .document_id(&uid)
                        .object(&account)
                        .add_to_transaction(transaction)?;

                    Ok(true)
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Revocation transaction failed: {}", e)))?;

        if updated {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Account {} not found", uid)))
        }
    }

    // ─── Progress Operations ─────────────────────────────────────

    /// Get a user's progress document, if one was ever written.
    pub async fn get_progress(&self, uid: &str) -> Result<Option<UserProgress>, AppError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.get_progress(uid)),
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .by_id_in(collections::USER_TIPS)
                .obj()
                .one(uid)
                .await
                .map_err(db_err),
        }
    }

    /// Create the progress document at day 1 if it does not exist yet.
    ///
    /// Existing documents are returned untouched.
    pub async fn ensure_progress(&self, uid: &str) -> Result<UserProgress, AppError> {
        let client = match &self.backend {
            Backend::Memory(store) => return Ok(store.ensure_progress(uid)),
            Backend::Firestore(client) => client,
        };

        let uid = uid.to_string();
        client
            .run_transaction(|db, transaction| {
                let uid = uid.clone();
                Box::pin(async move {
                    let current: Option<UserProgress> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USER_TIPS)
                        .obj()
                        .one(&uid)
                        .await?;

                    if let Some(progress) = current {
                        return Ok(progress);
                    }

                    let progress = UserProgress::starting(&uid);
                    db.fluent()
                        .update()
                        .in_col(collections::USER_TIPS)
                        .document_id(&uid)
                        .object(&progress)
                        .add_to_transaction(transaction)?;

                    Ok(progress)
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Progress init transaction failed: {}", e)))
    }

    /// Atomically advance a user's day counter by one.
    ///
    /// The read and the write share a Firestore transaction; a concurrent
    /// writer makes the commit fail and the transaction is retried with
    /// fresh data, so no increment is lost.
    pub async fn increment_day(&self, uid: &str) -> Result<UserProgress, AppError> {
        let client = match &self.backend {
            Backend::Memory(store) => return store.increment_day(uid),
            Backend::Firestore(client) => client,
        };

        let uid = uid.to_string();
        let progress = client
            .run_transaction(|db, transaction| {
                let uid = uid.clone();
                Box::pin(async move {
                    let current: Option<UserProgress> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USER_TIPS)
                        .obj()
                        .one(&uid)
                        .await?;

                    let Some(progress) = current
                        .unwrap_or_else(|| UserProgress::starting(&uid))
                        .advanced()
                    else {
                        return Ok(None);
                    };

                    db.fluent()
                        .update()
                        .in_col(collections::USER_TIPS)
                        .document_id(&uid)
                        .object(&progress)
                        .add_to_transaction(transaction)?;

                    Ok(Some(progress))
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Day increment transaction failed: {}", e)))?
            .ok_or_else(|| AppError::Database(format!("Day counter exhausted for {uid}")))?;

        tracing::debug!(user_id = %progress.user_id, day = progress.day, "Tip day advanced");
        Ok(progress)
    }

    /// Remove a user's progress document.
    pub async fn delete_progress(&self, uid: &str) -> Result<(), AppError> {
        match &self.backend {
            Backend::Memory(store) => store.delete_progress(uid),
            Backend::Firestore(client) => {
                client
                    .fluent()
                    .delete()
                    .from(collections::USER_TIPS)
                    .document_id(uid)
                    .execute()
                    .await
                    .map_err(db_err)?;
            }
        }
        Ok(())
    }

    // ─── Tip Operations ──────────────────────────────────────────

    /// Get the tip text for a day.
    pub async fn get_tip(&self, day: u32) -> Result<Option<Tip>, AppError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.get_tip(day)),
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .by_id_in(collections::TIPS)
                .obj()
                .one(&day.to_string())
                .await
                .map_err(db_err),
        }
    }

    /// Upsert the static tips. Safe to run on every startup.
    pub async fn seed_tips(&self, tips: &[Tip]) -> Result<(), AppError> {
        let client = match &self.backend {
            Backend::Memory(store) => {
                tips.iter().for_each(|tip| store.upsert_tip(tip));
                return Ok(());
            }
            Backend::Firestore(client) => client,
        };

        stream::iter(tips.to_vec())
            .map(|tip| async move {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::TIPS)
                    .document_id(tip.day.to_string())
                    .object(&tip)
                    .execute()
                    .await
                    .map_err(db_err)?;
                Ok::<(), AppError>(())
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(count = tips.len(), "Tips seeded");
        Ok(())
    }
}

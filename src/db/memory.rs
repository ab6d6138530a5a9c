// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory document store used for local development and tests.
//!
//! Each collection is a `DashMap`; read-modify-write operations run under
//! the shard lock of the entry they touch, so they are atomic per document.

use crate::error::AppError;
use crate::models::{Account, Tip, UserProgress};
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: DashMap<String, Account>,
    progress: DashMap<String, UserProgress>,
    tips: DashMap<u32, Tip>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_account(&self, uid: &str) -> Option<Account> {
        self.accounts.get(uid).map(|a| a.clone())
    }

    /// Refresh the profile fields of an account, creating it if absent.
    ///
    /// The stored revocation cutoff and creation time are kept.
    pub fn merge_login(&self, profile: &Account) -> Account {
        let mut entry = self
            .accounts
            .entry(profile.uid.clone())
            .or_insert_with(|| profile.clone());
        entry.apply_login(profile);
        entry.clone()
    }

    pub fn delete_account(&self, uid: &str) -> bool {
        self.accounts.remove(uid).is_some()
    }

    pub fn set_tokens_valid_after(&self, uid: &str, valid_after_ms: i64) -> bool {
        match self.accounts.get_mut(uid) {
            Some(mut account) => {
                account.tokens_valid_after_ms = Some(valid_after_ms);
                true
            }
            None => false,
        }
    }

    pub fn get_progress(&self, uid: &str) -> Option<UserProgress> {
        self.progress.get(uid).map(|p| p.clone())
    }

    pub fn ensure_progress(&self, uid: &str) -> UserProgress {
        self.progress
            .entry(uid.to_string())
            .or_insert_with(|| UserProgress::starting(uid))
            .clone()
    }

    pub fn increment_day(&self, uid: &str) -> Result<UserProgress, AppError> {
        let mut entry = self
            .progress
            .entry(uid.to_string())
            .or_insert_with(|| UserProgress::starting(uid));
        let next = entry
            .advanced()
            .ok_or_else(|| AppError::Database(format!("Day counter exhausted for {uid}")))?;
        *entry = next.clone();
        Ok(next)
    }

    pub fn delete_progress(&self, uid: &str) {
        self.progress.remove(uid);
    }

    pub fn get_tip(&self, day: u32) -> Option<Tip> {
        self.tips.get(&day).map(|t| t.clone())
    }

    pub fn upsert_tip(&self, tip: &Tip) {
        self.tips.insert(tip.day, tip.clone());
    }
}

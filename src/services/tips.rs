// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily tip progress.

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::{Account, UserProgress, FIRST_DAY};
use serde::Serialize;

/// Response body for the tips endpoint.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TipsResponse {
    pub tips: String,
    pub day: u32,
}

#[derive(Clone)]
pub struct TipsService {
    db: FirestoreDb,
}

impl TipsService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Greeting plus the tip text of the user's current day.
    ///
    /// A day past the seeded tips yields an empty tip text.
    pub async fn tips_for(&self, account: &Account) -> Result<TipsResponse> {
        let day = self
            .db
            .get_progress(&account.uid)
            .await?
            .map(|p| p.day)
            .unwrap_or(FIRST_DAY);

        let text = match self.db.get_tip(day).await? {
            Some(tip) => tip.tips,
            None => {
                tracing::warn!(uid = %account.uid, day, "No tip seeded for day");
                String::new()
            }
        };

        tracing::debug!(uid = %account.uid, day, "Serving tips");

        Ok(TipsResponse {
            tips: format!(
                "hello {}: The tips of the day are: {}",
                account.display_name.as_deref().unwrap_or("N/A"),
                text
            ),
            day,
        })
    }

    /// Mark the current tip as done, moving the user to the next day.
    pub async fn complete_tip(&self, uid: &str) -> Result<UserProgress> {
        self.db.increment_day(uid).await
    }

    /// Make sure the user has a progress document.
    pub async fn ensure_progress(&self, uid: &str) -> Result<UserProgress> {
        self.db.ensure_progress(uid).await
    }
}

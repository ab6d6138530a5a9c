// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tip progress and tip documents.

use serde::{Deserialize, Serialize};

/// Day a user starts on before completing any tip.
pub const FIRST_DAY: u32 = 1;

/// Per-user progress document (`user_tips/{uid}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: String,
    pub day: u32,
}

impl UserProgress {
    /// Progress of a user who has not completed any tip yet.
    pub fn starting(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            day: FIRST_DAY,
        }
    }

    /// Progress one day further on, or `None` once the counter is exhausted.
    pub fn advanced(&self) -> Option<Self> {
        Some(Self {
            user_id: self.user_id.clone(),
            day: self.day.checked_add(1)?,
        })
    }
}

/// Static tip document (`tips/{day}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    pub day: u32,
    pub tips: String,
}

/// Tips seeded at startup.
pub fn default_tips() -> Vec<Tip> {
    ["tip number one", "tip number two", "tip number three"]
        .iter()
        .zip(FIRST_DAY..)
        .map(|(text, day)| Tip {
            day,
            tips: text.to_string(),
        })
        .collect()
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account record for storage and the profile page.

use serde::{Deserialize, Serialize};

/// Identity record stored in Firestore (document ID is the uid).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Firebase user ID
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    /// Profile picture URL
    pub photo_url: Option<String>,
    /// Sessions issued at or before this instant (Unix millis) are revoked.
    #[serde(default)]
    pub tokens_valid_after_ms: Option<i64>,
    /// When the account first signed in
    pub created_at: String,
    /// Most recent session login
    pub last_login_at: String,
}

impl Account {
    /// Whether a session issued at `issued_at_ms` has been revoked.
    pub fn is_revoked(&self, issued_at_ms: i64) -> bool {
        self.tokens_valid_after_ms
            .is_some_and(|valid_after| issued_at_ms <= valid_after)
    }

    /// Copy the profile fields of a fresh login onto this record.
    ///
    /// `tokens_valid_after_ms` and `created_at` are left as stored.
    pub fn apply_login(&mut self, login: &Account) {
        self.display_name = login.display_name.clone();
        self.email = login.email.clone();
        self.email_verified = login.email_verified;
        self.photo_url = login.photo_url.clone();
        self.last_login_at = login.last_login_at.clone();
    }
}

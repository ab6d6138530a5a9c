// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod account;
pub mod progress;

pub use account::Account;
pub use progress::{default_tips, Tip, UserProgress, FIRST_DAY};

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (authentication, login page, security).

pub mod auth;
pub mod login_page;
pub mod security;

pub use auth::{require_session, SessionUser};
pub use login_page::login_page_gate;

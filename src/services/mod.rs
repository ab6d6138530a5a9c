// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth_admin;
pub mod csrf;
pub mod id_token;
pub mod identity;
pub mod session;
pub mod tips;

pub use auth_admin::AuthAdminClient;
pub use csrf::{CsrfError, CsrfService};
pub use id_token::{IdTokenClaims, IdTokenError, IdTokenVerifier};
pub use identity::IdentityService;
pub use session::{SessionClaims, SessionService};
pub use tips::{TipsResponse, TipsService};

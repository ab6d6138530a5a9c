// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile page for the signed-in user.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::config::SESSION_COOKIE;
use crate::error::{AppError, Result};
use crate::models::Account;
use crate::routes::found;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/profile", get(profile))
}

/// Render the profile, or send the browser back to the login page.
async fn profile(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    match load_profile(&state, &jar).await {
        Ok(account) => Html(render_profile(&account)).into_response(),
        Err(e) => {
            tracing::debug!(reason = %e, "Profile unavailable, redirecting to login");
            found("/")
        }
    }
}

async fn load_profile(state: &AppState, jar: &CookieJar) -> Result<Account> {
    let cookie = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .unwrap_or_default();

    let claims = state.identity.verify_session_cookie(&cookie, true).await?;

    let account = state
        .identity
        .get_user(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account {} not found", claims.sub)))?;

    // First visit creates the progress document; later visits leave it alone.
    state.tips.ensure_progress(&account.uid).await?;

    Ok(account)
}

/// Build the profile page HTML. Every user-supplied field is escaped.
pub fn render_profile(account: &Account) -> String {
    let name = escape_html(account.display_name.as_deref().unwrap_or("N/A"));
    let email = escape_html(account.email.as_deref().unwrap_or(""));
    let verified = if account.email_verified {
        "verified"
    } else {
        "unverified"
    };
    let uid = escape_html(&urlencoding::encode(&account.uid));

    let mut html = String::with_capacity(2048);
    html.push_str(
        "<!DOCTYPE html>\
         <html>\
         <meta charset=\"UTF-8\">\
         <link href=\"style.css\" rel=\"stylesheet\" type=\"text/css\" media=\"screen\" />\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>Daily Tips Profile</title>\
         <body>\
         <div id=\"container\">",
    );
    let _ = write!(html, "<h3>Welcome to Daily Tips, {name}</h3>");
    html.push_str(
        "<div id=\"loaded\"><div id=\"main\"><div id=\"user-signed-in\">\
         <div id=\"user-info\"><div id=\"photo-container\">",
    );
    if let Some(photo) = account.photo_url.as_deref().filter(|p| !p.is_empty()) {
        let _ = write!(html, "<img id=\"photo\" src=\"{}\">", escape_html(photo));
    }
    let _ = write!(
        html,
        "</div>\
         <div id=\"name\">{name}</div>\
         <div id=\"email\">{email} ({verified})</div>\
         <div class=\"clearfix\"></div>\
         </div>\
         <div><a href=\"tips/{uid}\">display actions of the day</a></div>\
         <div><a href=\"complete_tip/{uid}\">complete tip of the day</a></div>"
    );
    html.push_str(
        "<p>\
         <a id=\"sign-out\" class=\"button\" href=\"/logout\">Sign Out</a>\
         <a id=\"delete-account\" class=\"button\" href=\"/delete\">Delete account</a>\
         </p>\
         </div></div></div></div>\
         </body>\
         </html>",
    );
    html
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

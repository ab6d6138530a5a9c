// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use daily_tips::config::Config;
use daily_tips::db::FirestoreDb;
use daily_tips::models::default_tips;
use daily_tips::routes::create_router;
use daily_tips::services::{AuthAdminClient, IdTokenVerifier};
use daily_tips::AppState;
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use serde_json::json;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

/// Key and kid the test ID token verifier trusts.
pub const TEST_ID_TOKEN_KEY: &[u8] = b"test_firebase_signing_key";
pub const TEST_ID_TOKEN_KID: &str = "test-kid";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

#[allow(dead_code)]
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Generate a unique uid for test isolation.
#[allow(dead_code)]
pub fn unique_uid(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}

/// Create a test app backed by the in-memory store with seeded tips.
/// Firebase Auth admin calls are disabled.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    build_test_app(AuthAdminClient::offline("test-project")).await
}

/// Like [`create_test_app`], with Firebase Auth admin calls sent to `admin_url`.
#[allow(dead_code)]
pub async fn create_test_app_with_auth_admin(admin_url: &str) -> (axum::Router, Arc<AppState>) {
    let admin = AuthAdminClient::with_static_token(admin_url, "test-project", "owner").unwrap();
    build_test_app(admin).await
}

async fn build_test_app(admin: AuthAdminClient) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = FirestoreDb::new_in_memory();
    db.seed_tips(&default_tips()).await.unwrap();

    let verifier = IdTokenVerifier::new_with_static_key(
        &config,
        TEST_ID_TOKEN_KID,
        Algorithm::HS256,
        DecodingKey::from_secret(TEST_ID_TOKEN_KEY),
    )
    .unwrap();

    let state = Arc::new(AppState::new(config, db, Arc::new(verifier), admin));
    (create_router(state.clone()), state)
}

/// Create an ID token as Firebase would issue it for the test project.
#[allow(dead_code)]
pub fn create_test_id_token(uid: &str, auth_time: u64) -> String {
    let now = now_secs();
    let claims = json!({
        "iss": "https://securetoken.google.com/test-project",
        "aud": "test-project",
        "sub": uid,
        "iat": now,
        "exp": now + 3600,
        "auth_time": auth_time,
        "name": "Test User",
        "email": format!("{uid}@example.com"),
        "email_verified": true,
        "picture": "https://example.com/photo.png",
    });

    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(TEST_ID_TOKEN_KID.to_string());
    encode(&header, &claims, &EncodingKey::from_secret(TEST_ID_TOKEN_KEY)).unwrap()
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
}

/// Value part of a `Set-Cookie` header (`name=value; attrs` -> `value`).
#[allow(dead_code)]
pub fn cookie_value(set_cookie: &str) -> String {
    let pair = set_cookie.split(';').next().unwrap_or_default();
    pair.split_once('=')
        .map(|(_, v)| v.to_string())
        .unwrap_or_default()
}

#[allow(dead_code)]
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// Visit the login page and return the CSRF token it hands out.
#[allow(dead_code)]
pub async fn fetch_csrf_token(app: &axum::Router) -> String {
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let cookie = find_cookie(&set_cookie_headers(&response), "csrfToken")
        .expect("login page should set a CSRF cookie");
    cookie_value(&cookie)
}

/// POST /sessionLogin with a JSON body.
#[allow(dead_code)]
pub async fn post_login(
    app: &axum::Router,
    id_token: &str,
    form_csrf: &str,
    cookie_csrf: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/sessionLogin")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(csrf) = cookie_csrf {
        builder = builder.header(header::COOKIE, format!("csrfToken={csrf}"));
    }

    let body = json!({ "idToken": id_token, "csrfToken": form_csrf }).to_string();
    app.clone()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// Sign `uid` in through the real login flow and return the session cookie value.
#[allow(dead_code)]
pub async fn login(app: &axum::Router, uid: &str) -> String {
    let csrf = fetch_csrf_token(app).await;
    let id_token = create_test_id_token(uid, now_secs());
    let response = post_login(app, &id_token, &csrf, Some(&csrf)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = find_cookie(&set_cookie_headers(&response), "session")
        .expect("login should set a session cookie");
    cookie_value(&cookie)
}

/// GET `uri` carrying the given session cookie.
#[allow(dead_code)]
pub async fn get_with_session(app: &axum::Router, uri: &str, session: Option<&str>) -> Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(session) = session {
        builder = builder.header(header::COOKIE, format!("session={session}"));
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login page tests: CSRF cookie issuance and signed-in redirect.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;
use common::{
    body_text, create_test_app, fetch_csrf_token, find_cookie, get_with_session, login,
    set_cookie_headers,
};

#[tokio::test]
async fn test_login_page_served_with_csrf_cookie() {
    let (app, _) = create_test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let csrf = find_cookie(&set_cookie_headers(&response), "csrfToken").expect("csrf cookie");
    assert!(!csrf.contains("HttpOnly"));
    assert!(csrf.contains("SameSite=Strict"));

    assert!(body_text(response).await.contains("Sign in"));
}

#[tokio::test]
async fn test_each_visit_gets_a_new_csrf_token() {
    let (app, _) = create_test_app().await;

    let first = fetch_csrf_token(&app).await;
    let second = fetch_csrf_token(&app).await;

    assert_ne!(first, second);
}

#[tokio::test]
async fn test_signed_in_visitor_redirected_to_profile() {
    let (app, _) = create_test_app().await;
    let session = login(&app, "carol").await;

    let response = get_with_session(&app, "/", Some(&session)).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/profile");
}

#[tokio::test]
async fn test_invalid_session_gets_login_page() {
    let (app, _) = create_test_app().await;

    let response = get_with_session(&app, "/", Some("forged.session.cookie")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(find_cookie(&set_cookie_headers(&response), "csrfToken").is_some());
}

#[tokio::test]
async fn test_static_assets_do_not_get_csrf_cookie() {
    let (app, _) = create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/style.css")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(find_cookie(&set_cookie_headers(&response), "csrfToken").is_none());
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = create_test_app().await;

    let response = get_with_session(&app, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(find_cookie(&set_cookie_headers(&response), "csrfToken").is_none());
    assert!(body_text(response).await.contains("\"status\":\"ok\""));
}

#[tokio::test]
async fn test_revoked_session_gets_login_page() {
    let (app, _) = create_test_app().await;
    let session = login(&app, "dora").await;
    get_with_session(&app, "/logout", Some(&session)).await;

    let response = get_with_session(&app, "/", Some(&session)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(find_cookie(&set_cookie_headers(&response), "csrfToken").is_some());
    assert!(body_text(response).await.contains("Sign in"));
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tip route tests.
//!
//! These tests verify that:
//! 1. Tip routes require a session and only serve the session's own user
//! 2. A new user starts at day one
//! 3. Completing tips advances the day exactly once per call, even concurrently

use axum::http::StatusCode;

mod common;
use common::{body_json, body_text, create_test_app, get_with_session, login};

#[tokio::test]
async fn test_tips_without_session_unauthorized() {
    let (app, _) = create_test_app().await;

    let response = get_with_session(&app, "/tips/frank", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "UNAUTHORIZED REQUEST!");
}

#[tokio::test]
async fn test_complete_tip_without_session_unauthorized() {
    let (app, state) = create_test_app().await;

    let response = get_with_session(&app, "/complete_tip/frank", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(state.db.get_progress("frank").await.unwrap().is_none());
}

#[tokio::test]
async fn test_other_users_id_unauthorized() {
    let (app, state) = create_test_app().await;
    let _victim = login(&app, "victim").await;
    let session = login(&app, "mallory").await;

    let response = get_with_session(&app, "/complete_tip/victim", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_with_session(&app, "/tips/victim", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert!(state.db.get_progress("victim").await.unwrap().is_none());
}

#[tokio::test]
async fn test_new_user_gets_day_one_tip() {
    let (app, _) = create_test_app().await;
    let session = login(&app, "grace").await;

    let response = get_with_session(&app, "/tips/grace", Some(&session)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({
            "tips": "hello Test User: The tips of the day are: tip number one",
            "day": 1,
        })
    );
}

#[tokio::test]
async fn test_sequential_completions_advance_day() {
    let (app, _) = create_test_app().await;
    let session = login(&app, "heidi").await;

    const N: u32 = 4;
    for i in 1..=N {
        let response = get_with_session(&app, "/complete_tip/heidi", Some(&session)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "userId": "heidi", "day": 1 + i })
        );
    }

    let response = get_with_session(&app, "/tips/heidi", Some(&session)).await;
    let body = body_json(response).await;
    assert_eq!(body["day"], 1 + N);
    // Past the seeded tips the text is empty.
    assert_eq!(body["tips"], "hello Test User: The tips of the day are: ");
}

#[tokio::test]
async fn test_completion_moves_to_next_tip_text() {
    let (app, _) = create_test_app().await;
    let session = login(&app, "ivan").await;

    get_with_session(&app, "/complete_tip/ivan", Some(&session)).await;
    let response = get_with_session(&app, "/tips/ivan", Some(&session)).await;

    assert_eq!(
        body_json(response).await["tips"],
        "hello Test User: The tips of the day are: tip number two"
    );
}

#[tokio::test]
async fn test_concurrent_completions_are_not_lost() {
    let (app, state) = create_test_app().await;
    let session = login(&app, "judy").await;

    const N: u32 = 20;
    let mut handles = vec![];
    for _ in 0..N {
        let app = app.clone();
        let session = session.clone();
        handles.push(tokio::spawn(async move {
            get_with_session(&app, "/complete_tip/judy", Some(&session))
                .await
                .status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.expect("Task join failed"), StatusCode::OK);
    }

    let progress = state.db.get_progress("judy").await.unwrap().unwrap();
    assert_eq!(progress.day, 1 + N, "Increment lost under concurrency");
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use daily_tips::error::{AppError, UNAUTHORIZED_BODY};

#[test]
fn test_auth_failures_share_one_response() {
    for err in [
        AppError::Unauthorized,
        AppError::InvalidToken,
        AppError::StaleLogin,
        AppError::CsrfMismatch,
    ] {
        assert!(err.is_auth_failure());
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
    assert_eq!(UNAUTHORIZED_BODY, "UNAUTHORIZED REQUEST!");
}

#[test]
fn test_other_errors_are_not_auth_failures() {
    let err = AppError::Database("unavailable".to_string());
    assert!(!err.is_auth_failure());
    assert_eq!(
        err.into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );

    let err = AppError::BadRequest("bad body".to_string());
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

    let err = AppError::NotFound("Account x not found".to_string());
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

    let err = AppError::IdentityProvider("JWKS down".to_string());
    assert!(!err.is_auth_failure());
    assert_eq!(
        err.into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

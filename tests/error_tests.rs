// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use monjaro_up::error::AppError;
use tower::ServiceExt;

mod common;
use common::{authed_request, body_json, create_offline_firestore_app};

#[test]
fn test_client_error_classification() {
    assert!(AppError::Validation("x".to_string()).is_client_error());
    assert!(AppError::OnboardingRequired.is_client_error());
    assert!(AppError::Conflict("x".to_string()).is_client_error());
    assert!(!AppError::Database("x".to_string()).is_client_error());
    assert!(!AppError::Internal(anyhow::anyhow!("boom")).is_client_error());
}

#[tokio::test]
async fn test_status_codes() {
    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        (AppError::NotFound("p".to_string()), StatusCode::NOT_FOUND),
        (AppError::Validation("v".to_string()), StatusCode::BAD_REQUEST),
        (AppError::BadRequest("b".to_string()), StatusCode::BAD_REQUEST),
        (AppError::Conflict("c".to_string()), StatusCode::CONFLICT),
        (AppError::OnboardingRequired, StatusCode::CONFLICT),
        (
            AppError::Database("d".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, status) in cases {
        assert_eq!(err.into_response().status(), status);
    }
}

#[tokio::test]
async fn test_server_error_details_hidden() {
    let response =
        AppError::Database("connection refused at 10.0.0.3".to_string()).into_response();

    let json = body_json(response).await;
    assert_eq!(json["error"], "database_error");
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn test_unreachable_store_returns_500() {
    let app = create_offline_firestore_app();

    let response = app
        .oneshot(authed_request("GET", "/api/profile", "u1", None))
        .await
        .unwrap();

    // Auth passes; the store has no client.
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

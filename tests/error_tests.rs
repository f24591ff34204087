// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use velovibe::error::AppError;

mod common;

#[test]
fn test_status_mapping() {
    assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
    assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
    assert_eq!(
        AppError::Database("x".into()).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        AppError::from(anyhow::anyhow!("boom")).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_client_errors_carry_details() {
    let response = AppError::Conflict(AppError::LAST_EXERCISE.to_string()).into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "conflict");
    assert_eq!(body["details"], AppError::LAST_EXERCISE);
}

#[tokio::test]
async fn test_storage_errors_hide_details() {
    let response =
        AppError::Database("Failed to write velovibe_workouts: No space left".to_string())
            .into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "storage_error");
    assert!(body.get("details").is_none());
}

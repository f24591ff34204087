// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use std::sync::Arc;
use velovibe::config::Config;
use velovibe::db::{KeyValueStore, MemoryStore};
use velovibe::models::Workout;
use velovibe::routes::create_router;
use velovibe::services::{CoachingBridge, WorkoutStore};
use velovibe::AppState;

/// Create a test app over an empty in-memory store, coaching disabled.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Arc::new(MemoryStore::new()), CoachingBridge::disabled())
}

/// Create a test app over the given storage and coaching bridge.
#[allow(dead_code)]
pub fn create_test_app_with(
    kv: Arc<dyn KeyValueStore>,
    coach: CoachingBridge,
) -> (axum::Router, Arc<AppState>) {
    let store = WorkoutStore::open(kv);
    let state = Arc::new(AppState::new(Config::test_default(), store, coach));
    (create_router(state.clone()), state)
}

/// Workout fixture with a 20 minute duration.
#[allow(dead_code)]
pub fn workout(id: &str, exercise_id: &str, date: &str, calories: f64) -> Workout {
    Workout {
        id: id.to_string(),
        exercise_id: exercise_id.to_string(),
        date: date.to_string(),
        calories,
        duration_minutes: 20,
        intensity: calories / 20.0,
        notes: None,
        extra: serde_json::Map::new(),
    }
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

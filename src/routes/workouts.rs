// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout log routes.

use crate::error::{AppError, Result};
use crate::models::Workout;
use crate::routes::validated;
use crate::services::{stats, WorkoutStore};
use crate::time_utils::{format_utc_rfc3339, resolve_session_date};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workouts", get(list_workouts).post(log_workout))
        .route(
            "/api/workouts/{id}",
            put(update_workout).delete(delete_workout),
        )
}

/// Query selecting one exercise; the selected exercise when absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseQuery {
    pub exercise_id: Option<String>,
}

impl ExerciseQuery {
    pub(crate) fn resolve(self, store: &WorkoutStore) -> String {
        self.exercise_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| store.selected_exercise_id().to_string())
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogWorkoutRequest {
    /// Full timestamp or `YYYY-MM-DD`; now when absent
    pub date: Option<String>,
    #[validate(range(min = 0.0))]
    pub calories: f64,
    /// Defaults to the selected exercise
    pub exercise_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UpdateWorkoutRequest {
    /// Full timestamp, or `YYYY-MM-DD` to keep the original time of day
    #[validate(length(min = 1))]
    pub date: String,
    #[validate(range(min = 0.0))]
    pub calories: f64,
    #[validate(length(min = 1))]
    pub exercise_id: String,
}

async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExerciseQuery>,
) -> Result<Json<Vec<Workout>>> {
    let store = state.store()?;
    let exercise_id = query.resolve(&store);
    let workouts = stats::filter_by_exercise(store.workouts(), &exercise_id)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(workouts))
}

async fn log_workout(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<LogWorkoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Workout>)> {
    let body = validated(payload)?;
    let now = Utc::now();
    let date = match body.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        None => format_utc_rfc3339(now),
        Some(raw) => resolve_session_date(raw, now).ok_or_else(|| invalid_date(raw))?,
    };

    let mut store = state.store()?;
    let exercise_id = ExerciseQuery {
        exercise_id: body.exercise_id,
    }
    .resolve(&store);
    ensure_exercise(&store, &exercise_id)?;

    let workout = store.add_workout(&date, body.calories, &exercise_id)?;
    Ok((StatusCode::CREATED, Json(workout)))
}

async fn update_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateWorkoutRequest>, JsonRejection>,
) -> Result<Json<Workout>> {
    let body = validated(payload)?;

    let mut store = state.store()?;
    let original = store
        .workout(&id)
        .ok_or_else(|| workout_not_found(&id))?;
    let time_source = original.timestamp().unwrap_or_else(Utc::now);
    let date = resolve_session_date(&body.date, time_source).ok_or_else(|| invalid_date(&body.date))?;
    ensure_exercise(&store, &body.exercise_id)?;

    let updated = store.update_workout(&id, &date, body.calories, &body.exercise_id)?;
    updated.map(Json).ok_or_else(|| workout_not_found(&id))
}

async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.store()?.delete_workout(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(workout_not_found(&id))
    }
}

fn ensure_exercise(store: &WorkoutStore, exercise_id: &str) -> Result<()> {
    if store.exercise(exercise_id).is_none() {
        return Err(AppError::BadRequest(format!(
            "Unknown exercise {}",
            exercise_id
        )));
    }
    Ok(())
}

fn invalid_date(raw: &str) -> AppError {
    AppError::BadRequest(format!("Invalid date: {}", raw))
}

fn workout_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Workout {} not found", id))
}

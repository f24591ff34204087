// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise management routes.

use crate::error::{AppError, Result};
use crate::models::Exercise;
use crate::routes::validated;
use crate::services::{DeleteExerciseOutcome, WorkoutStore};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/exercises", get(list_exercises).post(create_exercise))
        .route(
            "/api/exercises/{id}",
            patch(rename_exercise).delete(delete_exercise),
        )
        .route("/api/exercises/{id}/default", post(set_default_exercise))
        .route("/api/exercises/{id}/select", post(select_exercise))
}

// ─── Types ───────────────────────────────────────────────────

/// All exercises plus the active one.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExerciseListResponse {
    pub exercises: Vec<Exercise>,
    pub selected_exercise_id: String,
}

impl ExerciseListResponse {
    fn from_store(store: &WorkoutStore) -> Self {
        Self {
            exercises: store.exercises().to_vec(),
            selected_exercise_id: store.selected_exercise_id().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CreateExerciseRequest {
    #[validate(length(min = 1, max = 80))]
    pub base_name: String,
    /// Minutes
    #[validate(range(min = 1, max = 1440))]
    pub duration: u32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RenameExerciseRequest {
    #[validate(length(min = 1, max = 80))]
    pub base_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteExerciseResponse {
    pub removed_workouts: usize,
    /// Exercise that became the default, if the default was deleted
    pub promoted_default: Option<String>,
    pub selected_exercise_id: String,
}

// ─── Handlers ────────────────────────────────────────────────

async fn list_exercises(State(state): State<Arc<AppState>>) -> Result<Json<ExerciseListResponse>> {
    let store = state.store()?;
    Ok(Json(ExerciseListResponse::from_store(&store)))
}

async fn create_exercise(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CreateExerciseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Exercise>)> {
    let body = validated(payload)?;
    let exercise = state.store()?.add_exercise(&body.base_name, body.duration)?;
    Ok((StatusCode::CREATED, Json(exercise)))
}

async fn rename_exercise(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<RenameExerciseRequest>, JsonRejection>,
) -> Result<Json<Exercise>> {
    let body = validated(payload)?;
    let renamed = state.store()?.edit_exercise(&id, &body.base_name)?;
    renamed.map(Json).ok_or_else(|| exercise_not_found(&id))
}

async fn delete_exercise(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteExerciseResponse>> {
    let mut store = state.store()?;
    match store.delete_exercise(&id)? {
        DeleteExerciseOutcome::Deleted {
            removed_workouts,
            promoted_default,
            ..
        } => Ok(Json(DeleteExerciseResponse {
            removed_workouts,
            promoted_default,
            selected_exercise_id: store.selected_exercise_id().to_string(),
        })),
        DeleteExerciseOutcome::LastRemaining => {
            Err(AppError::Conflict(AppError::LAST_EXERCISE.to_string()))
        }
        DeleteExerciseOutcome::NotFound => Err(exercise_not_found(&id)),
    }
}

async fn set_default_exercise(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ExerciseListResponse>> {
    let mut store = state.store()?;
    if !store.set_default_exercise(&id)? {
        return Err(exercise_not_found(&id));
    }
    Ok(Json(ExerciseListResponse::from_store(&store)))
}

async fn select_exercise(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ExerciseListResponse>> {
    let mut store = state.store()?;
    if !store.select_exercise(&id) {
        return Err(exercise_not_found(&id));
    }
    tracing::debug!(exercise = %id, "Exercise selected");
    Ok(Json(ExerciseListResponse::from_store(&store)))
}

fn exercise_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Exercise {} not found", id))
}

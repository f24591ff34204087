// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived views: statistics, trend series and coaching.

use crate::error::{AppError, Result};
use crate::models::{CoachResponse, TrendPoint, Workout, WorkoutStats, WorkoutSummary};
use crate::routes::workouts::ExerciseQuery;
use crate::services::stats::{self, TREND_WINDOW};
use crate::services::{CoachKey, CoachPlan};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/stats", get(get_stats))
        .route("/api/trend", get(get_trend))
        .route("/api/coach", get(get_coach))
}

// ─── Statistics ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatsResponse {
    pub exercise_id: String,
    /// `None` until the first session is logged
    pub stats: Option<WorkoutStats>,
    pub summary: WorkoutSummary,
}

async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExerciseQuery>,
) -> Result<Json<StatsResponse>> {
    let store = state.store()?;
    let exercise_id = query.resolve(&store);
    let workouts = stats::filter_by_exercise(store.workouts(), &exercise_id);

    Ok(Json(StatsResponse {
        stats: stats::compute_stats(&workouts, Utc::now()),
        summary: stats::summarize(&workouts),
        exercise_id,
    }))
}

// ─── Trend ───────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrendQuery {
    pub exercise_id: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub window: Option<usize>,
}

async fn get_trend(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<Vec<TrendPoint>>> {
    query
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let store = state.store()?;
    let window = query.window.unwrap_or(TREND_WINDOW);
    let exercise_id = ExerciseQuery {
        exercise_id: query.exercise_id,
    }
    .resolve(&store);
    let workouts = stats::filter_by_exercise(store.workouts(), &exercise_id);

    Ok(Json(stats::build_trend_series(&workouts, window)))
}

// ─── Coaching ────────────────────────────────────────────────

/// Coaching state for the selected exercise.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum CoachStatus {
    /// No API key configured
    Disabled,
    Ready { coach: CoachResponse },
    /// The selection or the log changed while the request was running
    Superseded,
}

async fn get_coach(State(state): State<Arc<AppState>>) -> Result<Json<CoachStatus>> {
    if !state.coach.is_enabled() {
        return Ok(Json(CoachStatus::Disabled));
    }

    // Snapshot under the lock; the request itself runs without it.
    let (key, history) = {
        let store = state.store()?;
        let exercise_id = store.selected_exercise_id().to_string();
        let history: Vec<Workout> = stats::filter_by_exercise(store.workouts(), &exercise_id)
            .into_iter()
            .cloned()
            .collect();
        let key = CoachKey {
            exercise_id,
            workout_count: history.len(),
        };
        (key, history)
    };

    let plan = state.coach_tracker()?.begin(key);
    let ticket = match plan {
        CoachPlan::Cached(coach) => return Ok(Json(CoachStatus::Ready { coach })),
        CoachPlan::Fetch(ticket) => ticket,
    };

    let Some(coach) = state.coach.coach(&history).await else {
        return Ok(Json(CoachStatus::Disabled));
    };

    if state.coach_tracker()?.complete(&ticket, coach.clone()) {
        Ok(Json(CoachStatus::Ready { coach }))
    } else {
        Ok(Json(CoachStatus::Superseded))
    }
}

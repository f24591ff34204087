//! Derived statistics views returned to the dashboard.
//!
//! Nothing here is persisted; every value is recomputed from the current
//! workout snapshot by `services::stats`.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::Workout;

/// Latest-session comparison for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutStats {
    /// Most recent session by date
    pub current: Workout,
    /// Session immediately before `current`
    pub previous: Option<Workout>,
    /// `current.calories - previous.calories`, 0 without a previous session
    pub delta: f64,
    /// Delta relative to the previous session, one decimal.
    /// `None` when the previous session burned 0 calories.
    pub delta_percent: Option<f64>,
    /// All-time best calories
    pub best: f64,
    /// Sessions in the last 7 days
    pub weekly_count: usize,
    /// Whether the latest session matches or beats the best
    pub is_personal_best: bool,
}

/// Totals over a workout history.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutSummary {
    pub total_workouts: usize,
    pub best_calories: f64,
    pub average_calories: f64,
    pub average_intensity: f64,
    /// Consecutive days with at least one session, ending on the latest session day
    pub current_streak: u32,
}

/// One point of the progression chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrendPoint {
    /// Unique per point even when two sessions share a timestamp
    pub key: String,
    pub workout_id: String,
    pub date: String,
    pub calories: f64,
    /// UTC display label, e.g. "Jan 8"
    pub label: String,
}

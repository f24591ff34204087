// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Logged workout sessions.

use crate::time_utils::parse_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One logged session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Workout {
    pub id: String,
    /// Exercise this session was logged against
    pub exercise_id: String,
    /// Session timestamp (RFC3339 for records created here)
    pub date: String,
    /// Calories burned
    pub calories: f64,
    /// Exercise duration at the time the session was logged
    pub duration_minutes: u32,
    /// Calories per minute
    pub intensity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Fields written by other versions, kept so a load/save cycle is lossless.
    #[serde(flatten)]
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Workout {
    /// Parsed session timestamp, `None` if the stored date is malformed.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date)
    }
}

impl AsRef<Workout> for Workout {
    fn as_ref(&self) -> &Workout {
        self
    }
}

/// Calories per minute. A zero duration is treated as one minute.
pub fn intensity(calories: f64, duration_minutes: u32) -> f64 {
    calories / f64::from(duration_minutes.max(1))
}

/// Workout as it may appear in storage written by any earlier schema.
///
/// Sessions logged before exercises existed carry no `exerciseId`, and the
/// oldest records predate `durationMinutes` and `intensity`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredWorkout {
    pub id: String,
    #[serde(default)]
    pub exercise_id: Option<String>,
    pub date: String,
    pub calories: f64,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub intensity: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl StoredWorkout {
    /// Exercise id if present and non-empty.
    pub fn linked_exercise(&self) -> Option<&str> {
        self.exercise_id.as_deref().filter(|id| !id.is_empty())
    }
}

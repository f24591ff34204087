// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Exercise templates that workouts are logged against.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Id of the exercise seeded on first run.
pub const DEFAULT_EXERCISE_ID: &str = "default-ex-1";
/// Base name of the exercise seeded on first run.
pub const DEFAULT_EXERCISE_BASE_NAME: &str = "HIIT Bike";
/// Duration (minutes) of the exercise seeded on first run.
pub const DEFAULT_EXERCISE_DURATION: u32 = 20;

/// A named, fixed-duration activity template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Exercise {
    pub id: String,
    /// Display name, always `"{base_name} ({duration}m)"` after a mutation
    #[serde(default)]
    pub name: String,
    /// User-editable label
    pub base_name: String,
    /// Session length in minutes
    pub duration: u32,
    #[serde(default)]
    pub is_default: bool,
}

impl Exercise {
    pub fn new(id: impl Into<String>, base_name: impl Into<String>, duration: u32) -> Self {
        let base_name = base_name.into();
        Self {
            id: id.into(),
            name: display_name(&base_name, duration),
            base_name,
            duration,
            is_default: false,
        }
    }

    /// The exercise synthesized when nothing usable is persisted.
    pub fn seeded_default() -> Self {
        let mut exercise = Self::new(
            DEFAULT_EXERCISE_ID,
            DEFAULT_EXERCISE_BASE_NAME,
            DEFAULT_EXERCISE_DURATION,
        );
        exercise.is_default = true;
        exercise
    }

    /// Change the base name and recompute the display name.
    pub fn rename(&mut self, base_name: impl Into<String>) {
        self.base_name = base_name.into();
        self.refresh_name();
    }

    pub fn refresh_name(&mut self) {
        self.name = display_name(&self.base_name, self.duration);
    }
}

/// Display string for an exercise.
pub fn display_name(base_name: &str, duration: u32) -> String {
    format!("{} ({}m)", base_name, duration)
}

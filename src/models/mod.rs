// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod coach;
pub mod exercise;
pub mod stats;
pub mod workout;

pub use coach::{CoachEntry, CoachResponse, VibeCheck};
pub use exercise::Exercise;
pub use stats::{TrendPoint, WorkoutStats, WorkoutSummary};
pub use workout::{StoredWorkout, Workout};

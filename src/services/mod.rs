// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod coach;
pub mod gemini;
pub mod stats;
pub mod store;

pub use coach::{
    Coach, CoachError, CoachKey, CoachPlan, CoachTicket, CoachTracker, CoachingBridge,
    FallbackCoach, LocalCoach,
};
pub use gemini::GeminiCoach;
pub use store::{DeleteExerciseOutcome, WorkoutStore};

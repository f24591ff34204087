// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! VeloVibe: log timed workouts and track calorie progression
//!
//! This crate provides the backend API for recording exercise sessions,
//! deriving trend statistics from them and asking an AI coach for the
//! next calorie target.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use error::AppError;
use services::{CoachTracker, CoachingBridge, WorkoutStore};
use std::sync::{Mutex, MutexGuard};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Mutex<WorkoutStore>,
    pub coach: CoachingBridge,
    pub coach_tracker: Mutex<CoachTracker>,
}

impl AppState {
    pub fn new(config: Config, store: WorkoutStore, coach: CoachingBridge) -> Self {
        Self {
            config,
            store: Mutex::new(store),
            coach,
            coach_tracker: Mutex::new(CoachTracker::new()),
        }
    }

    /// Lock the store. Never hold the guard across an `.await`.
    pub fn store(&self) -> Result<MutexGuard<'_, WorkoutStore>, AppError> {
        self.store
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("workout store lock poisoned")))
    }

    pub fn coach_tracker(&self) -> Result<MutexGuard<'_, CoachTracker>, AppError> {
        self.coach_tracker
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("coach tracker lock poisoned")))
    }
}

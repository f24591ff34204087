// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Canonical exercise and workout collections.
//!
//! `WorkoutStore` is the only place either collection changes. Every mutation
//! builds the next collection on a copy, persists it, and only then swaps it
//! in, so a rejected call or a failed write leaves the in-memory state as it
//! was. The one exception is a cascade whose rollback write also fails: memory
//! then follows storage. Invariants held after every call:
//! - at least one exercise exists,
//! - exactly one exercise is flagged default,
//! - no workout outlives its exercise.

use crate::db::{keys, load_state, KeyValueStore, MigrationReport};
use crate::error::{AppError, Result};
use crate::models::workout::intensity;
use crate::models::{Exercise, Workout};
use serde::Serialize;
use std::sync::Arc;

/// Result of [`WorkoutStore::delete_exercise`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteExerciseOutcome {
    Deleted {
        /// Workouts removed along with the exercise
        removed_workouts: usize,
        /// Exercise promoted to default, when the default was deleted
        promoted_default: Option<String>,
        /// Exercise selected instead, when the selected one was deleted
        reselected: Option<String>,
    },
    /// Refused: it is the only exercise left
    LastRemaining,
    NotFound,
}

/// Owner of the exercise and workout collections.
pub struct WorkoutStore {
    kv: Arc<dyn KeyValueStore>,
    exercises: Vec<Exercise>,
    workouts: Vec<Workout>,
    selected_exercise_id: String,
    migration: MigrationReport,
}

impl WorkoutStore {
    /// Load (and migrate) persisted state from `kv`.
    pub fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        let loaded = load_state(kv.as_ref());
        Self {
            kv,
            exercises: loaded.exercises,
            workouts: loaded.workouts,
            selected_exercise_id: loaded.selected_exercise_id,
            migration: loaded.report,
        }
    }

    // ─── Reads ───────────────────────────────────────────────────

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    /// All workouts, most recently logged first.
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn exercise(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn workout(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == id)
    }

    pub fn default_exercise(&self) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.is_default)
    }

    pub fn selected_exercise_id(&self) -> &str {
        &self.selected_exercise_id
    }

    /// What the startup migration changed.
    pub fn migration_report(&self) -> &MigrationReport {
        &self.migration
    }

    /// Make `id` the active exercise. Returns `false` for an unknown id.
    pub fn select_exercise(&mut self, id: &str) -> bool {
        if self.exercise(id).is_none() {
            return false;
        }
        self.selected_exercise_id = id.to_string();
        true
    }

    // ─── Workout Operations ──────────────────────────────────────

    /// Log a new session.
    ///
    /// Duration is copied from the exercise as it is now. An unknown
    /// exercise id resolves to a one-minute duration.
    pub fn add_workout(&mut self, date: &str, calories: f64, exercise_id: &str) -> Result<Workout> {
        validate_calories(calories)?;

        let duration_minutes = match self.exercise(exercise_id) {
            Some(exercise) => exercise.duration.max(1),
            None => {
                tracing::warn!(exercise_id, "Logging workout against unknown exercise");
                1
            }
        };

        let workout = Workout {
            id: uuid::Uuid::new_v4().to_string(),
            exercise_id: exercise_id.to_string(),
            date: date.to_string(),
            calories,
            duration_minutes,
            intensity: intensity(calories, duration_minutes),
            notes: None,
            extra: serde_json::Map::new(),
        };

        let mut next = Vec::with_capacity(self.workouts.len() + 1);
        next.push(workout.clone());
        next.extend(self.workouts.iter().cloned());
        self.commit_workouts(next)?;

        tracing::info!(workout = %workout.id, exercise_id, calories, "Workout logged");
        Ok(workout)
    }

    /// Replace date, calories and exercise of a session.
    ///
    /// Duration and intensity keep their historical values. Returns `None`
    /// without touching anything if `id` is unknown.
    pub fn update_workout(
        &mut self,
        id: &str,
        date: &str,
        calories: f64,
        exercise_id: &str,
    ) -> Result<Option<Workout>> {
        validate_calories(calories)?;

        let Some(index) = self.workouts.iter().position(|w| w.id == id) else {
            return Ok(None);
        };

        let mut next = self.workouts.clone();
        let workout = &mut next[index];
        workout.date = date.to_string();
        workout.calories = calories;
        workout.exercise_id = exercise_id.to_string();
        let updated = workout.clone();

        self.commit_workouts(next)?;
        tracing::info!(workout = %id, "Workout updated");
        Ok(Some(updated))
    }

    /// Remove a session. Returns whether it existed.
    pub fn delete_workout(&mut self, id: &str) -> Result<bool> {
        if self.workout(id).is_none() {
            return Ok(false);
        }

        let next: Vec<Workout> = self
            .workouts
            .iter()
            .filter(|w| w.id != id)
            .cloned()
            .collect();
        self.commit_workouts(next)?;

        tracing::info!(workout = %id, "Workout deleted");
        Ok(true)
    }

    // ─── Exercise Operations ─────────────────────────────────────

    /// Create a new (non-default) exercise and select it.
    pub fn add_exercise(&mut self, base_name: &str, duration: u32) -> Result<Exercise> {
        let base_name = base_name.trim();
        if base_name.is_empty() {
            return Err(AppError::BadRequest(
                "Exercise name must not be empty".to_string(),
            ));
        }
        if duration == 0 {
            return Err(AppError::BadRequest(
                "Exercise duration must be a positive number of minutes".to_string(),
            ));
        }

        let exercise = Exercise::new(uuid::Uuid::new_v4().to_string(), base_name, duration);

        let mut next = self.exercises.clone();
        next.push(exercise.clone());
        self.commit_exercises(next)?;
        self.selected_exercise_id = exercise.id.clone();

        tracing::info!(exercise = %exercise.id, name = %exercise.name, "Exercise added");
        Ok(exercise)
    }

    /// Rename an exercise. Duration is unchanged.
    pub fn edit_exercise(&mut self, id: &str, new_base_name: &str) -> Result<Option<Exercise>> {
        let new_base_name = new_base_name.trim();
        if new_base_name.is_empty() {
            return Err(AppError::BadRequest(
                "Exercise name must not be empty".to_string(),
            ));
        }

        let Some(index) = self.exercises.iter().position(|e| e.id == id) else {
            return Ok(None);
        };

        let mut next = self.exercises.clone();
        next[index].rename(new_base_name);
        let renamed = next[index].clone();
        self.commit_exercises(next)?;

        tracing::info!(exercise = %id, name = %renamed.name, "Exercise renamed");
        Ok(Some(renamed))
    }

    /// Delete an exercise together with all of its workouts.
    pub fn delete_exercise(&mut self, id: &str) -> Result<DeleteExerciseOutcome> {
        let Some(target) = self.exercise(id) else {
            return Ok(DeleteExerciseOutcome::NotFound);
        };
        if self.exercises.len() <= 1 {
            tracing::warn!(exercise = %id, "Refusing to delete the last exercise");
            return Ok(DeleteExerciseOutcome::LastRemaining);
        }
        let was_default = target.is_default;

        let mut next_exercises: Vec<Exercise> = self
            .exercises
            .iter()
            .filter(|e| e.id != id)
            .cloned()
            .collect();

        let promoted_default = if was_default {
            next_exercises.first_mut().map(|e| {
                e.is_default = true;
                e.id.clone()
            })
        } else {
            None
        };

        let reselected = if self.selected_exercise_id == id {
            next_exercises.first().map(|e| e.id.clone())
        } else {
            None
        };

        let before = self.workouts.len();
        let next_workouts: Vec<Workout> = self
            .workouts
            .iter()
            .filter(|w| w.exercise_id != id)
            .cloned()
            .collect();
        let removed_workouts = before - next_workouts.len();

        // Workouts go first so storage never holds sessions without an exercise.
        self.persist(keys::WORKOUTS, &next_workouts)?;
        if let Err(e) = self.persist(keys::EXERCISES, &next_exercises) {
            if let Err(rollback) = self.persist(keys::WORKOUTS, &self.workouts) {
                // Memory has to follow what storage now holds.
                tracing::error!(
                    exercise = %id,
                    error = %rollback,
                    "Failed to restore workouts after partial exercise delete"
                );
                self.workouts = next_workouts;
            }
            return Err(e);
        }
        self.workouts = next_workouts;
        self.exercises = next_exercises;
        if let Some(selected) = &reselected {
            self.selected_exercise_id = selected.clone();
        }

        tracing::info!(
            exercise = %id,
            removed_workouts,
            promoted_default = ?promoted_default,
            reselected = ?reselected,
            "Exercise deleted"
        );

        Ok(DeleteExerciseOutcome::Deleted {
            removed_workouts,
            promoted_default,
            reselected,
        })
    }

    /// Make `id` the only default exercise. Returns `false` for an unknown id.
    pub fn set_default_exercise(&mut self, id: &str) -> Result<bool> {
        if self.exercise(id).is_none() {
            return Ok(false);
        }

        let next: Vec<Exercise> = self
            .exercises
            .iter()
            .cloned()
            .map(|mut e| {
                e.is_default = e.id == id;
                e
            })
            .collect();
        self.commit_exercises(next)?;

        tracing::info!(exercise = %id, "Default exercise changed");
        Ok(true)
    }

    // ─── Persistence ─────────────────────────────────────────────

    fn commit_workouts(&mut self, next: Vec<Workout>) -> Result<()> {
        self.persist(keys::WORKOUTS, &next)?;
        self.workouts = next;
        Ok(())
    }

    fn commit_exercises(&mut self, next: Vec<Exercise>) -> Result<()> {
        self.persist(keys::EXERCISES, &next)?;
        self.exercises = next;
        Ok(())
    }

    fn persist<T: Serialize>(&self, key: &str, value: &[T]) -> Result<()> {
        let serialized = serde_json::to_string(value)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize {}: {}", key, e)))?;
        self.kv.set(key, &serialized)
    }
}

fn validate_calories(calories: f64) -> Result<()> {
    if calories.is_finite() && calories >= 0.0 {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "Calories must be a non-negative number".to_string(),
        ))
    }
}

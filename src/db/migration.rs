// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Startup load and schema migration.
//!
//! Brings whatever is persisted (possibly nothing, possibly garbage, possibly
//! written by an older schema) into a state where:
//! - at least one exercise exists,
//! - every workout carries an `exerciseId`, `durationMinutes` and `intensity`.
//!
//! Exercises are read one entry at a time so a single bad record cannot take
//! the rest of the collection down with it. Workouts pointing at an exercise
//! that is not loaded are kept as stored.
//!
//! Collections are written back only when their serialized form differs from
//! what was read, so running the load twice never rewrites storage.

use crate::db::{keys, KeyValueStore};
use crate::models::exercise::DEFAULT_EXERCISE_ID;
use crate::models::workout::intensity;
use crate::models::{Exercise, StoredWorkout, Workout};
use serde::Serialize;
use serde_json::Value;

/// In-memory state produced by [`load_state`].
#[derive(Debug, Clone)]
pub struct LoadedState {
    pub exercises: Vec<Exercise>,
    pub workouts: Vec<Workout>,
    /// Exercise selected on startup (the default, or the first one)
    pub selected_exercise_id: String,
    pub report: MigrationReport,
}

/// What the load had to change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// No usable exercises were stored; the default one was created
    pub seeded_default: bool,
    /// Exercises stored without a display name
    pub names_derived: usize,
    /// Exercises stored with a fractional duration, rounded to whole minutes
    pub durations_rounded: usize,
    /// Stored exercises that could not be read; storage is left as it was
    pub exercises_skipped: usize,
    /// No exercise carries the default flag; the first one was selected
    pub default_missing: bool,
    /// Workouts without an exercise id, assigned to the default exercise
    pub workouts_reassigned: usize,
    /// Workouts pointing at an exercise that is not loaded, kept as stored
    pub workouts_orphaned: usize,
    /// Workouts missing duration or intensity
    pub workouts_backfilled: usize,
    /// Stored workouts could not be parsed and were ignored
    pub workouts_unreadable: bool,
    pub exercises_rewritten: bool,
    pub workouts_rewritten: bool,
}

/// Load both collections, migrating them to the current schema.
///
/// Never fails: unreadable data degrades to the default exercise and an
/// empty workout list, and storage errors are logged.
pub fn load_state(kv: &dyn KeyValueStore) -> LoadedState {
    let mut report = MigrationReport::default();

    // ─── Exercises ───────────────────────────────────────────────
    let raw_exercises = read_key(kv, keys::EXERCISES);
    let mut exercises = match raw_exercises.as_deref() {
        Some(raw) => parse_exercises(raw, &mut report),
        None => Vec::new(),
    };
    // Rewriting after dropping an entry would lose it for good.
    let partially_read = report.exercises_skipped > 0 && !exercises.is_empty();

    if exercises.is_empty() {
        exercises.push(Exercise::seeded_default());
        report.seeded_default = true;
    } else {
        for exercise in exercises.iter_mut().filter(|e| e.name.is_empty()) {
            exercise.refresh_name();
            report.names_derived += 1;
        }
    }
    if partially_read {
        tracing::warn!(
            skipped = report.exercises_skipped,
            "Some stored exercises are unreadable, leaving stored exercises as they are"
        );
    } else {
        report.exercises_rewritten =
            write_back(kv, keys::EXERCISES, raw_exercises.as_deref(), &exercises);
    }

    // The flag itself is left alone when no exercise carries it.
    let selected_exercise_id = match exercises.iter().find(|e| e.is_default) {
        Some(exercise) => exercise.id.clone(),
        None => {
            report.default_missing = true;
            tracing::warn!("No default exercise flagged, selecting the first one");
            exercises
                .first()
                .map(|e| e.id.clone())
                .unwrap_or_else(|| DEFAULT_EXERCISE_ID.to_string())
        }
    };

    // ─── Workouts ────────────────────────────────────────────────
    let raw_workouts = read_key(kv, keys::WORKOUTS);
    let workouts = match raw_workouts.as_deref() {
        None => Vec::new(),
        Some(raw) => match serde_json::from_str::<Vec<StoredWorkout>>(raw) {
            Ok(stored) => {
                let migrated: Vec<Workout> = stored
                    .into_iter()
                    .map(|w| migrate_workout(w, &selected_exercise_id, &exercises, &mut report))
                    .collect();
                report.workouts_rewritten =
                    write_back(kv, keys::WORKOUTS, Some(raw), &migrated);
                migrated
            }
            Err(e) => {
                // Left on disk untouched; the next workout mutation replaces it.
                tracing::warn!(error = %e, "Failed to parse stored workouts, starting empty");
                report.workouts_unreadable = true;
                Vec::new()
            }
        },
    };

    tracing::info!(
        exercises = exercises.len(),
        workouts = workouts.len(),
        selected = %selected_exercise_id,
        seeded_default = report.seeded_default,
        reassigned = report.workouts_reassigned,
        orphaned = report.workouts_orphaned,
        exercises_skipped = report.exercises_skipped,
        backfilled = report.workouts_backfilled,
        exercises_rewritten = report.exercises_rewritten,
        workouts_rewritten = report.workouts_rewritten,
        "Loaded persisted state"
    );

    LoadedState {
        exercises,
        workouts,
        selected_exercise_id,
        report,
    }
}

/// Bring one stored workout up to the current schema.
fn migrate_workout(
    stored: StoredWorkout,
    default_exercise_id: &str,
    exercises: &[Exercise],
    report: &mut MigrationReport,
) -> Workout {
    let exercise_id = match stored.linked_exercise() {
        Some(id) => {
            if !exercises.iter().any(|e| e.id == id) {
                tracing::warn!(workout = %stored.id, exercise = id, "Workout references unknown exercise");
                report.workouts_orphaned += 1;
            }
            id.to_string()
        }
        None => {
            report.workouts_reassigned += 1;
            default_exercise_id.to_string()
        }
    };

    let (duration_minutes, per_minute) = match (stored.duration_minutes, stored.intensity) {
        (Some(duration), Some(value)) => (duration, value),
        (duration, stored_intensity) => {
            report.workouts_backfilled += 1;
            let duration = duration.unwrap_or_else(|| {
                exercises
                    .iter()
                    .find(|e| e.id == exercise_id)
                    .map(|e| e.duration)
                    .unwrap_or(1)
            });
            let value = stored_intensity.unwrap_or_else(|| intensity(stored.calories, duration));
            (duration, value)
        }
    };

    Workout {
        id: stored.id,
        exercise_id,
        date: stored.date,
        calories: stored.calories,
        duration_minutes,
        intensity: per_minute,
        notes: stored.notes,
        extra: stored.extra,
    }
}

/// Parse the stored exercise array entry by entry, skipping unreadable ones.
fn parse_exercises(raw: &str, report: &mut MigrationReport) -> Vec<Exercise> {
    let entries: Vec<Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse stored exercises, using default");
            return Vec::new();
        }
    };

    let mut exercises = Vec::with_capacity(entries.len());
    for (index, mut entry) in entries.into_iter().enumerate() {
        if round_fractional_duration(&mut entry) {
            report.durations_rounded += 1;
        }
        match serde_json::from_value::<Exercise>(entry) {
            Ok(exercise) => exercises.push(exercise),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable stored exercise");
                report.exercises_skipped += 1;
            }
        }
    }
    exercises
}

/// Round a positive non-integer `duration` to whole minutes (at least 1).
fn round_fractional_duration(entry: &mut Value) -> bool {
    let Some(duration) = entry.get_mut("duration") else {
        return false;
    };
    match duration.as_f64() {
        Some(minutes) if duration.as_u64().is_none() && minutes.is_finite() && minutes > 0.0 => {
            *duration = Value::from(minutes.round().max(1.0) as u64);
            true
        }
        _ => false,
    }
}

fn read_key(kv: &dyn KeyValueStore, key: &str) -> Option<String> {
    match kv.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(key, error = %e, "Failed to read persisted collection");
            None
        }
    }
}

/// Persist `value` under `key` unless it serializes to exactly `previous`.
/// Returns whether a write happened.
fn write_back<T: Serialize + ?Sized>(
    kv: &dyn KeyValueStore,
    key: &str,
    previous: Option<&str>,
    value: &T,
) -> bool {
    let serialized = match serde_json::to_string(value) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(key, error = %e, "Failed to serialize migrated collection");
            return false;
        }
    };

    if previous == Some(serialized.as_str()) {
        return false;
    }

    match kv.set(key, &serialized) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(key, error = %e, "Failed to persist migrated collection");
            false
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Store mutation and persistence tests.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use velovibe::db::{keys, MemoryStore};
use velovibe::models::{Exercise, Workout};
use velovibe::services::{DeleteExerciseOutcome, WorkoutStore};

fn open() -> (Arc<MemoryStore>, WorkoutStore) {
    let kv = Arc::new(MemoryStore::new());
    let store = WorkoutStore::open(kv.clone());
    (kv, store)
}

fn persisted_workouts(kv: &MemoryStore) -> Vec<Workout> {
    serde_json::from_str(&kv.raw(keys::WORKOUTS).unwrap()).unwrap()
}

fn persisted_exercises(kv: &MemoryStore) -> Vec<Exercise> {
    serde_json::from_str(&kv.raw(keys::EXERCISES).unwrap()).unwrap()
}

fn default_count(store: &WorkoutStore) -> usize {
    store.exercises().iter().filter(|e| e.is_default).count()
}

#[test]
fn test_add_workout_copies_duration_and_prepends() {
    let (kv, mut store) = open();

    let first = store
        .add_workout("2026-01-01T10:00:00.000Z", 300.0, "default-ex-1")
        .unwrap();
    let second = store
        .add_workout("2026-01-02T10:00:00.000Z", 350.0, "default-ex-1")
        .unwrap();

    assert_eq!(second.duration_minutes, 20);
    assert_eq!(second.intensity, 17.5);
    assert_ne!(first.id, second.id);
    assert_eq!(store.workouts()[0].id, second.id);

    let persisted = persisted_workouts(&kv);
    assert_eq!(persisted, store.workouts());
}

#[test]
fn test_add_workout_unknown_exercise_uses_one_minute() {
    let (_, mut store) = open();
    let workout = store
        .add_workout("2026-01-01T10:00:00.000Z", 90.0, "no-such-exercise")
        .unwrap();

    assert_eq!(workout.duration_minutes, 1);
    assert_eq!(workout.intensity, 90.0);
}

#[test]
fn test_update_keeps_duration_and_intensity() {
    let (kv, mut store) = open();
    let rower = store.add_exercise("Rower", 15).unwrap();
    let workout = store
        .add_workout("2026-01-01T10:00:00.000Z", 300.0, "default-ex-1")
        .unwrap();

    let updated = store
        .update_workout(&workout.id, "2026-01-03T09:00:00.000Z", 330.0, &rower.id)
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, workout.id);
    assert_eq!(updated.date, "2026-01-03T09:00:00.000Z");
    assert_eq!(updated.calories, 330.0);
    assert_eq!(updated.exercise_id, rower.id);
    assert_eq!(updated.duration_minutes, 20);
    assert_eq!(updated.intensity, 15.0);
    assert_eq!(persisted_workouts(&kv)[0], updated);
}

#[test]
fn test_update_unknown_id_is_noop() {
    let (kv, mut store) = open();
    store
        .add_workout("2026-01-01T10:00:00.000Z", 300.0, "default-ex-1")
        .unwrap();
    let writes = kv.writes();

    let result = store
        .update_workout("missing", "2026-01-02T10:00:00.000Z", 1.0, "default-ex-1")
        .unwrap();

    assert!(result.is_none());
    assert_eq!(kv.writes(), writes);
    assert_eq!(store.workouts()[0].calories, 300.0);
}

#[test]
fn test_delete_workout() {
    let (kv, mut store) = open();
    let workout = store
        .add_workout("2026-01-01T10:00:00.000Z", 300.0, "default-ex-1")
        .unwrap();

    assert!(store.delete_workout(&workout.id).unwrap());
    assert!(!store.delete_workout(&workout.id).unwrap());
    assert!(store.workouts().is_empty());
    assert!(persisted_workouts(&kv).is_empty());
}

#[test]
fn test_add_exercise_selects_it() {
    let (kv, mut store) = open();
    let rower = store.add_exercise("  Rower ", 15).unwrap();

    assert_eq!(rower.base_name, "Rower");
    assert_eq!(rower.name, "Rower (15m)");
    assert!(!rower.is_default);
    assert_eq!(store.selected_exercise_id(), rower.id);
    assert_eq!(default_count(&store), 1);
    assert_eq!(persisted_exercises(&kv).len(), 2);
}

#[test]
fn test_edit_exercise_recomputes_name() {
    let (kv, mut store) = open();
    let renamed = store
        .edit_exercise("default-ex-1", "Assault Bike")
        .unwrap()
        .unwrap();

    assert_eq!(renamed.name, "Assault Bike (20m)");
    assert_eq!(renamed.duration, 20);
    assert_eq!(persisted_exercises(&kv)[0].name, "Assault Bike (20m)");
    assert!(store.edit_exercise("missing", "X").unwrap().is_none());
}

#[test]
fn test_cannot_delete_last_exercise() {
    let (kv, mut store) = open();
    store
        .add_workout("2026-01-01T10:00:00.000Z", 300.0, "default-ex-1")
        .unwrap();
    let writes = kv.writes();

    let outcome = store.delete_exercise("default-ex-1").unwrap();

    assert_eq!(outcome, DeleteExerciseOutcome::LastRemaining);
    assert_eq!(store.exercises().len(), 1);
    assert_eq!(store.workouts().len(), 1);
    assert_eq!(kv.writes(), writes);
}

#[test]
fn test_delete_default_cascades_and_promotes() {
    let (kv, mut store) = open();
    let rower = store.add_exercise("Rower", 15).unwrap();
    let ski = store.add_exercise("Ski Erg", 10).unwrap();
    for day in 1..=3 {
        store
            .add_workout(&format!("2026-01-0{}T10:00:00.000Z", day), 300.0, "default-ex-1")
            .unwrap();
    }
    store
        .add_workout("2026-01-04T10:00:00.000Z", 150.0, &rower.id)
        .unwrap();
    store.select_exercise("default-ex-1");

    let outcome = store.delete_exercise("default-ex-1").unwrap();

    assert_eq!(
        outcome,
        DeleteExerciseOutcome::Deleted {
            removed_workouts: 3,
            promoted_default: Some(rower.id.clone()),
            reselected: Some(rower.id.clone()),
        }
    );
    assert_eq!(store.exercises().len(), 2);
    assert_eq!(store.default_exercise().unwrap().id, rower.id);
    assert!(!store.exercise(&ski.id).unwrap().is_default);
    assert_eq!(store.selected_exercise_id(), rower.id);
    assert!(store.workouts().iter().all(|w| w.exercise_id == rower.id));

    // Storage agrees with memory and has no dangling references.
    let exercises = persisted_exercises(&kv);
    let workouts = persisted_workouts(&kv);
    assert_eq!(exercises.iter().filter(|e| e.is_default).count(), 1);
    assert!(workouts
        .iter()
        .all(|w| exercises.iter().any(|e| e.id == w.exercise_id)));
}

#[test]
fn test_delete_non_selected_exercise_keeps_selection() {
    let (_, mut store) = open();
    let rower = store.add_exercise("Rower", 15).unwrap();
    store.select_exercise("default-ex-1");

    let outcome = store.delete_exercise(&rower.id).unwrap();

    assert_eq!(
        outcome,
        DeleteExerciseOutcome::Deleted {
            removed_workouts: 0,
            promoted_default: None,
            reselected: None,
        }
    );
    assert_eq!(store.selected_exercise_id(), "default-ex-1");
    assert_eq!(
        store.delete_exercise("missing").unwrap(),
        DeleteExerciseOutcome::NotFound
    );
}

#[test]
fn test_set_default_exercise() {
    let (kv, mut store) = open();
    let rower = store.add_exercise("Rower", 15).unwrap();

    assert!(store.set_default_exercise(&rower.id).unwrap());
    assert_eq!(default_count(&store), 1);
    assert_eq!(store.default_exercise().unwrap().id, rower.id);

    assert!(!store.set_default_exercise("missing").unwrap());
    assert_eq!(default_count(&store), 1);
    assert_eq!(
        persisted_exercises(&kv)
            .iter()
            .find(|e| e.is_default)
            .unwrap()
            .id,
        rower.id
    );
}

#[test]
fn test_reopen_restores_state() {
    let kv = Arc::new(MemoryStore::new());
    let mut store = WorkoutStore::open(kv.clone());
    let rower = store.add_exercise("Rower", 15).unwrap();
    store.set_default_exercise(&rower.id).unwrap();
    store
        .add_workout("2026-01-04T10:00:00.000Z", 150.0, &rower.id)
        .unwrap();
    let writes = kv.writes();

    let reopened = WorkoutStore::open(kv.clone());

    assert_eq!(reopened.exercises(), store.exercises());
    assert_eq!(reopened.workouts(), store.workouts());
    assert_eq!(reopened.selected_exercise_id(), rower.id);
    assert_eq!(*reopened.migration_report(), Default::default());
    assert_eq!(kv.writes(), writes);
}

#[test]
fn test_random_exercise_sequences_keep_invariants() {
    for seed in 0..64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (kv, mut store) = open();

        for step in 0..40 {
            let ids: Vec<String> = store.exercises().iter().map(|e| e.id.clone()).collect();
            let target = ids[rng.gen_range(0..ids.len())].clone();

            match rng.gen_range(0..6) {
                0 => {
                    let duration = rng.gen_range(1..=90);
                    store.add_exercise(&format!("Drill {}", step), duration).unwrap();
                }
                1 => {
                    store
                        .edit_exercise(&target, &format!("Renamed {}", step))
                        .unwrap();
                }
                2 => {
                    store.delete_exercise(&target).unwrap();
                }
                3 => {
                    assert!(store.set_default_exercise(&target).unwrap());
                }
                4 => {
                    let calories = rng.gen_range(0.0..600.0);
                    store
                        .add_workout("2026-01-01T10:00:00.000Z", calories, &target)
                        .unwrap();
                }
                _ => {
                    assert!(store.select_exercise(&target));
                }
            }

            let context = format!("seed {} step {}", seed, step);
            assert!(!store.exercises().is_empty(), "{}", context);
            assert_eq!(default_count(&store), 1, "{}", context);
            for exercise in store.exercises() {
                assert_eq!(
                    exercise.name,
                    format!("{} ({}m)", exercise.base_name, exercise.duration),
                    "{}",
                    context
                );
            }
            assert!(
                store
                    .workouts()
                    .iter()
                    .all(|w| store.exercise(&w.exercise_id).is_some()),
                "{}",
                context
            );
            assert!(store.exercise(store.selected_exercise_id()).is_some(), "{}", context);
        }

        assert_eq!(persisted_exercises(&kv), store.exercises());
        if kv.raw(keys::WORKOUTS).is_some() {
            assert_eq!(persisted_workouts(&kv), store.workouts());
        }
    }
}

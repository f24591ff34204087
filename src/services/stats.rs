// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derivation engine: read-only views over a workout snapshot.
//!
//! All functions are pure. "Now" is passed in so results are reproducible.
//! Dates that fail to parse never make a derivation fail: they sort as the
//! oldest entries and are left out of time-based counts.

use crate::models::{TrendPoint, Workout, WorkoutStats, WorkoutSummary};
use crate::time_utils::chart_label;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Default number of points in the progression chart.
pub const TREND_WINDOW: usize = 20;

/// Workouts logged against `exercise_id`, in input order.
pub fn filter_by_exercise<'a>(workouts: &'a [Workout], exercise_id: &str) -> Vec<&'a Workout> {
    workouts
        .iter()
        .filter(|w| w.exercise_id == exercise_id)
        .collect()
}

/// Latest-session comparison. `None` for an empty history.
pub fn compute_stats<W>(workouts: &[W], now: DateTime<Utc>) -> Option<WorkoutStats>
where
    W: AsRef<Workout>,
{
    let mut sorted: Vec<&Workout> = workouts.iter().map(AsRef::<Workout>::as_ref).collect();
    // Stable; `None` compares below any date so unparsable entries end up last.
    sorted.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));

    let current = *sorted.first()?;
    let previous = sorted.get(1).copied();

    let (delta, delta_percent) = match previous {
        None => (0.0, Some(0.0)),
        Some(prev) => {
            let delta = current.calories - prev.calories;
            let percent = if prev.calories == 0.0 {
                None
            } else {
                Some(round1(delta / prev.calories * 100.0))
            };
            (delta, percent)
        }
    };

    let best = sorted
        .iter()
        .map(|w| w.calories)
        .fold(f64::NEG_INFINITY, f64::max);

    let week_ago = now - Duration::days(7);
    let weekly_count = sorted
        .iter()
        .filter(|w| w.timestamp().is_some_and(|t| t > week_ago))
        .count();

    Some(WorkoutStats {
        current: current.clone(),
        previous: previous.cloned(),
        delta,
        delta_percent,
        best,
        weekly_count,
        is_personal_best: current.calories >= best,
    })
}

/// Totals over a history (empty history gives all zeros).
pub fn summarize<W>(workouts: &[W]) -> WorkoutSummary
where
    W: AsRef<Workout>,
{
    if workouts.is_empty() {
        return WorkoutSummary::default();
    }

    let count = workouts.len() as f64;
    let (total_calories, total_intensity, best) = workouts
        .iter()
        .map(AsRef::<Workout>::as_ref)
        .fold((0.0, 0.0, f64::NEG_INFINITY), |(cal, int, best), w| {
            (cal + w.calories, int + w.intensity, best.max(w.calories))
        });

    let days: BTreeSet<NaiveDate> = workouts
        .iter()
        .filter_map(|w| AsRef::<Workout>::as_ref(w).timestamp())
        .map(|t| t.date_naive())
        .collect();

    WorkoutSummary {
        total_workouts: workouts.len(),
        best_calories: best,
        average_calories: total_calories / count,
        average_intensity: total_intensity / count,
        current_streak: streak_ending_at_latest(&days),
    }
}

/// Chart series: parsable dates only, ascending, last `window` entries.
pub fn build_trend_series<W>(workouts: &[W], window: usize) -> Vec<TrendPoint>
where
    W: AsRef<Workout>,
{
    let mut dated: Vec<(DateTime<Utc>, &Workout)> = workouts
        .iter()
        .map(AsRef::<Workout>::as_ref)
        .filter_map(|w| w.timestamp().map(|t| (t, w)))
        .collect();
    dated.sort_by(|a, b| a.0.cmp(&b.0));

    let skip = dated.len().saturating_sub(window);
    dated
        .into_iter()
        .skip(skip)
        .enumerate()
        .map(|(index, (timestamp, w))| TrendPoint {
            key: format!("{}_{}", w.id, index),
            workout_id: w.id.clone(),
            date: w.date.clone(),
            calories: w.calories,
            label: chart_label(timestamp),
        })
        .collect()
}

/// Consecutive days counted back from the newest day in `days`.
fn streak_ending_at_latest(days: &BTreeSet<NaiveDate>) -> u32 {
    let Some(mut expected) = days.last().copied() else {
        return 0;
    };

    let mut streak = 0;
    for day in days.iter().rev() {
        if *day != expected {
            break;
        }
        streak += 1;
        match expected.pred_opt() {
            Some(prev) => expected = prev,
            None => break,
        }
    }
    streak
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Order two workouts by date, unparsable dates first.
pub fn by_date_ascending(a: &Workout, b: &Workout) -> Ordering {
    a.timestamp().cmp(&b.timestamp())
}

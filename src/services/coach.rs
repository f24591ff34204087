// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coaching bridge.
//!
//! Packages a workout history for an external advisory service and always
//! hands back a usable [`CoachResponse`]. The network call sits behind the
//! [`Coach`] trait; [`FallbackCoach`] wraps any implementation and swaps in
//! the deterministic [`LocalCoach`] answer whenever the call or its reply is
//! unusable.

use crate::config::Config;
use crate::models::{CoachEntry, CoachResponse, VibeCheck, Workout};
use crate::services::gemini::GeminiCoach;
use crate::services::stats::by_date_ascending;
use async_trait::async_trait;
use std::sync::Arc;

/// Number of most recent sessions shared with the coaching service.
pub const HISTORY_LIMIT: usize = 5;

pub const FIRST_SESSION_MESSAGE: &str =
    "Welcome to VeloVibe! Let's crush that first ride. Aim for a solid baseline today.";
pub const FIRST_SESSION_TARGET: f64 = 300.0;
pub const FALLBACK_MESSAGE: &str = "Keep pushing! Beat your last score to maintain the gains.";

/// Why a coaching request produced no usable reply.
#[derive(Debug, thiserror::Error)]
pub enum CoachError {
    #[error("Coaching request failed: {0}")]
    Transport(String),

    #[error("Coaching service returned status {0}")]
    Status(u16),

    #[error("Invalid coaching reply: {0}")]
    InvalidResponse(String),

    #[error("No history to coach on")]
    EmptyHistory,
}

/// Source of coaching advice.
#[async_trait]
pub trait Coach: Send + Sync {
    /// Ask for advice on `history` (ascending by date, already trimmed).
    async fn request_coaching(&self, history: &[CoachEntry]) -> Result<CoachResponse, CoachError>;
}

#[async_trait]
impl<C: Coach + ?Sized> Coach for Arc<C> {
    async fn request_coaching(&self, history: &[CoachEntry]) -> Result<CoachResponse, CoachError> {
        (**self).request_coaching(history).await
    }
}

// ─── Local Coach ─────────────────────────────────────────────────

/// Deterministic advice computed without any network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCoach;

impl LocalCoach {
    /// Greeting for an empty history, otherwise "beat your last score by 2%".
    pub fn respond(&self, history: &[CoachEntry]) -> CoachResponse {
        match history.last() {
            None => CoachResponse {
                message: FIRST_SESSION_MESSAGE.to_string(),
                target_calories: FIRST_SESSION_TARGET,
                vibe_check: VibeCheck::Chill,
            },
            Some(latest) => CoachResponse {
                message: FALLBACK_MESSAGE.to_string(),
                target_calories: (latest.calories * 1.02).ceil(),
                vibe_check: VibeCheck::Chill,
            },
        }
    }
}

#[async_trait]
impl Coach for LocalCoach {
    async fn request_coaching(&self, history: &[CoachEntry]) -> Result<CoachResponse, CoachError> {
        Ok(self.respond(history))
    }
}

// ─── Fallback Decorator ──────────────────────────────────────────

/// Wraps a coach so that every failure degrades to the local answer.
#[derive(Debug, Clone)]
pub struct FallbackCoach<P> {
    primary: P,
    local: LocalCoach,
}

impl<P: Coach> FallbackCoach<P> {
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            local: LocalCoach,
        }
    }

    /// Advice for `history`. Never fails.
    ///
    /// An empty history is answered locally without calling `primary`.
    pub async fn coach(&self, history: &[CoachEntry]) -> CoachResponse {
        if history.is_empty() {
            return self.local.respond(history);
        }

        let reply = self
            .primary
            .request_coaching(history)
            .await
            .and_then(validate_reply);

        match reply {
            Ok(response) => {
                tracing::debug!(
                    target_calories = response.target_calories,
                    vibe = response.vibe_check.as_str(),
                    "Coaching reply accepted"
                );
                response
            }
            Err(e) => {
                tracing::warn!(error = %e, "Coaching request failed, using local advice");
                self.local.respond(history)
            }
        }
    }
}

/// Reject replies that parse but carry unusable values.
pub fn validate_reply(reply: CoachResponse) -> Result<CoachResponse, CoachError> {
    if reply.message.trim().is_empty() {
        return Err(CoachError::InvalidResponse("empty message".to_string()));
    }
    if !reply.target_calories.is_finite() || reply.target_calories < 0.0 {
        return Err(CoachError::InvalidResponse(format!(
            "target calories out of range: {}",
            reply.target_calories
        )));
    }
    Ok(reply)
}

/// Ascending by date, last [`HISTORY_LIMIT`] sessions, date and calories only.
pub fn prepare_history<W: AsRef<Workout>>(workouts: &[W]) -> Vec<CoachEntry> {
    let mut sorted: Vec<&Workout> = workouts.iter().map(AsRef::<Workout>::as_ref).collect();
    sorted.sort_by(|a, b| by_date_ascending(a, b));

    let skip = sorted.len().saturating_sub(HISTORY_LIMIT);
    sorted
        .into_iter()
        .skip(skip)
        .map(|w| CoachEntry {
            date: w.date.clone(),
            calories: w.calories,
        })
        .collect()
}

// ─── Bridge ──────────────────────────────────────────────────────

/// Entry point used by the HTTP layer. Disabled when no credential is set.
#[derive(Clone)]
pub struct CoachingBridge {
    inner: Option<FallbackCoach<Arc<dyn Coach>>>,
}

impl CoachingBridge {
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    pub fn new(coach: Arc<dyn Coach>) -> Self {
        Self {
            inner: Some(FallbackCoach::new(coach)),
        }
    }

    /// Gemini-backed bridge when an API key is configured, disabled otherwise.
    pub fn from_config(config: &Config) -> Result<Self, CoachError> {
        match GeminiCoach::from_config(config)? {
            Some(gemini) => {
                tracing::info!(model = %config.gemini_model, "Coaching enabled");
                Ok(Self::new(Arc::new(gemini)))
            }
            None => {
                tracing::info!("No Gemini API key configured, coaching disabled");
                Ok(Self::disabled())
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Advice for one exercise's workouts, `None` when disabled.
    pub async fn coach<W: AsRef<Workout>>(&self, workouts: &[W]) -> Option<CoachResponse> {
        let inner = self.inner.as_ref()?;
        let history = prepare_history(workouts);
        Some(inner.coach(&history).await)
    }
}

impl std::fmt::Debug for CoachingBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoachingBridge")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

// ─── Request Tracking ────────────────────────────────────────────

/// What a coaching result is computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachKey {
    pub exercise_id: String,
    pub workout_count: usize,
}

/// Handle for one in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachTicket {
    key: CoachKey,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoachPlan {
    /// Key unchanged since the last applied result
    Cached(CoachResponse),
    /// A request has to run
    Fetch(CoachTicket),
}

/// Decides when coaching re-runs and drops results that arrive too late.
///
/// A request is keyed by exercise and workout count, so edits that change
/// neither (a calorie correction, a rename) reuse the previous advice.
/// Switching exercise or logging a session starts a new generation; a
/// result carrying an older generation is discarded.
#[derive(Debug, Default)]
pub struct CoachTracker {
    current: Option<CoachKey>,
    generation: u64,
    latest: Option<CoachResponse>,
}

impl CoachTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, key: CoachKey) -> CoachPlan {
        if self.current.as_ref() == Some(&key) {
            if let Some(latest) = &self.latest {
                return CoachPlan::Cached(latest.clone());
            }
        } else {
            self.generation += 1;
            self.current = Some(key.clone());
            self.latest = None;
        }

        CoachPlan::Fetch(CoachTicket {
            key,
            generation: self.generation,
        })
    }

    /// Apply a finished request. Returns `false` if it was superseded.
    pub fn complete(&mut self, ticket: &CoachTicket, response: CoachResponse) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                exercise = %ticket.key.exercise_id,
                stale = ticket.generation,
                current = self.generation,
                "Discarding superseded coaching result"
            );
            return false;
        }
        self.latest = Some(response);
        true
    }

    pub fn latest(&self) -> Option<&CoachResponse> {
        self.latest.as_ref()
    }
}

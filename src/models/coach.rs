// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Coaching request/response contract.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Qualitative trend tag returned with every coaching response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum VibeCheck {
    /// Improving
    Fire,
    /// Stable
    Chill,
    /// Declining
    Warning,
}

impl VibeCheck {
    pub const ALL: [VibeCheck; 3] = [VibeCheck::Fire, VibeCheck::Chill, VibeCheck::Warning];

    pub fn as_str(&self) -> &'static str {
        match self {
            VibeCheck::Fire => "fire",
            VibeCheck::Chill => "chill",
            VibeCheck::Warning => "warning",
        }
    }

    /// Trend this tag stands for.
    pub fn trend(&self) -> &'static str {
        match self {
            VibeCheck::Fire => "improving",
            VibeCheck::Chill => "stable",
            VibeCheck::Warning => "declining",
        }
    }
}

/// Encouragement plus a calorie target for the next session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CoachResponse {
    pub message: String,
    pub target_calories: f64,
    pub vibe_check: VibeCheck,
}

/// History entry sent to the coaching service.
///
/// Only date and calories are shared; duration is withheld so the advice is
/// driven by the calorie trend alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachEntry {
    pub date: String,
    pub calories: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vibe_check_wire_names() {
        for vibe in VibeCheck::ALL {
            let json = serde_json::to_string(&vibe).unwrap();
            assert_eq!(json, format!("\"{}\"", vibe.as_str()));
        }
    }

    #[test]
    fn test_response_requires_every_field() {
        let missing = serde_json::from_str::<CoachResponse>(r#"{"message":"go","vibeCheck":"fire"}"#);
        assert!(missing.is_err());

        let bad_vibe = serde_json::from_str::<CoachResponse>(
            r#"{"message":"go","targetCalories":310,"vibeCheck":"meh"}"#,
        );
        assert!(bad_vibe.is_err());
    }
}

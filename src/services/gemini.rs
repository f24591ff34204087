// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gemini `generateContent` client used for coaching.
//!
//! One request per call, no retries. The model is asked for a JSON reply
//! constrained by a response schema; the first text part of the first
//! candidate is parsed into a [`CoachResponse`].

use crate::config::Config;
use crate::models::{CoachEntry, CoachResponse, VibeCheck};
use crate::services::coach::{Coach, CoachError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

// ─── API Types ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

// ─── Client ──────────────────────────────────────────────────────

/// Coaching backed by the Gemini API.
pub struct GeminiCoach {
    api_key: String,
    client: Client,
    model: String,
    base_url: String,
}

impl GeminiCoach {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CoachError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoachError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key: api_key.into(),
            client,
            model: model.into(),
            base_url: base_url.into(),
        })
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, CoachError> {
        let Some(api_key) = config.gemini_api_key.as_deref() else {
            return Ok(None);
        };
        Self::new(
            api_key,
            config.gemini_model.as_str(),
            config.gemini_base_url.as_str(),
            Duration::from_secs(config.coach_timeout_secs),
        )
        .map(Some)
    }

    fn build_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request(history: &[CoachEntry]) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![ContentPart {
                    text: Some(build_prompt(history)),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        }
    }

    fn extract_text(response: GeminiResponse) -> Result<String, CoachError> {
        if let Some(error) = response.error {
            return Err(CoachError::InvalidResponse(format!(
                "Gemini API error: {}",
                error.message
            )));
        }

        response
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| CoachError::InvalidResponse("No content in Gemini response".to_string()))
    }
}

#[async_trait]
impl Coach for GeminiCoach {
    async fn request_coaching(&self, history: &[CoachEntry]) -> Result<CoachResponse, CoachError> {
        if history.is_empty() {
            return Err(CoachError::EmptyHistory);
        }

        tracing::debug!(model = %self.model, entries = history.len(), "Sending coaching request");

        let response = self
            .client
            .post(self.build_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_request(history))
            .send()
            .await
            .map_err(|e| CoachError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CoachError::Transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::error!(status = %status, "Gemini API error");
            return Err(CoachError::Status(status.as_u16()));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Failed to parse Gemini response");
            CoachError::InvalidResponse(e.to_string())
        })?;

        parse_coach_reply(&Self::extract_text(parsed)?)
    }
}

impl std::fmt::Debug for GeminiCoach {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiCoach")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Parse the model's JSON text into a reply.
///
/// Tolerates a fenced code block around the JSON.
pub fn parse_coach_reply(text: &str) -> Result<CoachResponse, CoachError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(body.trim()).map_err(|e| CoachError::InvalidResponse(e.to_string()))
}

/// Instruction text sent with the history.
pub fn build_prompt(history: &[CoachEntry]) -> String {
    let history_json =
        serde_json::to_string_pretty(history).unwrap_or_else(|_| "[]".to_string());

    format!(
        "You are an elite, high-energy HIIT spin instructor. Your goal is to encourage \
         \"Progressive Overload\" (improving performance over time) based purely on CALORIE \
         OUTPUT (assuming constant duration).\n\n\
         Here is the athlete's recent history:\n{}\n\n\
         Analyze the trend. Are they improving? Stalling?\n\
         1. Comment specifically on their last performance compared to the trend.\n\
         2. Set a REALISTIC but CHALLENGING calorie target for the NEXT workout to ensure \
         progressive overload.\n\
         3. Keep it short (max 2 sentences) and hype-man style.",
        history_json
    )
}

fn response_schema() -> serde_json::Value {
    let vibes: Vec<&str> = VibeCheck::ALL.iter().map(VibeCheck::as_str).collect();
    let moods: Vec<String> = VibeCheck::ALL
        .iter()
        .map(|v| format!("{} = {}", v.as_str(), v.trend()))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "message": {
                "type": "STRING",
                "description": "Hype message and analysis."
            },
            "targetCalories": {
                "type": "NUMBER",
                "description": "The numeric calorie goal for the next session."
            },
            "vibeCheck": {
                "type": "STRING",
                "enum": vibes,
                "description": format!("The mood of the progress: {}.", moods.join(", "))
            }
        },
        "required": ["message", "targetCalories", "vibeCheck"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VibeCheck;

    #[test]
    fn test_parse_coach_reply() {
        let reply =
            parse_coach_reply(r#"{"message":"Hot streak!","targetCalories":372,"vibeCheck":"fire"}"#)
                .unwrap();
        assert_eq!(reply.target_calories, 372.0);
        assert_eq!(reply.vibe_check, VibeCheck::Fire);

        let fenced = "```json\n{\"message\":\"Hold it\",\"targetCalories\":300,\"vibeCheck\":\"chill\"}\n```";
        assert_eq!(parse_coach_reply(fenced).unwrap().vibe_check, VibeCheck::Chill);

        assert!(parse_coach_reply("not json").is_err());
    }

    #[test]
    fn test_request_shape() {
        let history = vec![CoachEntry {
            date: "2026-01-08T10:00:00.000Z".to_string(),
            calories: 350.0,
        }];
        let body = serde_json::to_value(GeminiCoach::build_request(&history)).unwrap();

        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"],
            json!(["message", "targetCalories", "vibeCheck"])
        );
        let vibe = &body["generationConfig"]["responseSchema"]["properties"]["vibeCheck"];
        assert_eq!(vibe["enum"], json!(["fire", "chill", "warning"]));
        assert!(vibe["description"]
            .as_str()
            .unwrap()
            .contains("fire = improving, chill = stable, warning = declining"));
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("\"calories\": 350.0"));
        assert!(!prompt.contains("durationMinutes"));
    }

    #[test]
    fn test_extract_text_reports_api_error() {
        let response: GeminiResponse =
            serde_json::from_str(r#"{"error":{"message":"quota exceeded"}}"#).unwrap();
        let err = GeminiCoach::extract_text(response).unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let coach = GeminiCoach::new("secret", "m", "http://x", Duration::from_secs(1)).unwrap();
        assert!(!format!("{:?}", coach).contains("secret"));
    }
}

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.
//! The coaching service is optional: with no API key configured the bridge
//! stays disabled and the rest of the app works unchanged.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Address the server binds to
    pub bind_address: String,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// Directory holding the persisted collections
    pub data_dir: PathBuf,

    // --- Coaching service ---
    /// Gemini API key; `None` disables coaching
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Upper bound for one coaching request
    pub coach_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let gemini_api_key = non_blank("GEMINI_API_KEY").or_else(|| non_blank("API_KEY"));

        Ok(Self {
            port: parse_or("PORT", 8080)?,
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            gemini_api_key,
            gemini_model: non_blank("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: non_blank("GEMINI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            coach_timeout_secs: parse_or("COACH_TIMEOUT_SECS", 15)?,
        })
    }

    /// Config for tests: coaching disabled, nothing read from the environment.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            bind_address: "127.0.0.1".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            data_dir: PathBuf::from("data"),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            coach_timeout_secs: 5,
        }
    }
}

fn non_blank(var: &'static str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match non_blank(var) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 8] = [
        "PORT",
        "BIND_ADDRESS",
        "DATA_DIR",
        "GEMINI_API_KEY",
        "API_KEY",
        "GEMINI_MODEL",
        "GEMINI_BASE_URL",
        "COACH_TIMEOUT_SECS",
    ];

    fn clear() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        clear();
        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 8080);
        assert_eq!(config.coach_timeout_secs, 15);
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    #[serial]
    fn test_api_key_fallback_and_blank() {
        clear();
        env::set_var("API_KEY", "legacy-key");
        let config = Config::from_env().unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("legacy-key"));

        env::set_var("GEMINI_API_KEY", "primary");
        let config = Config::from_env().unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("primary"));

        env::set_var("GEMINI_API_KEY", "   ");
        env::remove_var("API_KEY");
        let config = Config::from_env().unwrap();
        assert!(config.gemini_api_key.is_none());
        clear();
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_an_error() {
        clear();
        env::set_var("PORT", "eighty");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
        clear();
    }

    #[test]
    #[serial]
    fn test_base_url_trailing_slash() {
        clear();
        env::set_var("GEMINI_BASE_URL", "http://127.0.0.1:9999/v1beta/");
        let config = Config::from_env().unwrap();
        assert_eq!(config.gemini_base_url, "http://127.0.0.1:9999/v1beta");
        clear();
    }
}

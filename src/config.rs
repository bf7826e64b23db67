//! Client configuration parsed from environment variables.
//!
//! The binary loads `.env` first (via `dotenvy`), then calls
//! [`ClientConfig::from_env`]; command-line flags override the result.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_STORE_FILE: &str = "session.json";
pub const DEFAULT_STORE_DIR: &str = ".taskhandler";

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set but its value could not be parsed.
    #[error("invalid value for {var}: {value}")]
    Invalid { var: String, value: String },
}

/// Optional transport timeouts. `None` keeps the HTTP client's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timeouts {
    pub request_secs: Option<u64>,
    pub connect_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin without a trailing slash; endpoint paths start with `/api`.
    pub api_url: String,
    /// File backing the persisted key-value store (session token + user).
    pub store_path: PathBuf,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `TASKHANDLER_API_URL`: default `http://127.0.0.1:8000`
    /// - `TASKHANDLER_STORE_PATH`: default `$HOME/.taskhandler/session.json`
    /// - `TASKHANDLER_REQUEST_TIMEOUT_SECS`: unset keeps the transport default
    /// - `TASKHANDLER_CONNECT_TIMEOUT_SECS`: unset keeps the transport default
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout variable is set to a non-integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = normalize_api_url(
            &std::env::var("TASKHANDLER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        );
        let store_path = std::env::var("TASKHANDLER_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_store_path(std::env::var("HOME").ok().as_deref()));
        let timeouts = Timeouts {
            request_secs: env_parse_u64("TASKHANDLER_REQUEST_TIMEOUT_SECS")?,
            connect_secs: env_parse_u64("TASKHANDLER_CONNECT_TIMEOUT_SECS")?,
        };

        Ok(Self { api_url, store_path, timeouts })
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = normalize_api_url(api_url);
        self
    }

    #[must_use]
    pub fn with_store_path(mut self, store_path: PathBuf) -> Self {
        self.store_path = store_path;
        self
    }
}

#[must_use]
pub fn normalize_api_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn default_store_path(home: Option<&str>) -> PathBuf {
    match home {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(DEFAULT_STORE_DIR).join(DEFAULT_STORE_FILE),
        _ => PathBuf::from(DEFAULT_STORE_DIR).join(DEFAULT_STORE_FILE),
    }
}

fn env_parse_u64(key: &str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var: key.to_string(), value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

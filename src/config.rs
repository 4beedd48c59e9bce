//! Configuration module for the library core.

use serde::Deserialize;
use std::path::Path;

use crate::{BiblioError, Result};

/// Lending policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LendingConfig {
    /// Maximum number of simultaneous active reservations per user.
    #[serde(default = "default_max_active_reservations")]
    pub max_active_reservations: usize,
}

fn default_max_active_reservations() -> usize {
    3
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            max_active_reservations: default_max_active_reservations(),
        }
    }
}

/// Credential policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialConfig {
    /// Password lifetime in weeks before a renewal is required.
    #[serde(default = "default_password_expiry_weeks")]
    pub password_expiry_weeks: i64,
    /// Number of past password digests kept for the reuse check.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Maximum length of a security answer, in characters.
    #[serde(default = "default_answer_max_length")]
    pub answer_max_length: usize,
}

fn default_password_expiry_weeks() -> i64 {
    12
}

fn default_history_limit() -> usize {
    5
}

fn default_answer_max_length() -> usize {
    32
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            password_expiry_weeks: default_password_expiry_weeks(),
            history_limit: default_history_limit(),
            answer_max_length: default_answer_max_length(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "data/biblio.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Lending policy settings.
    #[serde(default)]
    pub lending: LendingConfig,
    /// Credential policy settings.
    #[serde(default)]
    pub credential: CredentialConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| BiblioError::Config(format!("failed to read config: {e}")))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| BiblioError::Config(format!("failed to parse config: {e}")))
    }
}

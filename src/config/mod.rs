//! # Engine Configuration
//!
//! Layered configuration for the collaborator-facing services and logging.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults ([`EngineConfig::default`])
//! 2. `config/task-workflow.toml`
//! 3. `config/task-workflow.{environment}.toml`
//! 4. `TASK_WORKFLOW__*` environment variables, `__` separating nested keys
//!    (e.g. `TASK_WORKFLOW__LOGGING__LEVEL=info`)
//!
//! Delay thresholds are not configured here: they come from the task store, with
//! the built-in table as the fallback.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use task_workflow::config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::from_env().load()?;
//! assert!(config.summary_chunk_size > 0);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::{detect_environment, ConfigLoader};

use crate::constants::system;

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Deployment environment (development, test, production, ...)
    pub environment: String,

    /// Business names per store fetch when building summaries
    pub summary_chunk_size: usize,

    /// Task ids per concurrently processed deletion chunk
    pub deletion_chunk_size: usize,

    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            summary_chunk_size: system::DEFAULT_SUMMARY_CHUNK_SIZE,
            deletion_chunk_size: system::DEFAULT_DELETION_CHUNK_SIZE,
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.summary_chunk_size == 0 {
            return Err(ConfigurationError::invalid_value(
                "summary_chunk_size",
                "0",
                "chunk size must be positive",
            ));
        }

        if self.deletion_chunk_size == 0 {
            return Err(ConfigurationError::invalid_value(
                "deletion_chunk_size",
                "0",
                "chunk size must be positive",
            ));
        }

        self.logging.validate()
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set
    pub level: String,
    pub format: LogFormat,
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            with_target: true,
        }
    }
}

impl LoggingConfig {
    /// Level used for an environment when nothing else is configured
    pub fn level_for_environment(environment: &str) -> &'static str {
        match environment {
            "production" => "info",
            _ => "debug",
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let level = self.level.to_ascii_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigurationError::invalid_value(
                "logging.level",
                self.level.clone(),
                format!("expected one of {VALID_LOG_LEVELS:?}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.summary_chunk_size, 200);
        assert_eq!(config.deletion_chunk_size, 50);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = EngineConfig {
            summary_chunk_size: 0,
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("summary_chunk_size"));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let mut config = EngineConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "WARN".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_level_for_environment() {
        assert_eq!(LoggingConfig::level_for_environment("production"), "info");
        assert_eq!(LoggingConfig::level_for_environment("test"), "debug");
        assert_eq!(LoggingConfig::level_for_environment("staging"), "debug");
    }
}

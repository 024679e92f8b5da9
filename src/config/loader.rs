//! Configuration Loader
//!
//! Environment-aware loading: built-in defaults, then TOML files, then environment
//! variables, merged with the `config` crate.

use config::{Config, Environment, File, FileFormat};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::{ConfigResult, ConfigurationError};
use super::{EngineConfig, LoggingConfig};

const ENV_PREFIX: &str = "TASK_WORKFLOW";
const ENV_SEPARATOR: &str = "__";
const BASE_FILE_STEM: &str = "task-workflow";
const DEFAULT_CONFIG_DIR: &str = "config";

/// Current environment from `TASK_WORKFLOW_ENV`, then `APP_ENV`, else `development`
pub fn detect_environment() -> String {
    std::env::var("TASK_WORKFLOW_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Builds an [`EngineConfig`] from layered sources
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    environment: String,
    config_dir: PathBuf,
    explicit_file: Option<PathBuf>,
    env_overrides: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    pub fn new(config_dir: impl Into<PathBuf>, environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            config_dir: config_dir.into(),
            explicit_file: None,
            env_overrides: None,
        }
    }

    /// Loader for `./config` and the detected environment
    pub fn from_env() -> Self {
        Self::new(DEFAULT_CONFIG_DIR, detect_environment())
    }

    /// Load this file instead of the directory files. The file must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// Use this map in place of the process environment (keys keep the prefix)
    pub fn with_env_overrides(mut self, overrides: HashMap<String, String>) -> Self {
        self.env_overrides = Some(overrides);
        self
    }

    fn file_source(path: &Path, required: bool) -> File<config::FileSourceFile, FileFormat> {
        File::from(path).format(FileFormat::Toml).required(required)
    }

    pub fn load(&self) -> ConfigResult<EngineConfig> {
        let mut defaults = EngineConfig::default();
        defaults.environment = self.environment.clone();
        defaults.logging.level =
            LoggingConfig::level_for_environment(&self.environment).to_string();

        let defaults = Config::try_from(&defaults)
            .map_err(|e| ConfigurationError::load_error(&self.environment, e))?;

        let mut builder = Config::builder().add_source(defaults);

        match &self.explicit_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigurationError::config_file_not_found(path));
                }
                debug!(path = %path.display(), "Loading explicit configuration file");
                builder = builder.add_source(Self::file_source(path, true));
            }
            None => {
                let base = self.config_dir.join(format!("{BASE_FILE_STEM}.toml"));
                let overlay = self
                    .config_dir
                    .join(format!("{BASE_FILE_STEM}.{}.toml", self.environment));
                debug!(
                    base = %base.display(),
                    overlay = %overlay.display(),
                    "Loading configuration files when present"
                );
                builder = builder
                    .add_source(Self::file_source(&base, false))
                    .add_source(Self::file_source(&overlay, false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(self.env_overrides.clone()),
        );

        let config: EngineConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| ConfigurationError::load_error(&self.environment, e))?;

        config.validate()?;

        debug!(
            environment = %config.environment,
            summary_chunk_size = config.summary_chunk_size,
            deletion_chunk_size = config.deletion_chunk_size,
            log_level = %config.logging.level,
            log_format = %config.logging.format,
            "Configuration loaded"
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn test_defaults_without_files() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::new(dir.path(), "test")
            .with_env_overrides(no_env())
            .load()
            .unwrap();

        assert_eq!(config.environment, "test");
        assert_eq!(config.summary_chunk_size, 200);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_environment_overlay_wins_over_base() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("task-workflow.toml"),
            "summary_chunk_size = 100\ndeletion_chunk_size = 10\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("task-workflow.production.toml"),
            "deletion_chunk_size = 25\n[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = ConfigLoader::new(dir.path(), "production")
            .with_env_overrides(no_env())
            .load()
            .unwrap();

        assert_eq!(config.summary_chunk_size, 100);
        assert_eq!(config.deletion_chunk_size, 25);
        assert_eq!(config.logging.format, super::super::LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_environment_variables_win_over_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("task-workflow.toml"), "summary_chunk_size = 100\n").unwrap();

        let overrides = HashMap::from([
            ("TASK_WORKFLOW__SUMMARY_CHUNK_SIZE".to_string(), "75".to_string()),
            ("TASK_WORKFLOW__LOGGING__LEVEL".to_string(), "warn".to_string()),
        ]);

        let config = ConfigLoader::new(dir.path(), "development")
            .with_env_overrides(overrides)
            .load()
            .unwrap();

        assert_eq!(config.summary_chunk_size, 75);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("task-workflow.toml"), "deletion_chunk_size = 0\n").unwrap();

        let err = ConfigLoader::new(dir.path(), "test")
            .with_env_overrides(no_env())
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { .. }));
    }

    #[test]
    fn test_unknown_log_format_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("task-workflow.toml"), "[logging]\nformat = \"xml\"\n").unwrap();

        let err = ConfigLoader::new(dir.path(), "test")
            .with_env_overrides(no_env())
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::LoadError { .. }));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let err = ConfigLoader::new(dir.path(), "test")
            .with_file(dir.path().join("absent.toml"))
            .with_env_overrides(no_env())
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::ConfigFileNotFound { .. }));
    }
}

//! Configuration loading and typed config structures for Medallium.
//!
//! The canonical configuration lives in `medallium.yaml`. This module
//! defines strongly-typed structs that mirror the YAML structure and a
//! loader that reads it. Every field has a default, so an empty file (or
//! no file at all) yields a working configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use medallium_progress::ProgressConfig;

/// Environment variable overriding `logging.level`.
pub const LOG_LEVEL_ENV: &str = "MEDALLIUM_LOG_LEVEL";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level Medallium configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MedalliumConfig {
    /// Streak bucketing and milestone settings.
    #[serde(default)]
    pub progress: ProgressConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Authored data overrides.
    #[serde(default)]
    pub data: DataConfig,
}

impl MedalliumConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `MEDALLIUM_LOG_LEVEL` overrides `logging.level`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse_yaml(&contents)?;
        config.logging.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_yaml(yaml)?;
        config.logging.apply_env_overrides();
        Ok(config)
    }

    fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml reads an empty document as a unit value, not a map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    /// Apply `MEDALLIUM_LOG_LEVEL` if it is set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        if let Some(val) = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
        {
            self.level = val;
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Optional replacements for the built-in authored data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DataConfig {
    /// YAML file of circle definitions.
    #[serde(default)]
    pub circles_path: Option<PathBuf>,

    /// YAML file of achievements.
    #[serde(default)]
    pub achievements_path: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_owned()
}

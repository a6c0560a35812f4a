//! Authored circle and achievement data.
//!
//! The built-in definitions are embedded at compile time and parsed once
//! at startup. A config may point at replacement files instead.

use std::path::Path;

use tracing::info;

use medallium_progress::{Achievement, AchievementRegistry, CircleBook, ProgressError};
use medallium_types::CircleDefinition;

use crate::config::DataConfig;

/// Built-in circle definitions.
pub const BUILTIN_CIRCLES: &str = include_str!("../data/circles.yaml");

/// Built-in achievement registry.
pub const BUILTIN_ACHIEVEMENTS: &str = include_str!("../data/achievements.yaml");

/// Errors that can occur when loading authored data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Failed to read a data file from disk.
    #[error("failed to read data file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse data YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The data parsed but is not a valid definition set.
    #[error(transparent)]
    Invalid(#[from] ProgressError),
}

impl From<serde_yml::Error> for DataError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Parse and validate a YAML list of circle definitions.
pub fn parse_circles(yaml: &str) -> Result<CircleBook, DataError> {
    let definitions: Vec<CircleDefinition> = serde_yml::from_str(yaml)?;
    Ok(CircleBook::new(definitions)?)
}

/// Parse and validate a YAML list of achievements.
pub fn parse_achievements(yaml: &str) -> Result<AchievementRegistry, DataError> {
    let achievements: Vec<Achievement> = serde_yml::from_str(yaml)?;
    Ok(AchievementRegistry::new(achievements)?)
}

fn read_or_builtin(path: Option<&Path>, builtin: &'static str) -> Result<String, DataError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading authored data override");
            Ok(std::fs::read_to_string(path)?)
        }
        None => Ok(builtin.to_owned()),
    }
}

/// The circle book named by `config`, or the built-in one.
pub fn load_circles(config: &DataConfig) -> Result<CircleBook, DataError> {
    parse_circles(&read_or_builtin(config.circles_path.as_deref(), BUILTIN_CIRCLES)?)
}

/// The achievement registry named by `config`, or the built-in one.
pub fn load_achievements(config: &DataConfig) -> Result<AchievementRegistry, DataError> {
    parse_achievements(&read_or_builtin(
        config.achievements_path.as_deref(),
        BUILTIN_ACHIEVEMENTS,
    )?)
}

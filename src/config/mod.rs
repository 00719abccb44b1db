//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Tunables of the resolution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Recursion cap for head-to-head reapplication among a shrinking tied subset
    #[serde(default = "default_max_tiebreak_depth")]
    pub max_tiebreak_depth: u32,

    #[serde(default = "default_points_for_win")]
    pub points_for_win: u32,

    #[serde(default = "default_points_for_draw")]
    pub points_for_draw: u32,
}

fn default_max_tiebreak_depth() -> u32 {
    3
}

fn default_points_for_win() -> u32 {
    3
}

fn default_points_for_draw() -> u32 {
    1
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_tiebreak_depth: default_max_tiebreak_depth(),
            points_for_win: default_points_for_win(),
            points_for_draw: default_points_for_draw(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding reference data and saved predictions
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            engine: EngineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.max_tiebreak_depth == 0 {
            return Err(ConfigError::ValidationError(
                "max_tiebreak_depth must be greater than 0".to_string(),
            ));
        }

        if self.engine.points_for_draw >= self.engine.points_for_win {
            return Err(ConfigError::ValidationError(
                "a draw must be worth fewer points than a win".to_string(),
            ));
        }

        Ok(())
    }
}

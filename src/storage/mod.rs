//! Filesystem storage.
//!
//! Handles reading and writing under the data directory:
//! - Static reference data (teams, groups, playoffs, bracket, combinations)
//! - Saved prediction snapshots

mod json;

pub use json::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::ReferenceError;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid prediction name: {0}")]
    InvalidName(String),

    #[error("Invalid reference data: {0}")]
    Reference(#[from] ReferenceError),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn teams_path(&self) -> PathBuf {
        self.data_dir.join("teams.json")
    }

    pub fn groups_path(&self) -> PathBuf {
        self.data_dir.join("groups.json")
    }

    pub fn playoffs_path(&self) -> PathBuf {
        self.data_dir.join("playoffs.json")
    }

    pub fn bracket_path(&self) -> PathBuf {
        self.data_dir.join("bracket.json")
    }

    pub fn combinations_path(&self) -> PathBuf {
        self.data_dir.join("third_place_combinations.json")
    }

    pub fn predictions_dir(&self) -> PathBuf {
        self.data_dir.join("predictions")
    }

    pub fn prediction_path(&self, name: &str) -> PathBuf {
        self.predictions_dir().join(format!("{}.json", name))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.teams_path(), PathBuf::from("/data/teams.json"));
        assert_eq!(config.bracket_path(), PathBuf::from("/data/bracket.json"));
        assert_eq!(
            config.combinations_path(),
            PathBuf::from("/data/third_place_combinations.json")
        );
        assert_eq!(
            config.prediction_path("mine"),
            PathBuf::from("/data/predictions/mine.json")
        );
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }
}

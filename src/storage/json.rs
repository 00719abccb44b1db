//! JSON files: reference data in, prediction snapshots in and out.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{StorageConfig, StorageError};
use crate::models::{
    GroupDefinition, KnockoutMatch, Playoff, PredictionState, Team, ThirdPlaceCombination,
    TournamentReference,
};

/// A single JSON document on disk.
pub struct JsonFile<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> JsonFile<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn read(&self) -> Result<T, StorageError> {
        if !self.exists() {
            return Err(StorageError::PathNotFound(self.path.clone()));
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let value = serde_json::from_reader(reader)?;
        debug!("Read {:?}", self.path);
        Ok(value)
    }

    /// Replace the file contents. Goes through a sibling temp file and a
    /// rename, so readers never see a half-written document.
    pub fn write(&self, value: &T) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;

        debug!("Wrote {:?}", self.path);
        Ok(())
    }
}

/// Load and validate the static tournament data. `playoffs.json` is optional.
pub fn load_reference(config: &StorageConfig) -> Result<TournamentReference, StorageError> {
    let teams: Vec<Team> = JsonFile::new(config.teams_path()).read()?;
    let groups: Vec<GroupDefinition> = JsonFile::new(config.groups_path()).read()?;
    let playoffs_file = JsonFile::<Vec<Playoff>>::new(config.playoffs_path());
    let playoffs = if playoffs_file.exists() {
        playoffs_file.read()?
    } else {
        Vec::new()
    };
    let bracket: Vec<KnockoutMatch> = JsonFile::new(config.bracket_path()).read()?;
    let combinations: Vec<ThirdPlaceCombination> =
        JsonFile::new(config.combinations_path()).read()?;

    info!(
        "Loaded {} teams, {} groups, {} playoffs, {} knockout matches, {} third-place combinations",
        teams.len(),
        groups.len(),
        playoffs.len(),
        bracket.len(),
        combinations.len()
    );
    Ok(TournamentReference::new(
        teams,
        groups,
        playoffs,
        bracket,
        combinations,
    )?)
}

/// A saved prediction with its save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub prediction: PredictionState,
    pub saved_at: DateTime<Utc>,
}

/// Named prediction snapshots under `predictions/`.
#[derive(Debug, Clone)]
pub struct PredictionStore {
    config: StorageConfig,
}

impl PredictionStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    fn file(&self, name: &str) -> Result<JsonFile<PredictionRecord>, StorageError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(JsonFile::new(self.config.prediction_path(name)))
    }

    pub fn save(&self, name: &str, prediction: &PredictionState) -> Result<PredictionRecord, StorageError> {
        let record = PredictionRecord {
            prediction: prediction.clone(),
            saved_at: Utc::now(),
        };
        self.file(name)?.write(&record)?;
        info!("Saved prediction '{}'", name);
        Ok(record)
    }

    pub fn load(&self, name: &str) -> Result<PredictionRecord, StorageError> {
        self.file(name)?.read()
    }

    /// The saved prediction, or an empty one if nothing was saved under `name`.
    pub fn load_or_default(&self, name: &str) -> Result<PredictionState, StorageError> {
        match self.load(name) {
            Ok(record) => Ok(record.prediction),
            Err(StorageError::PathNotFound(_)) => Ok(PredictionState::new()),
            Err(e) => Err(e),
        }
    }

    /// Names of all saved predictions, sorted.
    pub fn list(&self) -> Result<Vec<String>, StorageError> {
        let dir = self.config.predictions_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

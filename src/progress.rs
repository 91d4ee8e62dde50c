use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::session::LevelId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write {key}: {source}")]
    Write {
        key: String,
        source: std::io::Error,
    },
    #[error("failed to serialize value for {key}: {source}")]
    Serialize {
        key: String,
        source: serde_json::Error,
    },
    #[error("storage backend rejected {key}: {message}")]
    Backend { key: String, message: String },
}

/// String key-value storage such as browser local storage.
pub trait KeyValueStore {
    fn get_raw(&self, key: &str) -> Option<String>;
    fn set_raw(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// In-memory store used in tests and as a fallback when no persistent backend exists.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Stores each key as `<key>.json` inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root.join(format!("{}.json", file_name))
    }
}

impl KeyValueStore for FileStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set_raw(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)
            .and_then(|_| fs::write(self.path_for(key), value))
            .map_err(|source| StoreError::Write {
                key: key.to_string(),
                source,
            })
    }
}

/// Typed JSON access on top of a [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct ProgressStore<S> {
    backend: S,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Reads `key`, returning `default` when it is absent or unreadable.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(raw) = self.backend.get_raw(key) else {
            return default;
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(error) => {
                log::warn!("discarding malformed progress under {key}: {error}");
                default
            }
        }
    }

    /// Overwrites `key` with the serialized value.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.backend.set_raw(key, raw)
    }
}

/// Persisted results of one level.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LevelProgress {
    pub attempts: u32,
    pub best_correct: u32,
    pub best_points: f64,
    pub mastered: bool,
}

/// The JSON blob each game keeps under its storage key.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameProgress {
    pub levels: BTreeMap<LevelId, LevelProgress>,
    pub total_points: f64,
    pub games_completed: u32,
}

impl GameProgress {
    pub fn level(&self, level: LevelId) -> LevelProgress {
        self.levels.get(&level).copied().unwrap_or_default()
    }

    pub fn is_mastered(&self, level: LevelId) -> bool {
        self.level(level).mastered
    }

    /// A level is open when it is the first one or its predecessor is mastered.
    pub fn is_unlocked(&self, level: LevelId) -> bool {
        match level.previous() {
            Some(previous) => self.is_mastered(previous),
            None => true,
        }
    }

    pub fn all_mastered(&self) -> bool {
        LevelId::ALL.iter().all(|level| self.is_mastered(*level))
    }

    /// Folds a finished attempt into the stored bests. Mastery is never revoked.
    pub fn record(&mut self, level: LevelId, correct: u32, points: f64, mastered: bool) {
        let entry = self.levels.entry(level).or_default();
        entry.attempts += 1;
        entry.best_correct = entry.best_correct.max(correct);
        entry.best_points = entry.best_points.max(points);
        entry.mastered |= mastered;
        self.total_points += points;
    }
}

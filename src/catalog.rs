use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::reaction::{Difficulty, Reaction, ReactionError};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CatalogEntry {
    pub reaction: Reaction,
    pub categories: Vec<String>,
}

impl CatalogEntry {
    pub fn category_path(&self) -> String {
        self.categories.join(" / ")
    }
}

/// Static reaction table, grouped by category path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("category path must contain at least one segment")]
    EmptyCategoryPath,
    #[error("failed to read dataset file at {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse dataset file at {path}: {source}")]
    ParseError {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid reaction in {path}: {source}")]
    InvalidReaction {
        path: String,
        source: ReactionError,
    },
}

impl PartialEq for CatalogLoadError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::EmptyCategoryPath, Self::EmptyCategoryPath) => true,
            (Self::ReadError { path: left, .. }, Self::ReadError { path: right, .. }) => {
                left == right
            }
            (Self::ParseError { path: left, .. }, Self::ParseError { path: right, .. }) => {
                left == right
            }
            (
                Self::InvalidReaction {
                    path: left,
                    source: left_source,
                },
                Self::InvalidReaction {
                    path: right,
                    source: right_source,
                },
            ) => left == right && left_source == right_source,
            _ => false,
        }
    }
}

impl Eq for CatalogLoadError {}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("category path must contain at least one segment")]
    EmptyPath,
    #[error("no reactions found for category path: {path}")]
    CategoryNotFound { path: String },
    #[error("no reactions tagged {difficulty:?}")]
    NoReactionsForDifficulty { difficulty: Difficulty },
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Loads every `*.json` reaction list below `root`, using the directory
    /// names as the category path.
    pub fn from_directory(root: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let mut entries = Vec::new();
        collect_entries(root.as_ref(), Vec::new(), &mut entries)?;

        log::info!(
            "loaded {} reactions from {}",
            entries.len(),
            root.as_ref().display()
        );

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn all_reactions(&self) -> Vec<Reaction> {
        self.entries
            .iter()
            .map(|entry| entry.reaction.clone())
            .collect()
    }

    pub fn available_paths(&self) -> BTreeSet<Vec<String>> {
        let mut paths = BTreeSet::new();

        for entry in &self.entries {
            for depth in 1..=entry.categories.len() {
                paths.insert(entry.categories[..depth].to_vec());
            }
        }

        paths
    }

    pub fn reactions_for(&self, path: &[String]) -> Result<Vec<Reaction>, CatalogError> {
        if path.is_empty() {
            return Err(CatalogError::EmptyPath);
        }

        let matches: Vec<Reaction> = self
            .entries
            .iter()
            .filter(|entry| entry.categories.starts_with(path))
            .map(|entry| entry.reaction.clone())
            .collect();

        if matches.is_empty() {
            return Err(CatalogError::CategoryNotFound {
                path: path.join(" / "),
            });
        }

        Ok(matches)
    }

    pub fn by_difficulty(&self, difficulty: Difficulty) -> Vec<&Reaction> {
        self.entries
            .iter()
            .map(|entry| &entry.reaction)
            .filter(|reaction| reaction.difficulty == difficulty)
            .collect()
    }

    /// Picks a random reaction of the given difficulty for a new round.
    pub fn random_reaction<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        difficulty: Difficulty,
    ) -> Result<&Reaction, CatalogError> {
        self.by_difficulty(difficulty)
            .choose(rng)
            .copied()
            .ok_or(CatalogError::NoReactionsForDifficulty { difficulty })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
struct ReactionList {
    reactions: Vec<Reaction>,
}

fn collect_entries(
    root: &Path,
    categories: Vec<String>,
    entries: &mut Vec<CatalogEntry>,
) -> Result<(), CatalogLoadError> {
    let walker = fs::read_dir(root).map_err(|source| CatalogLoadError::ReadError {
        path: root.display().to_string(),
        source,
    })?;

    for entry in walker {
        let entry = entry.map_err(|source| CatalogLoadError::ReadError {
            path: root.display().to_string(),
            source,
        })?;

        let path = entry.path();

        if path.is_dir() {
            let mut next_categories = categories.clone();
            if let Some(name) = path.file_name().and_then(|value| value.to_str()) {
                next_categories.push(name.to_string());
            }
            collect_entries(&path, next_categories, entries)?;
        } else if path.extension().and_then(|extension| extension.to_str()) == Some("json") {
            append_from_file(&path, &categories, entries)?;
        }
    }

    Ok(())
}

fn append_from_file(
    path: &Path,
    categories: &[String],
    entries: &mut Vec<CatalogEntry>,
) -> Result<(), CatalogLoadError> {
    if categories.is_empty() {
        return Err(CatalogLoadError::EmptyCategoryPath);
    }

    let data = fs::read(path).map_err(|source| CatalogLoadError::ReadError {
        path: path.display().to_string(),
        source,
    })?;

    let parsed: ReactionList =
        serde_json::from_slice(&data).map_err(|source| CatalogLoadError::ParseError {
            path: path.display().to_string(),
            source,
        })?;

    for reaction in parsed.reactions {
        reaction
            .validate()
            .map_err(|source| CatalogLoadError::InvalidReaction {
                path: path.display().to_string(),
                source,
            })?;

        entries.push(CatalogEntry {
            reaction,
            categories: categories.to_vec(),
        });
    }

    Ok(())
}

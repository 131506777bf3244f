//! Favorite shows store
//!
//! This module provides the repository trait for the user's favorite shows
//! and a JSON-file-backed implementation living in the platform data
//! directory.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during favorites operations
#[derive(Debug, Error)]
pub enum FavoritesError {
    /// Failed to determine data directory location
    #[error("Failed to determine data directory location")]
    DataDirectoryNotFound,

    /// Failed to read the favorites file
    #[error("Failed to read favorites file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the favorites file
    #[error("Failed to write favorites file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The favorites file contains invalid data
    #[error("Failed to parse favorites file {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to serialize favorites for storage
    #[error("Failed to serialize favorites: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// A show the user has marked as favorite.
///
/// The show name is persisted along with the identifier so favorites can
/// be listed without a network call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteShow {
    /// The provider's identifier for the show
    pub id: u64,
    /// The name of the show at the time it was marked
    pub name: String,
}

/// Trait for repositories holding the user's favorite shows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteShows: Send + Sync {
    /// Returns the identifiers of all favorite shows.
    ///
    /// This is the only call the home screen makes; it treats the result
    /// as a read-only membership set.
    async fn all_favorite_show_ids(&self) -> Result<Vec<u64>, FavoritesError>;

    /// Returns all favorite shows with their names, in insertion order.
    async fn all(&self) -> Result<Vec<FavoriteShow>, FavoritesError>;

    /// Marks a show as favorite. Marking an existing favorite is a no-op.
    async fn add(&self, show: FavoriteShow) -> Result<(), FavoritesError>;

    /// Removes a show from the favorites. Unknown identifiers are ignored.
    async fn remove(&self, show_id: u64) -> Result<(), FavoritesError>;
}

/// A favorites repository backed by a single JSON file.
///
/// The file holds an array of `FavoriteShow` records. It is read on every
/// call and rewritten on every mutation; favorites lists are small enough
/// that this is not worth optimizing.
pub struct FavoriteShowsFile {
    path: PathBuf,
}

impl FavoriteShowsFile {
    /// Opens the favorites store at the platform default location.
    pub fn open_default() -> Result<Self, FavoritesError> {
        let proj_dirs = directories::ProjectDirs::from("io", "tvtonight", "tv-tonight")
            .ok_or(FavoritesError::DataDirectoryNotFound)?;

        Ok(Self::new(proj_dirs.data_dir().join("favorites.json")))
    }

    /// Creates a store reading and writing the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads all records from the file; a missing file is an empty list.
    fn read_records(&self) -> Result<Vec<FavoriteShow>, FavoritesError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| FavoritesError::ReadFailed {
            path: self.path.clone(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| FavoritesError::ParseFailed {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Writes all records to the file, creating parent directories first.
    fn write_records(&self, records: &[FavoriteShow]) -> Result<(), FavoritesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| FavoritesError::WriteFailed {
                path: self.path.clone(),
                source: e,
            })?;
        }

        let content = serde_json::to_string_pretty(records)?;

        fs::write(&self.path, content).map_err(|e| FavoritesError::WriteFailed {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FavoriteShows for FavoriteShowsFile {
    async fn all_favorite_show_ids(&self) -> Result<Vec<u64>, FavoritesError> {
        Ok(self.read_records()?.into_iter().map(|f| f.id).collect())
    }

    async fn all(&self) -> Result<Vec<FavoriteShow>, FavoritesError> {
        self.read_records()
    }

    async fn add(&self, show: FavoriteShow) -> Result<(), FavoritesError> {
        let mut records = self.read_records()?;

        if records.iter().any(|f| f.id == show.id) {
            return Ok(());
        }

        debug!(id = show.id, name = %show.name, "adding favorite");
        records.push(show);
        self.write_records(&records)
    }

    async fn remove(&self, show_id: u64) -> Result<(), FavoritesError> {
        let mut records = self.read_records()?;
        let before = records.len();
        records.retain(|f| f.id != show_id);

        if records.len() == before {
            return Ok(());
        }

        debug!(id = show_id, "removing favorite");
        self.write_records(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn favorite(id: u64, name: &str) -> FavoriteShow {
        FavoriteShow {
            id,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_store_has_no_favorites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FavoriteShowsFile::new(dir.path().join("favorites.json"));

        assert_eq!(store.all_favorite_show_ids().await.unwrap(), Vec::<u64>::new());
        assert_eq!(store.all().await.unwrap(), Vec::<FavoriteShow>::new());
    }

    #[tokio::test]
    async fn test_add_and_list_preserves_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = FavoriteShowsFile::new(dir.path().join("favorites.json"));

        store.add(favorite(2, "Night Quiz")).await.unwrap();
        store.add(favorite(1, "The Late Works")).await.unwrap();

        assert_eq!(store.all_favorite_show_ids().await.unwrap(), vec![2, 1]);
        assert_eq!(
            store.all().await.unwrap(),
            vec![favorite(2, "Night Quiz"), favorite(1, "The Late Works")]
        );
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FavoriteShowsFile::new(dir.path().join("favorites.json"));

        store.add(favorite(1, "The Late Works")).await.unwrap();
        store.add(favorite(1, "The Late Works")).await.unwrap();

        assert_eq!(store.all_favorite_show_ids().await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_remove_unknown_id_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = FavoriteShowsFile::new(dir.path().join("favorites.json"));

        store.add(favorite(1, "The Late Works")).await.unwrap();
        store.remove(99).await.unwrap();

        assert_eq!(store.all_favorite_show_ids().await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_favorites_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");

        {
            let store = FavoriteShowsFile::new(&path);
            store.add(favorite(1, "The Late Works")).await.unwrap();
            store.add(favorite(2, "Night Quiz")).await.unwrap();
            store.remove(1).await.unwrap();
        }

        let store = FavoriteShowsFile::new(&path);
        assert_eq!(store.all().await.unwrap(), vec![favorite(2, "Night Quiz")]);
    }
}

//! Cache storage module
//!
//! This module provides persistent caching functionality using the system's
//! standard cache directory. Data is serialized to JSON format for storage,
//! and entries can be given a time-to-live after which they are ignored.

use serde::{Deserialize, Serialize};
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to determine cache directory location
    #[error("Failed to determine cache directory location")]
    CacheDirectoryNotFound,

    /// Failed to create or access cache directory
    #[error("Failed to create cache directory at {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read cached data
    #[error("Failed to read cache file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write cached data
    #[error("Failed to write cache file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to deserialize cached data
    #[error("Failed to deserialize cache file {path}: {source}")]
    DeserializationFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to serialize data for caching
    #[error("Failed to serialize data: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// A generic cache storage for serializable data
///
/// This structure provides persistent caching of data that implements
/// `Serialize` and `Deserialize`. Data is stored as JSON files in the
/// system's standard cache directory. When a TTL is configured, entries
/// older than it are treated as missing.
pub struct CacheStorage<T> {
    /// The directory where cached data is stored
    cache_dir: PathBuf,
    /// How long entries stay valid (None means forever)
    ttl: Option<Duration>,
    /// Phantom data for the generic type
    _phantom: PhantomData<T>,
}

impl<T> CacheStorage<T>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    /// Opens or creates a cache storage with the given name
    ///
    /// The cache will be stored in the system's standard cache directory
    /// under a subdirectory named after the application and the provided
    /// name. The name will be sanitized (lowercased, non-alphanumeric
    /// characters replaced with underscores).
    ///
    /// # Arguments
    ///
    /// * `name` - The name for this cache storage
    /// * `ttl` - Optional lifetime for entries; older entries are ignored
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let cache: CacheStorage<Vec<Episode>> =
    ///     CacheStorage::open("schedule", Some(Duration::from_secs(60 * 60)))?;
    /// ```
    pub fn open(name: &str, ttl: Option<Duration>) -> Result<Self, CacheError> {
        // Get the cache directory for this application
        let proj_dirs = directories::ProjectDirs::from("io", "tvtonight", "tv-tonight")
            .ok_or(CacheError::CacheDirectoryNotFound)?;

        Self::open_in(proj_dirs.cache_dir(), name, ttl)
    }

    /// Opens or creates a cache storage rooted at an explicit directory
    ///
    /// Used by `open` with the platform cache directory; also handy for
    /// tests that must not touch the real one.
    pub fn open_in(root: &Path, name: &str, ttl: Option<Duration>) -> Result<Self, CacheError> {
        // Sanitize the cache name
        let sanitized_name = sanitize_name(name);

        // Build the full cache directory path
        let cache_dir = root.join(&sanitized_name);

        // Create the directory if it doesn't exist
        fs::create_dir_all(&cache_dir).map_err(|e| CacheError::DirectoryCreationFailed {
            path: cache_dir.clone(),
            source: e,
        })?;

        Ok(Self {
            cache_dir,
            ttl,
            _phantom: PhantomData,
        })
    }

    /// Loads cached data for the given identifier
    ///
    /// # Arguments
    ///
    /// * `identifier` - A unique identifier for the cached data
    ///
    /// # Returns
    ///
    /// An Option containing the cached data if it exists, is valid and has
    /// not outlived the configured TTL, or None otherwise. Returns an error
    /// if the data exists but cannot be read or deserialized.
    pub fn load(&self, identifier: &str) -> Result<Option<T>, CacheError> {
        let sanitized_id = sanitize_name(identifier);
        let file_path = self.cache_dir.join(format!("{}.json", sanitized_id));

        // If file doesn't exist, return None
        if !file_path.exists() {
            return Ok(None);
        }

        // Expired entries count as missing
        if self.is_expired(&file_path) {
            debug!(path = %file_path.display(), "cache entry expired");
            let _ = fs::remove_file(&file_path);
            return Ok(None);
        }

        // Read the file
        let content = fs::read_to_string(&file_path).map_err(|e| CacheError::ReadFailed {
            path: file_path.clone(),
            source: e,
        })?;

        // Deserialize the JSON
        let data =
            serde_json::from_str(&content).map_err(|e| CacheError::DeserializationFailed {
                path: file_path,
                source: e,
            })?;

        Ok(Some(data))
    }

    /// Stores data in the cache with the given identifier
    ///
    /// # Arguments
    ///
    /// * `identifier` - A unique identifier for the cached data
    /// * `data` - The data to cache
    pub fn store(&self, identifier: &str, data: &T) -> Result<(), CacheError> {
        let sanitized_id = sanitize_name(identifier);
        let file_path = self.cache_dir.join(format!("{}.json", sanitized_id));

        // Serialize to JSON
        let content = serde_json::to_string_pretty(data)?;

        // Write to file
        fs::write(&file_path, content).map_err(|e| CacheError::WriteFailed {
            path: file_path,
            source: e,
        })?;

        Ok(())
    }

    /// Checks whether a cache file has outlived the configured TTL
    ///
    /// Files whose modification time cannot be read are considered expired.
    fn is_expired(&self, file_path: &Path) -> bool {
        let Some(ttl) = self.ttl else {
            return false;
        };

        fs::metadata(file_path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| modified.elapsed().ok())
            .map(|age| age > ttl)
            .unwrap_or(true)
    }
}

/// Sanitizes a name for use in file paths
///
/// Converts to lowercase and replaces all characters that are not
/// a-z, 0-9, or hyphen with underscores.
fn sanitize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Simple"), "simple");
        assert_eq!(sanitize_name("With Spaces"), "with_spaces");
        assert_eq!(sanitize_name("With-Hyphens"), "with-hyphens");
        assert_eq!(sanitize_name("Special!@#$%"), "special_____");
        assert_eq!(sanitize_name("US 2026-08-07"), "us_2026-08-07");
    }

    #[test]
    fn test_store_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache: CacheStorage<Vec<String>> =
            CacheStorage::open_in(dir.path(), "test", None).unwrap();

        let data = vec!["one".to_string(), "two".to_string()];
        cache.store("key", &data).unwrap();

        assert_eq!(cache.load("key").unwrap(), Some(data));
    }

    #[test]
    fn test_load_missing_entry_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache: CacheStorage<Vec<String>> =
            CacheStorage::open_in(dir.path(), "test", None).unwrap();

        assert_eq!(cache.load("absent").unwrap(), None);
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let cache: CacheStorage<Vec<String>> =
            CacheStorage::open_in(dir.path(), "test", Some(Duration::ZERO)).unwrap();

        cache.store("key", &vec!["stale".to_string()]).unwrap();

        assert_eq!(cache.load("key").unwrap(), None);
    }
}

//! Local durable storage for the cart and wishlist.
//!
//! Values are JSON strings keyed by a short name (`"cart"`, `"wishlist"`).
//! The [`LocalStorage`] port is synchronous; callers treat write failures as
//! best-effort.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key contains characters that cannot be used as a file name.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Key/value persistence port.
pub trait LocalStorage: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend could not be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend could not be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove every stored key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend could not be cleared.
    fn clear(&self) -> Result<(), StorageError>;
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-process storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with `values`.
    #[must_use]
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = values
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: Arc::new(Mutex::new(map)),
        }
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.clear();
        Ok(())
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// One `<key>.json` file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the data directory. It is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl LocalStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        // Readers never observe a partial file
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                std::fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

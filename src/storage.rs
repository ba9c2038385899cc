//! Storage backend trait and the JSON implementation

use crate::error::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

/// Trait for settings-file storage backends
///
/// The settings store is generic over this so the on-disk format can be
/// swapped without touching the caching or locking logic.
pub trait StorageBackend: Clone + Send + Sync {
    /// File extension for this storage format (e.g., "json")
    fn extension(&self) -> &str;

    /// Serialize data to string
    fn serialize<T: Serialize>(&self, data: &T) -> Result<String>;

    /// Deserialize data from string; `path` is used for error context only
    fn deserialize<T: DeserializeOwned>(&self, path: &Path, content: &str) -> Result<T>;

    /// Read and deserialize a settings file.
    ///
    /// Returns `Ok(None)` when the file does not exist or contains only
    /// whitespace. First-run bootstrapping treats both the same way.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        self.deserialize(path, &content).map(Some)
    }

    /// Serialize and write to file.
    ///
    /// Uses atomic replacement: the content is written to a temp file next to
    /// the target and renamed over it, so a failed write never leaves a torn
    /// settings file behind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, the parent directory cannot
    /// be created, or the write/rename fails.
    fn write<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let content = self.serialize(data)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let file_name = path.file_name().ok_or_else(|| {
            Error::InvalidPath(format!("'{}' has no filename", path.display()))
        })?;
        let mut temp_filename = file_name.to_os_string();
        temp_filename.push(".tmp");
        let temp_path = path.with_file_name(temp_filename);

        std::fs::write(&temp_path, &content).map_err(|e| Error::FileWrite {
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, path).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

// =============================================================================
// JSON Storage Implementation
// =============================================================================

/// JSON storage backend (default)
#[derive(Clone)]
pub struct JsonStorage {
    /// Pretty print JSON output
    pretty: bool,
}

impl JsonStorage {
    /// Create a JSON storage backend with pretty printing enabled
    #[must_use]
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Create a compact JSON storage (no pretty printing)
    #[must_use]
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for JsonStorage {
    fn extension(&self) -> &str {
        "json"
    }

    fn serialize<T: Serialize>(&self, data: &T) -> Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(data).map_err(Error::from)
        } else {
            serde_json::to_string(data).map_err(Error::from)
        }
    }

    fn deserialize<T: DeserializeOwned>(&self, path: &Path, content: &str) -> Result<T> {
        serde_json::from_str(content).map_err(|e| Error::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Error types for greenhouse-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for greenhouse-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for greenhouse-core
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Validation Errors
    // -------------------------------------------------------------------------
    #[error("Setting key must not be empty or whitespace")]
    InvalidKey,

    // -------------------------------------------------------------------------
    // Persistence Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read settings file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write settings file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid settings path: {0}")]
    InvalidPath(String),

    // -------------------------------------------------------------------------
    // Facade Errors (wrap the underlying store failure)
    // -------------------------------------------------------------------------
    #[error("Failed to load application settings")]
    LoadSettings(#[source] Box<Error>),

    #[error("Failed to save application settings")]
    SaveSettings(#[source] Box<Error>),

    #[error("Failed to reset application settings")]
    ResetSettings(#[source] Box<Error>),
}

impl Error {
    /// Check if this is a persistence (file I/O or parse) error
    #[must_use]
    pub fn is_persistence_error(&self) -> bool {
        matches!(
            self,
            Error::FileRead { .. }
                | Error::FileWrite { .. }
                | Error::DirectoryCreate { .. }
                | Error::Parse { .. }
        )
    }

    /// Wrap this error as a settings-load failure
    pub(crate) fn into_load(self) -> Self {
        Error::LoadSettings(Box::new(self))
    }

    /// Wrap this error as a settings-save failure
    pub(crate) fn into_save(self) -> Self {
        Error::SaveSettings(Box::new(self))
    }

    /// Wrap this error as a settings-reset failure
    pub(crate) fn into_reset(self) -> Self {
        Error::ResetSettings(Box::new(self))
    }
}

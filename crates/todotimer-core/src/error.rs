//! Core error types for todotimer-core.
//!
//! Expected control flow (task completion, repeat wraparound) never goes
//! through these types; they cover rejected input and I/O only.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for todotimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid task fields
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Out-of-range list index
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Persistence-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Invalid task fields on `add` / `update`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty after trimming
    #[error("Task name must not be empty")]
    EmptyName,

    /// Duration is zero or negative
    #[error("Duration must be a positive number of minutes (got {0})")]
    NonPositiveDuration(i64),

    /// Duration text is not an integer
    #[error("Duration must be a whole number of minutes (got '{0}')")]
    InvalidDuration(String),
}

impl ValidationError {
    /// Form field the error belongs to, for inline display.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyName => "name",
            ValidationError::NonPositiveDuration(_) | ValidationError::InvalidDuration(_) => {
                "duration"
            }
        }
    }
}

/// Index outside `[0, len)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Index {index} out of bounds for task list (length: {len})")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Persistence-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO errors
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Home directory could not be determined
    #[error("Could not determine data directory")]
    NoDataDir,
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

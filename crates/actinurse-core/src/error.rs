//! Core error types for actinurse-core.
//!
//! This module defines the error hierarchy using thiserror. Only
//! validation errors reach callers of the tracker's mutating operations;
//! storage and notification failures are logged and absorbed there.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for actinurse-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Durable storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open storage at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),

    /// A snapshot could not be encoded or decoded
    #[error("Snapshot '{key}' is not valid JSON: {source}")]
    Snapshot {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The data directory could not be resolved or created
    #[error("Failed to access data directory: {0}")]
    DataDir(String),

    /// Storage refused the write (quota, read-only, injected failure)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
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

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors for reminder input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty or whitespace
    #[error("Reminder name must not be empty")]
    EmptyName,

    /// Duration is zero or negative
    #[error("Duration must be a positive number of minutes, got {0}")]
    NonPositiveDuration(i64),

    /// Duration does not parse as an integer
    #[error("Duration '{0}' is not a whole number of minutes")]
    NotANumber(String),

    /// No reminder with this id
    #[error("Reminder '{0}' not found")]
    NotFound(String),
}

/// Platform pop-up errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The host did not grant notification permission
    #[error("Notification permission denied")]
    PermissionDenied,

    /// The platform backend failed to display the pop-up
    #[error("Platform notification failed: {0}")]
    Backend(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

//! Error types for leaderboard storage.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors a key-value backend can raise.
///
/// These never reach players: [`crate::Leaderboard`] logs them and degrades.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid storage key: {key:?}")]
    InvalidKey { key: String },

    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove file: {path}: {source}")]
    FileRemoveError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory creation failed: {path}: {source}")]
    DirectoryCreateError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },
}

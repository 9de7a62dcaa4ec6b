//! Error types for profilestore
//!
//! Provides a unified error type for all operations, plus the coarse
//! taxonomy the HTTP layer maps to status codes.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using ProfileError
pub type Result<T> = std::result::Result<T, ProfileError>;

/// Unified error type for profilestore operations
#[derive(Debug, Error)]
pub enum ProfileError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Engine / Format Errors
    // -------------------------------------------------------------------------
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Corrupt stored value: {0}")]
    Corrupt(String),

    // -------------------------------------------------------------------------
    // Database File Errors
    // -------------------------------------------------------------------------
    #[error("Database file not found at {}", .0.display())]
    DatabaseMissing(PathBuf),

    #[error("Database file already exists at {}", .0.display())]
    AlreadyExists(PathBuf),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    // -------------------------------------------------------------------------
    // Configuration / Runtime Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Task failed: {0}")]
    Task(String),
}

/// Coarse classification of a failure, as seen by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Nothing matched the lookup
    NotFound,

    /// The caller supplied missing or malformed input
    ClientInput,

    /// Anything else: engine, file or runtime failure
    Internal,
}

impl ProfileError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProfileError::NotFound(_) => ErrorKind::NotFound,
            ProfileError::InvalidInput(_) => ErrorKind::ClientInput,
            _ => ErrorKind::Internal,
        }
    }
}

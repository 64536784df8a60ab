//! Error types for orgdrive.

use thiserror::Error;

/// Common error type for orgdrive operations.
#[derive(Error, Debug)]
pub enum DriveError {
    /// No caller identity was present where one is required.
    ///
    /// Checked strictly before any authorization or data access.
    #[error("authentication required: {0}")]
    Unauthenticated(String),

    /// A caller identity was present but lacks access to the target
    /// organization or file.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Referenced user, file, or membership entry does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Blob storage call failed.
    ///
    /// Propagated as-is; retries belong to the collaborator or the caller.
    #[error("storage error: {0}")]
    Storage(String),

    /// Database error.
    ///
    /// Generic wrapper for errors from the underlying store; sqlx errors
    /// are converted automatically.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for DriveError {
    fn from(e: sqlx::Error) -> Self {
        DriveError::Database(e.to_string())
    }
}

/// Result type alias for orgdrive operations.
pub type Result<T> = std::result::Result<T, DriveError>;

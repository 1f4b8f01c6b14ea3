//! Storage error types.
//!
//! Used by repository implementations and callers of storage APIs.

use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The database was written by a newer build or has a table shape this build cannot use.
    #[error("Incompatible schema: {0}")]
    IncompatibleSchema(String),
}

//! Error types for the SQLite client.
//!
//! Wraps driver failures, rendering and validation errors raised by
//! `tablekit-core`, and values that have no SQLite representation.

use tablekit_core::CoreError;
use thiserror::Error;

/// Errors that can occur during SQLite client operations.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Statement rendering or row validation failure.
    #[error(transparent)]
    CoreError(#[from] CoreError),

    /// JSON value that cannot be bound as a SQLite parameter.
    #[error("conversion error: {0}")]
    ConversionError(String),
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;

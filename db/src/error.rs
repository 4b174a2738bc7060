//! Error types for definition and configuration loading.
//!
//! Covers I/O, both document formats and the structural checks run on a
//! loaded [`DefinitionSet`](crate::DefinitionSet).

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading definitions or configuration.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A table or column definition failed validation.
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),

    /// The same table name appears more than once in a set.
    #[error("duplicate table definition: {0}")]
    DuplicateTable(String),

    /// The file extension is neither `.json`, `.yaml` nor `.yml`.
    #[error("unsupported definition file: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Convenience alias for results with [`DefinitionError`].
pub type Result<T> = std::result::Result<T, DefinitionError>;

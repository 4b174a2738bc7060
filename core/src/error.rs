//! Error types for the core helpers.
//!
//! Covers dialect capability gaps, malformed identifiers and table
//! definitions, and rows that cannot be written through the query layer.

use thiserror::Error;

use crate::dialect::Dialect;

/// Errors raised by rendering and helper operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A dialect-specific feature has no implementation for the dialect in use.
    #[error("{feature} is not supported for dialect '{dialect}'")]
    UnsupportedDialect {
        /// Human-readable name of the requested feature.
        feature: &'static str,
        /// Dialect the feature was requested for.
        dialect: Dialect,
    },

    /// Identifier is empty or otherwise unusable.
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    /// Table definition cannot be rendered.
    #[error("invalid table '{table}': {reason}")]
    InvalidTable {
        /// Table the definition belongs to.
        table: String,
        /// Why rendering was refused.
        reason: String,
    },

    /// Row passed to the query layer is not a key-value map.
    #[error("row for table '{0}' must be a JSON object")]
    InvalidRow(String),
}

/// Convenience alias for results with [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

//! Table definition documents and project configuration.
//!
//! Definition documents describe tables declaratively in YAML or JSON and
//! are turned into a [`TableInitMap`](tablekit_core::TableInitMap) for any
//! [`DatabaseClient`](tablekit_core::DatabaseClient).
//!
//! # Quick start
//!
//! ```no_run
//! # fn demo<C: tablekit_core::DatabaseClient + 'static>(client: &C) -> Result<(), Box<dyn std::error::Error>>
//! # where C::Error: 'static {
//! use tablekit_core::MigrationRunner;
//! use tablekit_db::{DefinitionSet, TablekitConfig};
//!
//! let config = TablekitConfig::discover(".")?.unwrap_or_default();
//! let set = DefinitionSet::load(config.definitions.unwrap_or_else(|| "schema/".into()))?;
//!
//! let map = set.to_init_map::<C>();
//! MigrationRunner::new(client).up(&map)?;
//! # Ok(())
//! # }
//! ```

mod config;
mod definition;
mod error;
mod loader;

pub use config::{CONFIG_FILE_NAMES, TablekitConfig};
pub use definition::{
    ColumnDefault, ColumnDefinition, ColumnKind, PrimaryKeyDefinition, PrimaryKeyKind,
    TableDefinition,
};
pub use error::{DefinitionError, Result};
pub use loader::{DefinitionDocument, DefinitionSet};

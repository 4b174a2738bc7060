//! Schema-migration helpers and naming-convention translation.
//!
//! This crate provides the building blocks shared by every tablekit backend:
//!
//! - [`case`]: `camelCase` ↔ `snake_case` identifier conversion.
//! - [`transform`]: recursive key rewriting for nested result payloads.
//! - [`Dialect`] and [`Grammar`]: per-client quoting, placeholders and the
//!   identifier/result hooks.
//! - [`TableBuilder`] and [`helpers`]: `CREATE TABLE` rendering with
//!   standard primary keys, datetime columns and `updated_at` triggers.
//! - [`DatabaseClient`]: the abstraction backends implement.
//! - [`CaseQuery`]: reads and writes with application-side keys.
//! - [`MigrationRunner`]: ordered apply/revert of [`TableInitMap`]s.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tablekit_core::case::{to_camel_case, to_snake_case};
//! use tablekit_core::transform::transform_keys;
//!
//! assert_eq!(to_snake_case("FooBarBaz"), "foo_bar_baz");
//!
//! let row = json!({ "fooBar": [{ "bazQux": 1 }] });
//! let stored = transform_keys(&row, to_snake_case);
//! assert_eq!(stored, json!({ "foo_bar": [{ "baz_qux": 1 }] }));
//! assert_eq!(transform_keys(&stored, to_camel_case), row);
//! ```

pub mod case;
mod client;
mod column;
mod dialect;
mod error;
mod grammar;
pub mod helpers;
mod migration;
mod query;
mod schema;
pub mod transform;

pub use client::DatabaseClient;
pub use column::{ColumnType, DATETIME_PRECISION, DateTimeOptions, DateTimeSupport};
pub use dialect::Dialect;
pub use error::{CoreError, Result};
pub use grammar::Grammar;
pub use migration::{
    InitAction, MigrationReport, MigrationRunner, MigrationStatus, TableInit, TableInitMap,
    TableStatus, apply_table_initializers, revert_table_initializers,
};
pub use query::CaseQuery;
pub use schema::{ColumnDef, DefaultValue, ForeignKey, TableBuilder};

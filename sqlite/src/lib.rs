//! SQLite client for tablekit.
//!
//! [`SqliteClient`] implements [`DatabaseClient`](tablekit_core::DatabaseClient)
//! over a `rusqlite` connection, so table initializers, the migration runner
//! and [`CaseQuery`](tablekit_core::CaseQuery) all work against a real
//! database.
//!
//! # Architecture
//!
//! - **`client`**: connection handling and the trait implementation
//! - **`convert`**: JSON ↔ SQLite value conversion for parameters and rows
//!
//! # Quick start
//!
//! ```no_run
//! use tablekit_core::MigrationRunner;
//! use tablekit_db::DefinitionSet;
//! use tablekit_sqlite::SqliteClient;
//!
//! let client = SqliteClient::open("app.db").unwrap().with_case_transforms(true);
//! let map = DefinitionSet::from_dir("schema/").unwrap().to_init_map::<SqliteClient>();
//!
//! let runner = MigrationRunner::new(&client);
//! runner.up(&map).unwrap();
//! let status = runner.status(&map).unwrap();
//! println!("Tables exist: {}", status.all_tables_exist());
//! ```

mod client;
pub mod convert;
mod error;

pub use client::SqliteClient;
pub use error::{Result, SqliteError};

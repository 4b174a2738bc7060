//! [`DatabaseClient`] over a `rusqlite` connection.
//!
//! # Example
//!
//! ```no_run
//! use serde_json::json;
//! use tablekit_core::{CaseQuery, DatabaseClient, TableBuilder};
//! use tablekit_sqlite::SqliteClient;
//!
//! let client = SqliteClient::open("app.db").unwrap().with_case_transforms(true);
//!
//! let mut b = TableBuilder::new("userAccounts");
//! b.increments("id");
//! b.text("displayName").not_nullable();
//! client.create_table(&b).unwrap();
//!
//! let query = CaseQuery::new(&client);
//! query.insert("userAccounts", &json!({ "displayName": "Ada" })).unwrap();
//! let rows = query.select_all("userAccounts").unwrap();
//! assert_eq!(rows[0]["displayName"], "Ada");
//! ```

use std::path::Path;

use rusqlite::{Connection, OpenFlags, OptionalExtension, params, params_from_iter};
use serde_json::Value;
use tablekit_core::{DatabaseClient, Dialect, Grammar};
use tracing::debug;

use crate::convert::{row_to_json, to_sql_values};
use crate::error::{Result, SqliteError};

/// SQLite connection paired with the grammar used to talk to it.
///
/// Case transforms are off until enabled with
/// [`with_case_transforms`](Self::with_case_transforms).
#[derive(Debug)]
pub struct SqliteClient {
    conn: Connection,
    grammar: Grammar,
}

impl SqliteClient {
    /// Wraps an open connection and enables foreign key enforcement.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::DatabaseError`] if the pragma cannot be set.
    pub fn new(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            conn,
            grammar: Grammar::new(Dialect::Sqlite),
        })
    }

    /// Opens (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        debug!(path = %path.as_ref().display(), "Opening SQLite database");
        Self::new(Connection::open(path)?)
    }

    /// Opens the database file at `path`, failing if it does not exist.
    pub fn open_existing(path: impl AsRef<Path>) -> Result<Self> {
        debug!(path = %path.as_ref().display(), "Opening existing SQLite database");
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Self::new(Connection::open_with_flags(path, flags)?)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    /// Turns the `camelCase` ↔ `snake_case` hooks on or off.
    pub fn with_case_transforms(mut self, enabled: bool) -> Self {
        self.grammar = self.grammar.with_case_transforms(enabled);
        self
    }

    /// Returns the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the client, returning the connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Names of all user tables, sorted.
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }
}

impl DatabaseClient for SqliteClient {
    type Error = SqliteError;

    fn grammar(&self) -> Grammar {
        self.grammar
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize> {
        debug!(sql, params = params.len(), "Executing statement");
        let values = to_sql_values(params)?;
        Ok(self.conn.execute(sql, params_from_iter(values.iter()))?)
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Value>> {
        debug!(sql, params = params.len(), "Running query");
        let values = to_sql_values(params)?;
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params_from_iter(values.iter()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(row_to_json(row, &columns)?);
        }
        Ok(out)
    }

    fn has_table(&self, table: &str) -> Result<bool> {
        let name = self.grammar.storage_name(table);
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![name],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

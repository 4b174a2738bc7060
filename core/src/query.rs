//! Case-aware reads and writes.
//!
//! [`CaseQuery`] sits between application code and a [`DatabaseClient`]:
//! identifiers are wrapped through the client's [`Grammar`] on the way in and
//! result rows are post-processed on the way out. With case transforms on,
//! application code only ever sees `camelCase` keys.
//!
//! # Example
//!
//! ```no_run
//! # fn demo<C: tablekit_core::DatabaseClient>(client: &C) -> Result<(), C::Error> {
//! use serde_json::json;
//! use tablekit_core::CaseQuery;
//!
//! let query = CaseQuery::new(client);
//! query.insert("userAccounts", &json!({ "displayName": "Ada" }))?;
//! for row in query.select_all("userAccounts")? {
//!     println!("{}", row["displayName"]);
//! }
//! # Ok(())
//! # }
//! ```

use serde_json::{Map, Value};

use crate::client::DatabaseClient;
use crate::error::CoreError;

/// Query front end applying the naming-convention hooks of a client.
pub struct CaseQuery<'a, C: DatabaseClient> {
    client: &'a C,
}

impl<'a, C: DatabaseClient> CaseQuery<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Returns the wrapped client.
    pub fn client(&self) -> &'a C {
        self.client
    }

    /// Runs raw SQL and post-processes every returned row.
    pub fn select(&self, sql: &str, params: &[Value]) -> Result<Vec<Value>, C::Error> {
        let rows = self.client.query(sql, params)?;
        let processed = self.client.grammar().post_process_response(Value::Array(rows));
        Ok(match processed {
            Value::Array(rows) => rows,
            other => vec![other],
        })
    }

    /// Selects every row of `table`.
    pub fn select_all(&self, table: &str) -> Result<Vec<Value>, C::Error> {
        let sql = format!(
            "SELECT * FROM {}",
            self.client.grammar().wrap_identifier(table)
        );
        self.select(&sql, &[])
    }

    /// Inserts one row given with application-side keys.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::InvalidRow`] if `row` is not a non-empty JSON
    /// object, or with the client's error if the insert is rejected.
    pub fn insert(&self, table: &str, row: &Value) -> Result<usize, C::Error> {
        let (columns, placeholders, params) = self.bind_row(table, row)?;
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.client.grammar().wrap_identifier(table),
            columns.join(", "),
            placeholders.join(", ")
        );
        self.client.execute(&sql, &params)
    }

    /// Inserts one row unless it conflicts with an existing key.
    ///
    /// Returns the number of rows actually written (0 when skipped).
    pub fn insert_ignore(&self, table: &str, row: &Value) -> Result<usize, C::Error> {
        let (columns, placeholders, params) = self.bind_row(table, row)?;
        let sql = self
            .client
            .grammar()
            .insert_ignore(table, &columns, &placeholders);
        self.client.execute(&sql, &params)
    }

    /// Number of rows in `table`.
    pub fn count(&self, table: &str) -> Result<usize, C::Error> {
        self.client.count_rows(table)
    }

    fn bind_row(
        &self,
        table: &str,
        row: &Value,
    ) -> Result<(Vec<String>, Vec<String>, Vec<Value>), CoreError> {
        let map: &Map<String, Value> = match row {
            Value::Object(map) if !map.is_empty() => map,
            _ => return Err(CoreError::InvalidRow(table.to_string())),
        };

        let grammar = self.client.grammar();
        let mut columns = Vec::with_capacity(map.len());
        let mut placeholders = Vec::with_capacity(map.len());
        let mut params = Vec::with_capacity(map.len());
        for (i, (key, value)) in map.iter().enumerate() {
            columns.push(grammar.wrap_identifier(key));
            placeholders.push(grammar.placeholder(i + 1));
            params.push(value.clone());
        }
        Ok((columns, placeholders, params))
    }
}

//! The database client abstraction.
//!
//! Everything above this trait (the query layer, the migration runner, the
//! definition loader) talks to a database only through [`DatabaseClient`].
//! Implementations supply raw statement execution, raw row retrieval and a
//! table-existence check; the DDL conveniences are provided on top of those.

use serde_json::Value;
use tracing::debug;

use crate::dialect::Dialect;
use crate::error::CoreError;
use crate::grammar::Grammar;
use crate::helpers::{create_extension_uuid_ossp_sql, foreign_key_checks_sql, truncate_sql};
use crate::schema::TableBuilder;

/// A connection-like handle the helpers can drive.
///
/// Parameters and row values are carried as [`serde_json::Value`]s. Rows are
/// returned keyed by their storage column names; apply
/// [`Grammar::post_process_response`] (or use
/// [`CaseQuery`](crate::CaseQuery)) to get application-side keys.
pub trait DatabaseClient {
    /// Error type surfaced by every operation.
    type Error: std::error::Error + From<CoreError>;

    /// Rendering rules for this client.
    fn grammar(&self) -> Grammar;

    /// Executes one statement, returning the number of affected rows.
    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize, Self::Error>;

    /// Runs a query and returns every row as a JSON object.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Value>, Self::Error>;

    /// Reports whether `table` exists.
    fn has_table(&self, table: &str) -> Result<bool, Self::Error>;

    fn dialect(&self) -> Dialect {
        self.grammar().dialect
    }

    /// Creates the table described by `builder`, then runs its follow-up
    /// statements in order.
    fn create_table(&self, builder: &TableBuilder) -> Result<(), Self::Error> {
        for statement in builder.to_sql(&self.grammar())? {
            self.execute(&statement, &[])?;
        }
        Ok(())
    }

    /// Drops `table`; a missing table is not an error.
    fn drop_table_if_exists(&self, table: &str) -> Result<(), Self::Error> {
        let sql = format!(
            "DROP TABLE IF EXISTS {}",
            self.grammar().wrap_identifier(table)
        );
        debug!(table, "Dropping table");
        self.execute(&sql, &[])?;
        Ok(())
    }

    /// Deletes every row of `table`.
    fn truncate(&self, table: &str) -> Result<(), Self::Error> {
        self.execute(&truncate_sql(&self.grammar(), table), &[])?;
        Ok(())
    }

    /// Installs `uuid-ossp` on Postgres; does nothing elsewhere.
    fn create_extension_uuid_ossp(&self) -> Result<(), Self::Error> {
        if self.dialect().is_postgres() {
            self.execute(create_extension_uuid_ossp_sql(), &[])?;
        }
        Ok(())
    }

    /// Switches foreign key enforcement for the session.
    fn set_foreign_key_checks(&self, enabled: bool) -> Result<(), Self::Error> {
        let sql = foreign_key_checks_sql(self.dialect(), enabled)?;
        self.execute(&sql, &[])?;
        Ok(())
    }

    /// Counts the rows of `table`.
    fn count_rows(&self, table: &str) -> Result<usize, Self::Error> {
        let sql = format!(
            "SELECT COUNT(*) AS row_count FROM {}",
            self.grammar().wrap_identifier(table)
        );
        let rows = self.query(&sql, &[])?;
        let count = rows
            .first()
            .and_then(|row| row.get("row_count"))
            .and_then(Value::as_u64)
            .unwrap_or(0);
        Ok(count as usize)
    }
}

//! Dialect-specific DDL helpers.
//!
//! Standard primary keys, datetime columns and `created_at`/`updated_at`
//! bookkeeping, plus the handful of one-off statements (extensions, trigger
//! functions, foreign key checks, truncation) that differ per dialect.
//!
//! Capability gaps are reported when a helper is called, as
//! [`CoreError::UnsupportedDialect`].

use crate::column::{DATETIME_PRECISION, DateTimeOptions};
use crate::dialect::Dialect;
use crate::error::{CoreError, Result};
use crate::grammar::Grammar;
use crate::schema::{ColumnDef, TableBuilder};

/// Name of the Postgres trigger function that refreshes `updated_at`.
pub const FUNCTION_UPDATE_UPDATED_AT_COLUMN: &str = "update_updated_at_column";

/// Adds a UUID primary key with a database-generated default.
///
/// On Postgres the default is `uuid_generate_v4()`, which needs the
/// `uuid-ossp` extension (see [`create_extension_uuid_ossp_sql`]).
///
/// # Errors
///
/// Returns [`CoreError::UnsupportedDialect`] for SQLite and unknown dialects,
/// which have no UUID generator.
pub fn uuid_primary_key<'b>(
    b: &'b mut TableBuilder,
    dialect: Dialect,
    column: &str,
) -> Result<&'b mut ColumnDef> {
    let default = match dialect {
        Dialect::Postgres => "uuid_generate_v4()",
        Dialect::MySql => "(uuid())",
        Dialect::Sqlite | Dialect::Unknown => {
            return Err(CoreError::UnsupportedDialect {
                feature: "uuid generation",
                dialect,
            });
        }
    };
    Ok(b.uuid(column).primary().default_raw(default).not_nullable())
}

/// Adds an auto-incrementing integer primary key.
pub fn int_primary_key<'b>(b: &'b mut TableBuilder, column: &str) -> &'b mut ColumnDef {
    b.increments(column)
}

/// Alias of [`int_primary_key`].
pub fn serial_primary_key<'b>(b: &'b mut TableBuilder, column: &str) -> &'b mut ColumnDef {
    int_primary_key(b, column)
}

/// Adds a datetime column with the standard precision, pruned for `dialect`.
pub fn datetime_column<'b>(
    b: &'b mut TableBuilder,
    dialect: Dialect,
    column: &str,
    use_timezone: bool,
) -> &'b mut ColumnDef {
    b.datetime(column, DateTimeOptions::new(use_timezone).for_dialect(dialect))
}

/// Adds `created_at` and `updated_at` columns and queues the statements that
/// keep `updated_at` current.
///
/// MySQL handles refreshes with `ON UPDATE`; Postgres and SQLite get a
/// trigger. Trigger statements are safe to run again on an existing table.
pub fn created_updated_at_columns(b: &mut TableBuilder, grammar: &Grammar, use_timezone: bool) {
    let dialect = grammar.dialect;
    let precise_now = format!("CURRENT_TIMESTAMP({DATETIME_PRECISION})");

    let created_default = if dialect.is_sqlite() {
        "CURRENT_TIMESTAMP".to_string()
    } else {
        precise_now.clone()
    };
    let updated_default = match dialect {
        Dialect::Sqlite => "CURRENT_TIMESTAMP".to_string(),
        Dialect::MySql => format!("{precise_now} ON UPDATE {precise_now}"),
        Dialect::Postgres | Dialect::Unknown => precise_now,
    };

    let opts = DateTimeOptions::new(use_timezone).for_dialect(dialect);
    b.datetime("created_at", opts).default_raw(created_default);
    b.datetime("updated_at", opts).default_raw(updated_default);

    for statement in updated_at_trigger_sql(grammar, b.table()) {
        b.after_create(statement);
    }
}

/// Deprecated name of [`created_updated_at_columns`].
#[deprecated(note = "use `created_updated_at_columns` instead")]
pub fn timestamp_columns(b: &mut TableBuilder, grammar: &Grammar, use_timezone: bool) {
    created_updated_at_columns(b, grammar, use_timezone);
}

/// Statements installing the `updated_at` trigger for `table`.
///
/// Empty for dialects that need no trigger.
pub fn updated_at_trigger_sql(grammar: &Grammar, table: &str) -> Vec<String> {
    let dialect = grammar.dialect;
    let storage = grammar.storage_name(table);
    let trigger = dialect.quote_identifier(&format!("update_{storage}_updated_at"));
    let wrapped_table = grammar.wrap_identifier(table);
    let column = grammar.wrap_identifier("updated_at");

    match dialect {
        Dialect::Postgres => vec![
            create_function_update_updated_at_sql(FUNCTION_UPDATE_UPDATED_AT_COLUMN),
            format!("DROP TRIGGER IF EXISTS {trigger} ON {wrapped_table}"),
            format!(
                "CREATE TRIGGER {trigger}\nBEFORE UPDATE\nON {wrapped_table}\nFOR EACH ROW\nEXECUTE PROCEDURE {FUNCTION_UPDATE_UPDATED_AT_COLUMN}()"
            ),
        ],
        Dialect::Sqlite => vec![format!(
            "CREATE TRIGGER IF NOT EXISTS {trigger}\nAFTER UPDATE ON {wrapped_table}\nFOR EACH ROW\nWHEN NEW.{column} IS OLD.{column}\nBEGIN\n  UPDATE {wrapped_table} SET {column} = CURRENT_TIMESTAMP WHERE rowid = NEW.rowid;\nEND"
        )],
        Dialect::MySql | Dialect::Unknown => Vec::new(),
    }
}

/// Enables the Postgres `uuid-ossp` extension.
pub fn create_extension_uuid_ossp_sql() -> &'static str {
    "CREATE EXTENSION IF NOT EXISTS \"uuid-ossp\""
}

/// Creates (or replaces) the Postgres trigger function named `function_name`
/// that stamps `updated_at` with `now()`.
pub fn create_function_update_updated_at_sql(function_name: &str) -> String {
    format!(
        "CREATE OR REPLACE FUNCTION {function_name}()\nRETURNS TRIGGER AS $$\nBEGIN\n   NEW.updated_at = now();\n   RETURN NEW;\nEND;\n$$ language 'plpgsql'"
    )
}

/// Toggles foreign key enforcement.
///
/// # Errors
///
/// Returns [`CoreError::UnsupportedDialect`] for dialects without a session
/// switch.
pub fn foreign_key_checks_sql(dialect: Dialect, enabled: bool) -> Result<String> {
    match dialect {
        Dialect::MySql => Ok(format!("SET foreign_key_checks = {}", u8::from(enabled))),
        Dialect::Sqlite => Ok(format!(
            "PRAGMA foreign_keys = {}",
            if enabled { "ON" } else { "OFF" }
        )),
        Dialect::Postgres | Dialect::Unknown => Err(CoreError::UnsupportedDialect {
            feature: "foreign key checks",
            dialect,
        }),
    }
}

/// Removes every row of `table`. SQLite has no `TRUNCATE`.
pub fn truncate_sql(grammar: &Grammar, table: &str) -> String {
    let wrapped = grammar.wrap_identifier(table);
    if grammar.dialect.is_sqlite() {
        format!("DELETE FROM {wrapped}")
    } else {
        format!("TRUNCATE {wrapped}")
    }
}

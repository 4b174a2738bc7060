//! Per-client rendering rules.
//!
//! A [`Grammar`] pairs a [`Dialect`] with the naming-convention switch. It is
//! the single place where identifiers are wrapped on the way into SQL and
//! where result rows are rewritten on the way out.

use serde_json::Value;

use crate::dialect::Dialect;
use crate::transform::{post_process_response, wrap_identifier};

/// Rendering rules for one database client.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tablekit_core::{Dialect, Grammar};
///
/// let grammar = Grammar::new(Dialect::Postgres).with_case_transforms(true);
/// assert_eq!(grammar.wrap_identifier("userAccounts"), "\"user_accounts\"");
/// assert_eq!(grammar.placeholder(2), "$2");
///
/// let rows = grammar.post_process_response(json!([{ "created_at": 1 }]));
/// assert_eq!(rows, json!([{ "createdAt": 1 }]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Grammar {
    /// Dialect used for quoting, placeholders and DDL.
    pub dialect: Dialect,
    /// Snake-case identifiers going in, camel-case result keys coming out.
    pub case_transforms: bool,
}

impl Grammar {
    /// Creates a grammar for `dialect` with case transforms disabled.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            case_transforms: false,
        }
    }

    /// Enables or disables the snake/camel translation.
    pub fn with_case_transforms(mut self, enabled: bool) -> Self {
        self.case_transforms = enabled;
        self
    }

    /// Wraps an identifier for use in SQL.
    ///
    /// `table.column` style names are wrapped segment by segment and `*` is
    /// left bare.
    pub fn wrap_identifier(&self, name: &str) -> String {
        name.split('.')
            .map(|segment| self.wrap_segment(segment))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn wrap_segment(&self, segment: &str) -> String {
        if segment == "*" {
            return segment.to_string();
        }
        let quote = |s: &str| self.dialect.quote_identifier(s);
        if self.case_transforms {
            wrap_identifier(segment, quote)
        } else {
            quote(segment)
        }
    }

    /// Storage-side name of an identifier, without quoting.
    pub fn storage_name(&self, name: &str) -> String {
        if self.case_transforms {
            wrap_identifier(name, str::to_string)
        } else {
            name.to_string()
        }
    }

    /// Bind placeholder for the 1-based parameter `index`.
    pub fn placeholder(&self, index: usize) -> String {
        match self.dialect {
            Dialect::Postgres => format!("${index}"),
            _ => "?".to_string(),
        }
    }

    /// Applies the result hook when case transforms are enabled.
    pub fn post_process_response(&self, result: Value) -> Value {
        if self.case_transforms {
            post_process_response(result)
        } else {
            result
        }
    }

    /// Renders an `INSERT` that skips rows conflicting with existing keys.
    ///
    /// Only unique and primary key conflicts are skipped. NOT NULL, CHECK and
    /// foreign key violations still fail the statement, which rules out
    /// `INSERT OR IGNORE` and MySQL's `INSERT IGNORE`.
    pub fn insert_ignore(&self, table: &str, columns: &[String], placeholders: &[String]) -> String {
        let insert = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.wrap_identifier(table),
            columns.join(", "),
            placeholders.join(", ")
        );
        match (self.dialect, columns.first()) {
            (Dialect::MySql, Some(first)) => {
                format!("{insert} ON DUPLICATE KEY UPDATE {first} = {first}")
            }
            (Dialect::MySql, None) => insert,
            (Dialect::Sqlite | Dialect::Postgres | Dialect::Unknown, _) => {
                format!("{insert} ON CONFLICT DO NOTHING")
            }
        }
    }
}

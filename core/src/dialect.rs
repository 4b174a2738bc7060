//! SQL dialect classification.
//!
//! A [`Dialect`] is derived from the client name a connection was configured
//! with. Classification is a pure function of that name and is recomputed on
//! demand; each client keeps its own value, so several clients of different
//! dialects can live in one process.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Family of SQL engines sharing DDL quirks.
///
/// # Examples
///
/// ```
/// use tablekit_core::Dialect;
///
/// assert_eq!(Dialect::from_client("pg"), Dialect::Postgres);
/// assert_eq!(Dialect::from_client("mysql2"), Dialect::MySql);
/// assert_eq!(Dialect::from_client("better-sqlite3"), Dialect::Sqlite);
/// assert_eq!(Dialect::from_client("oracledb"), Dialect::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// MySQL and MariaDB.
    MySql,
    /// PostgreSQL and wire-compatible engines.
    Postgres,
    /// SQLite.
    Sqlite,
    /// Anything else; generic ANSI rendering is used.
    #[default]
    Unknown,
}

impl Dialect {
    /// Classifies a client driver name.
    pub fn from_client(client: &str) -> Self {
        match client {
            "mysql" | "mysql2" => Self::MySql,
            "postgres" | "postgresql" | "pg" => Self::Postgres,
            other if other.contains("sqlite") => Self::Sqlite,
            _ => Self::Unknown,
        }
    }

    /// Returns `true` for the MySQL family.
    pub fn is_mysql(self) -> bool {
        self == Self::MySql
    }

    /// Returns `true` for the Postgres family.
    pub fn is_postgres(self) -> bool {
        self == Self::Postgres
    }

    /// Returns `true` for SQLite.
    pub fn is_sqlite(self) -> bool {
        self == Self::Sqlite
    }

    /// Lower-case name used in config files and messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
            Self::Unknown => "unknown",
        }
    }

    /// Quotes a single identifier segment.
    ///
    /// MySQL uses backticks, every other dialect double quotes. An embedded
    /// quote character is escaped by doubling it.
    pub fn quote_identifier(self, ident: &str) -> String {
        let quote = if self.is_mysql() { '`' } else { '"' };
        let mut out = String::with_capacity(ident.len() + 2);
        out.push(quote);
        for ch in ident.chars() {
            if ch == quote {
                out.push(quote);
            }
            out.push(ch);
        }
        out.push(quote);
        out
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = std::convert::Infallible;

    /// Same mapping as [`Dialect::from_client`], case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_client(&s.trim().to_ascii_lowercase()))
    }
}

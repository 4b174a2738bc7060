//! Column types and datetime options.
//!
//! Datetime columns carry an explicit [`DateTimeOptions`] value. Which of its
//! fields a dialect honours is spelled out once in [`DateTimeSupport`], and
//! options are pruned against that table rather than patched field by field.

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;

/// Fractional-second precision used for datetime columns and defaults.
pub const DATETIME_PRECISION: u8 = 6;

/// Options for a datetime column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateTimeOptions {
    /// Store the value with a time zone.
    #[serde(default)]
    pub use_timezone: bool,
    /// Fractional-second digits.
    #[serde(default)]
    pub precision: Option<u8>,
}

/// Datetime options a dialect understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeSupport {
    /// `with time zone` variants exist.
    pub timezone: bool,
    /// Fractional-second precision can be declared.
    pub precision: bool,
}

impl DateTimeSupport {
    /// Applicable datetime options per dialect.
    pub fn for_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Postgres | Dialect::Unknown => Self {
                timezone: true,
                precision: true,
            },
            Dialect::MySql => Self {
                timezone: false,
                precision: true,
            },
            Dialect::Sqlite => Self {
                timezone: false,
                precision: false,
            },
        }
    }
}

impl DateTimeOptions {
    /// Options with the default [`DATETIME_PRECISION`].
    pub fn new(use_timezone: bool) -> Self {
        Self {
            use_timezone,
            precision: Some(DATETIME_PRECISION),
        }
    }

    /// Drops every option `dialect` cannot express.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablekit_core::{DateTimeOptions, Dialect};
    ///
    /// let opts = DateTimeOptions::new(true);
    /// assert_eq!(opts.for_dialect(Dialect::Sqlite), DateTimeOptions::default());
    /// assert_eq!(opts.for_dialect(Dialect::MySql).precision, Some(6));
    /// assert!(!opts.for_dialect(Dialect::MySql).use_timezone);
    /// assert_eq!(opts.for_dialect(Dialect::Postgres), opts);
    /// ```
    pub fn for_dialect(self, dialect: Dialect) -> Self {
        let support = DateTimeSupport::for_dialect(dialect);
        Self {
            use_timezone: self.use_timezone && support.timezone,
            precision: self.precision.filter(|_| support.precision),
        }
    }

    fn sql_type(self, dialect: Dialect) -> String {
        let opts = self.for_dialect(dialect);
        let precision = opts.precision.map(|p| format!("({p})")).unwrap_or_default();
        match dialect {
            Dialect::Postgres if opts.use_timezone => format!("timestamptz{precision}"),
            Dialect::Postgres => format!("timestamp{precision}"),
            Dialect::MySql => format!("datetime{precision}"),
            Dialect::Sqlite => "datetime".to_string(),
            Dialect::Unknown if opts.use_timezone => {
                format!("timestamp{precision} with time zone")
            }
            Dialect::Unknown => format!("timestamp{precision}"),
        }
    }
}

/// Logical column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// UUID value.
    Uuid,
    /// Auto-incrementing integer primary key.
    Increments,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    BigInteger,
    /// Unbounded text.
    Text,
    /// Bounded character string.
    String(u32),
    /// Boolean.
    Boolean,
    /// Double-precision float.
    Real,
    /// JSON document.
    Json,
    /// Date and time.
    DateTime(DateTimeOptions),
}

impl ColumnType {
    /// SQL type name for `dialect`.
    ///
    /// [`ColumnType::Increments`] renders only its base type here; the
    /// auto-increment clause is part of the column definition.
    pub fn sql_type(self, dialect: Dialect) -> String {
        match self {
            Self::Uuid if dialect.is_postgres() => "uuid".to_string(),
            Self::Uuid => "char(36)".to_string(),
            Self::Increments => match dialect {
                Dialect::Postgres => "serial".to_string(),
                Dialect::MySql => "int unsigned".to_string(),
                Dialect::Sqlite | Dialect::Unknown => "integer".to_string(),
            },
            Self::Integer => "integer".to_string(),
            Self::BigInteger => "bigint".to_string(),
            Self::Text => "text".to_string(),
            Self::String(len) => format!("varchar({len})"),
            Self::Boolean => "boolean".to_string(),
            Self::Real => match dialect {
                Dialect::Postgres | Dialect::Unknown => "double precision".to_string(),
                Dialect::MySql => "double".to_string(),
                Dialect::Sqlite => "real".to_string(),
            },
            Self::Json => match dialect {
                Dialect::Postgres => "jsonb".to_string(),
                Dialect::MySql => "json".to_string(),
                Dialect::Sqlite | Dialect::Unknown => "text".to_string(),
            },
            Self::DateTime(opts) => opts.sql_type(dialect),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_table() {
        let pg = DateTimeSupport::for_dialect(Dialect::Postgres);
        assert!(pg.timezone && pg.precision);
        let my = DateTimeSupport::for_dialect(Dialect::MySql);
        assert!(!my.timezone && my.precision);
        let lite = DateTimeSupport::for_dialect(Dialect::Sqlite);
        assert!(!lite.timezone && !lite.precision);
    }

    #[test]
    fn test_datetime_sql_types() {
        let tz = ColumnType::DateTime(DateTimeOptions::new(true));
        let plain = ColumnType::DateTime(DateTimeOptions::new(false));
        assert_eq!(tz.sql_type(Dialect::Postgres), "timestamptz(6)");
        assert_eq!(plain.sql_type(Dialect::Postgres), "timestamp(6)");
        assert_eq!(tz.sql_type(Dialect::MySql), "datetime(6)");
        assert_eq!(tz.sql_type(Dialect::Sqlite), "datetime");
        assert_eq!(tz.sql_type(Dialect::Unknown), "timestamp(6) with time zone");
    }

    #[test]
    fn test_datetime_without_precision() {
        let opts = DateTimeOptions {
            use_timezone: false,
            precision: None,
        };
        assert_eq!(ColumnType::DateTime(opts).sql_type(Dialect::MySql), "datetime");
    }

    #[test]
    fn test_other_sql_types() {
        assert_eq!(ColumnType::Uuid.sql_type(Dialect::Postgres), "uuid");
        assert_eq!(ColumnType::Uuid.sql_type(Dialect::MySql), "char(36)");
        assert_eq!(ColumnType::Increments.sql_type(Dialect::Postgres), "serial");
        assert_eq!(ColumnType::String(64).sql_type(Dialect::Sqlite), "varchar(64)");
        assert_eq!(ColumnType::Json.sql_type(Dialect::Postgres), "jsonb");
        assert_eq!(ColumnType::Real.sql_type(Dialect::Sqlite), "real");
    }
}

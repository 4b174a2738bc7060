//! Declarative table definitions.
//!
//! A definition document lists tables in dependency order, each with an
//! optional primary key, plain columns, optional `created_at`/`updated_at`
//! columns and seed rows. Column and seed keys are written the way the
//! application sees them (`camelCase`); the client grammar decides the
//! storage names.
//!
//! # Example YAML
//!
//! ```yaml
//! tables:
//!   - name: authors
//!     primary_key: { kind: increments }
//!     timestamps: true
//!     columns:
//!       - { name: displayName, type: string, length: 120, nullable: false }
//!       - { name: isActive, type: boolean, default: true }
//!     seed:
//!       - { id: 1, displayName: Ada }
//!   - name: posts
//!     primary_key: { kind: increments }
//!     columns:
//!       - { name: authorId, type: integer, references: authors.id }
//!       - { name: body, type: text }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tablekit_core::helpers::{created_updated_at_columns, datetime_column, int_primary_key, uuid_primary_key};
use tablekit_core::{ColumnDef, ColumnType, CoreError, DefaultValue, Grammar, TableBuilder};

fn default_true() -> bool {
    true
}

fn default_pk_column() -> String {
    "id".to_string()
}

/// How a table's primary key is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryKeyKind {
    /// Auto-incrementing integer.
    Increments,
    /// Database-generated UUID (Postgres and MySQL only).
    Uuid,
}

/// Primary key of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeyDefinition {
    pub kind: PrimaryKeyKind,
    /// Column name, `id` when omitted.
    #[serde(default = "default_pk_column")]
    pub column: String,
}

/// Column types accepted in definition documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Uuid,
    Integer,
    BigInteger,
    Text,
    /// Bounded string; requires `length`.
    String,
    Boolean,
    Real,
    Json,
    Datetime,
}

/// Column default as written in a document.
///
/// `{ raw: "..." }` is passed through as SQL; scalars become literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnDefault {
    Raw { raw: String },
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<&ColumnDefault> for DefaultValue {
    fn from(value: &ColumnDefault) -> Self {
        match value {
            ColumnDefault::Raw { raw } => DefaultValue::Raw(raw.clone()),
            ColumnDefault::Boolean(b) => DefaultValue::Boolean(*b),
            ColumnDefault::Integer(n) => DefaultValue::Integer(*n),
            ColumnDefault::Real(n) => DefaultValue::Real(*n),
            ColumnDefault::Text(s) => DefaultValue::Text(s.clone()),
        }
    }
}

/// One non-key column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ColumnKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ColumnDefault>,
    /// Only meaningful for `datetime` columns.
    #[serde(default)]
    pub use_timezone: bool,
    /// Foreign key target as `table.column`, or just `table` for its `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
}

impl ColumnDefinition {
    /// Creates a nullable column with no default.
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            length: None,
            nullable: true,
            unique: false,
            default: None,
            use_timezone: false,
            references: None,
        }
    }

    /// Splits [`references`](Self::references) into `(table, column)`.
    pub fn reference_target(&self) -> Option<(&str, &str)> {
        self.references
            .as_deref()
            .map(|target| target.split_once('.').unwrap_or((target, "id")))
    }

    fn add_to(&self, b: &mut TableBuilder, grammar: &Grammar) -> tablekit_core::Result<()> {
        let name = self.name.as_str();
        let column: &mut ColumnDef = match self.kind {
            ColumnKind::Datetime => datetime_column(b, grammar.dialect, name, self.use_timezone),
            ColumnKind::String => {
                let length = self.length.ok_or_else(|| CoreError::InvalidTable {
                    table: b.table().to_string(),
                    reason: format!("string column {name} needs a length"),
                })?;
                b.string(name, length)
            }
            ColumnKind::Uuid => b.column(name, ColumnType::Uuid),
            ColumnKind::Integer => b.column(name, ColumnType::Integer),
            ColumnKind::BigInteger => b.column(name, ColumnType::BigInteger),
            ColumnKind::Text => b.column(name, ColumnType::Text),
            ColumnKind::Boolean => b.column(name, ColumnType::Boolean),
            ColumnKind::Real => b.column(name, ColumnType::Real),
            ColumnKind::Json => b.column(name, ColumnType::Json),
        };

        if !self.nullable {
            column.not_nullable();
        }
        if self.unique {
            column.unique();
        }
        if let Some(default) = &self.default {
            column.default_to(default.into());
        }
        if let Some((table, target)) = self.reference_target() {
            column.references(table, target);
        }
        Ok(())
    }
}

/// One table: schema plus optional seed rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<PrimaryKeyDefinition>,
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
    /// Adds `created_at`/`updated_at` and the refresh trigger.
    #[serde(default)]
    pub timestamps: bool,
    /// Timezone flag for the timestamp columns.
    #[serde(default)]
    pub use_timezone: bool,
    /// Rows inserted after creation, keyed with application-side names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seed: Vec<Map<String, Value>>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: None,
            columns: Vec::new(),
            timestamps: false,
            use_timezone: false,
            seed: Vec::new(),
        }
    }

    /// Returns `true` if the definition describes any schema.
    pub fn has_schema(&self) -> bool {
        self.primary_key.is_some() || !self.columns.is_empty() || self.timestamps
    }

    pub fn has_seed(&self) -> bool {
        !self.seed.is_empty()
    }

    /// Builds the table for `grammar`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedDialect`] for a UUID primary key on a
    /// dialect without a UUID generator, or [`CoreError::InvalidTable`] for a
    /// `string` column without a length.
    pub fn to_table_builder(&self, grammar: &Grammar) -> tablekit_core::Result<TableBuilder> {
        let mut b = TableBuilder::new(self.name.as_str());
        if let Some(pk) = &self.primary_key {
            match pk.kind {
                PrimaryKeyKind::Increments => {
                    int_primary_key(&mut b, &pk.column);
                }
                PrimaryKeyKind::Uuid => {
                    uuid_primary_key(&mut b, grammar.dialect, &pk.column)?;
                }
            }
        }
        for column in &self.columns {
            column.add_to(&mut b, grammar)?;
        }
        if self.timestamps {
            created_updated_at_columns(&mut b, grammar, self.use_timezone);
        }
        Ok(b)
    }

    /// Checks the table on its own.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("table name must not be empty".to_string());
        }

        let mut seen: Vec<&str> = Vec::new();
        if let Some(pk) = &self.primary_key {
            if pk.column.trim().is_empty() {
                return Err(format!("{}: primary key column must not be empty", self.name));
            }
            seen.push(&pk.column);
        }
        for column in &self.columns {
            if column.name.trim().is_empty() {
                return Err(format!("{}: column name must not be empty", self.name));
            }
            if seen.contains(&column.name.as_str()) {
                return Err(format!("{}: duplicate column {}", self.name, column.name));
            }
            if self.timestamps && matches!(column.name.as_str(), "createdAt" | "updatedAt" | "created_at" | "updated_at") {
                return Err(format!(
                    "{}: column {} clashes with the timestamp columns",
                    self.name, column.name
                ));
            }
            if column.kind == ColumnKind::String && column.length.is_none() {
                return Err(format!("{}: string column {} needs a length", self.name, column.name));
            }
            if matches!(column.default, Some(ColumnDefault::Real(n)) if !n.is_finite()) {
                return Err(format!(
                    "{}: column {} has a non-finite default",
                    self.name, column.name
                ));
            }
            if let Some((table, target)) = column.reference_target() {
                if table.is_empty() || target.is_empty() {
                    return Err(format!(
                        "{}: column {} has a malformed reference",
                        self.name, column.name
                    ));
                }
            }
            seen.push(&column.name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablekit_core::Dialect;

    #[test]
    fn test_yaml_column_defaults() {
        let yaml = "name: amount\ntype: real\n";
        let column: ColumnDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(column.kind, ColumnKind::Real);
        assert!(column.nullable);
        assert!(!column.unique);
        assert_eq!(column.default, None);
    }

    #[test]
    fn test_untagged_defaults() {
        let parse = |yaml: &str| -> ColumnDefault { serde_yaml::from_str(yaml).unwrap() };
        assert_eq!(parse("true"), ColumnDefault::Boolean(true));
        assert_eq!(parse("42"), ColumnDefault::Integer(42));
        assert_eq!(parse("1.5"), ColumnDefault::Real(1.5));
        assert_eq!(parse("draft"), ColumnDefault::Text("draft".into()));
        assert_eq!(
            parse("{ raw: CURRENT_TIMESTAMP }"),
            ColumnDefault::Raw {
                raw: "CURRENT_TIMESTAMP".into()
            }
        );
    }

    #[test]
    fn test_reference_target() {
        let mut column = ColumnDefinition::new("authorId", ColumnKind::Integer);
        assert_eq!(column.reference_target(), None);
        column.references = Some("authors.id".into());
        assert_eq!(column.reference_target(), Some(("authors", "id")));
        column.references = Some("authors".into());
        assert_eq!(column.reference_target(), Some(("authors", "id")));
    }

    #[test]
    fn test_primary_key_column_defaults_to_id() {
        let pk: PrimaryKeyDefinition = serde_yaml::from_str("kind: uuid").unwrap();
        assert_eq!(pk.kind, PrimaryKeyKind::Uuid);
        assert_eq!(pk.column, "id");
    }

    #[test]
    fn test_builder_renders_columns() {
        let mut table = TableDefinition::new("userAccounts");
        table.primary_key = Some(PrimaryKeyDefinition {
            kind: PrimaryKeyKind::Increments,
            column: "id".into(),
        });
        let mut name = ColumnDefinition::new("displayName", ColumnKind::String);
        name.length = Some(80);
        name.nullable = false;
        table.columns.push(name);

        let grammar = Grammar::new(Dialect::Sqlite).with_case_transforms(true);
        let sql = table.to_table_builder(&grammar).unwrap().to_sql(&grammar).unwrap();
        assert_eq!(sql.len(), 1);
        assert!(sql[0].starts_with("CREATE TABLE IF NOT EXISTS \"user_accounts\""));
        assert!(sql[0].contains("\"display_name\" varchar(80) not null"));
    }

    #[test]
    fn test_uuid_key_rejected_on_sqlite() {
        let mut table = TableDefinition::new("tokens");
        table.primary_key = Some(PrimaryKeyDefinition {
            kind: PrimaryKeyKind::Uuid,
            column: "id".into(),
        });
        let grammar = Grammar::new(Dialect::Sqlite);
        assert!(table.to_table_builder(&grammar).is_err());
        assert!(table.to_table_builder(&Grammar::new(Dialect::Postgres)).is_ok());
    }

    #[test]
    fn test_timestamps_queue_trigger() {
        let mut table = TableDefinition::new("notes");
        table.timestamps = true;
        let grammar = Grammar::new(Dialect::Sqlite);
        let b = table.to_table_builder(&grammar).unwrap();
        assert_eq!(b.columns().len(), 2);
        assert!(!b.after_create_statements().is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        assert!(TableDefinition::new(" ").validate().is_err());

        let mut table = TableDefinition::new("t");
        table.columns.push(ColumnDefinition::new("a", ColumnKind::Text));
        table.columns.push(ColumnDefinition::new("a", ColumnKind::Integer));
        assert!(table.validate().unwrap_err().contains("duplicate column a"));

        let mut table = TableDefinition::new("t");
        table.columns.push(ColumnDefinition::new("label", ColumnKind::String));
        assert!(table.validate().unwrap_err().contains("needs a length"));

        let mut table = TableDefinition::new("t");
        table.timestamps = true;
        table.columns.push(ColumnDefinition::new("updatedAt", ColumnKind::Datetime));
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_defaults() {
        for yaml in [".nan", ".inf", "-.inf"] {
            let mut column = ColumnDefinition::new("ratio", ColumnKind::Real);
            column.default = Some(serde_yaml::from_str(yaml).unwrap());
            let mut table = TableDefinition::new("t");
            table.columns.push(column);
            assert!(table.validate().unwrap_err().contains("non-finite default"), "{yaml}");
        }

        let mut column = ColumnDefinition::new("ratio", ColumnKind::Real);
        column.default = Some(ColumnDefault::Real(0.5));
        let mut table = TableDefinition::new("t");
        table.columns.push(column);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_builder_requires_string_length() {
        let mut table = TableDefinition::new("t");
        table.columns.push(ColumnDefinition::new("code", ColumnKind::String));
        let err = table
            .to_table_builder(&Grammar::new(Dialect::Sqlite))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTable { ref reason, .. } if reason.contains("needs a length")));
    }
}

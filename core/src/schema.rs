//! Table builder and `CREATE TABLE` rendering.
//!
//! [`TableBuilder`] collects column definitions and follow-up statements
//! (triggers and the like) for one table. Rendering goes through a
//! [`Grammar`], so identifiers pick up the client's quoting and naming
//! convention.
//!
//! # Example
//!
//! ```
//! use tablekit_core::{Dialect, Grammar, TableBuilder};
//!
//! let mut b = TableBuilder::new("userProfiles");
//! b.increments("id");
//! b.string("displayName", 120).not_nullable();
//! b.boolean("isActive").default_raw("1");
//!
//! let grammar = Grammar::new(Dialect::Sqlite).with_case_transforms(true);
//! let sql = b.to_sql(&grammar).unwrap();
//! assert_eq!(sql.len(), 1);
//! assert!(sql[0].starts_with("CREATE TABLE IF NOT EXISTS \"user_profiles\""));
//! assert!(sql[0].contains("\"display_name\" varchar(120) not null"));
//! ```

use std::collections::HashSet;

use crate::column::{ColumnType, DateTimeOptions};
use crate::dialect::Dialect;
use crate::error::{CoreError, Result};
use crate::grammar::Grammar;

/// Column default.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// SQL expression inserted verbatim.
    Raw(String),
    /// String literal.
    Text(String),
    /// Integer literal.
    Integer(i64),
    /// Floating point literal.
    Real(f64),
    /// Boolean literal.
    Boolean(bool),
}

impl DefaultValue {
    fn render(&self, dialect: Dialect) -> String {
        match self {
            Self::Raw(sql) => sql.clone(),
            Self::Text(text) => format!("'{}'", text.replace('\'', "''")),
            Self::Integer(n) => n.to_string(),
            Self::Real(n) => n.to_string(),
            Self::Boolean(b) if dialect.is_sqlite() => (if *b { "1" } else { "0" }).to_string(),
            Self::Boolean(b) => b.to_string(),
        }
    }
}

/// Foreign key target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Referenced table.
    pub table: String,
    /// Referenced column.
    pub column: String,
}

/// One column of a table under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
    pub primary: bool,
    pub nullable: bool,
    pub unique: bool,
    pub default: Option<DefaultValue>,
    pub references: Option<ForeignKey>,
}

impl ColumnDef {
    /// Creates a nullable column with no constraints.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            primary: false,
            nullable: true,
            unique: false,
            default: None,
            references: None,
        }
    }

    /// Marks the column as (part of) the primary key.
    pub fn primary(&mut self) -> &mut Self {
        self.primary = true;
        self
    }

    pub fn not_nullable(&mut self) -> &mut Self {
        self.nullable = false;
        self
    }

    pub fn nullable(&mut self) -> &mut Self {
        self.nullable = true;
        self
    }

    pub fn unique(&mut self) -> &mut Self {
        self.unique = true;
        self
    }

    pub fn default_to(&mut self, value: DefaultValue) -> &mut Self {
        self.default = Some(value);
        self
    }

    /// Sets a default given as a raw SQL expression.
    pub fn default_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.default_to(DefaultValue::Raw(sql.into()))
    }

    /// Adds a foreign key to `table(column)`.
    pub fn references(&mut self, table: impl Into<String>, column: impl Into<String>) -> &mut Self {
        self.references = Some(ForeignKey {
            table: table.into(),
            column: column.into(),
        });
        self
    }

    fn render(&self, grammar: &Grammar) -> String {
        let dialect = grammar.dialect;
        let name = grammar.wrap_identifier(&self.name);

        if self.column_type == ColumnType::Increments {
            return match dialect {
                Dialect::Postgres => format!("{name} serial primary key"),
                Dialect::MySql => {
                    format!("{name} int unsigned not null auto_increment primary key")
                }
                Dialect::Sqlite => format!("{name} integer not null primary key autoincrement"),
                Dialect::Unknown => format!("{name} integer not null primary key"),
            };
        }

        let mut out = format!("{name} {}", self.column_type.sql_type(dialect));
        if !self.nullable {
            out.push_str(" not null");
        }
        if self.unique {
            out.push_str(" unique");
        }
        if let Some(default) = &self.default {
            out.push_str(" default ");
            out.push_str(&default.render(dialect));
        }
        out
    }
}

/// Collects the definition of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableBuilder {
    table: String,
    columns: Vec<ColumnDef>,
    after_create: Vec<String>,
}

impl TableBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            after_create: Vec::new(),
        }
    }

    /// Application-side table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Statements queued to run after `CREATE TABLE`.
    pub fn after_create_statements(&self) -> &[String] {
        &self.after_create
    }

    /// Adds a column of an arbitrary type.
    pub fn column(&mut self, name: impl Into<String>, column_type: ColumnType) -> &mut ColumnDef {
        let idx = self.columns.len();
        self.columns.push(ColumnDef::new(name, column_type));
        &mut self.columns[idx]
    }

    pub fn uuid(&mut self, name: impl Into<String>) -> &mut ColumnDef {
        self.column(name, ColumnType::Uuid)
    }

    /// Adds an auto-incrementing integer primary key.
    pub fn increments(&mut self, name: impl Into<String>) -> &mut ColumnDef {
        let col = self.column(name, ColumnType::Increments);
        col.primary().not_nullable()
    }

    pub fn integer(&mut self, name: impl Into<String>) -> &mut ColumnDef {
        self.column(name, ColumnType::Integer)
    }

    pub fn big_integer(&mut self, name: impl Into<String>) -> &mut ColumnDef {
        self.column(name, ColumnType::BigInteger)
    }

    pub fn text(&mut self, name: impl Into<String>) -> &mut ColumnDef {
        self.column(name, ColumnType::Text)
    }

    pub fn string(&mut self, name: impl Into<String>, length: u32) -> &mut ColumnDef {
        self.column(name, ColumnType::String(length))
    }

    pub fn boolean(&mut self, name: impl Into<String>) -> &mut ColumnDef {
        self.column(name, ColumnType::Boolean)
    }

    pub fn real(&mut self, name: impl Into<String>) -> &mut ColumnDef {
        self.column(name, ColumnType::Real)
    }

    pub fn json(&mut self, name: impl Into<String>) -> &mut ColumnDef {
        self.column(name, ColumnType::Json)
    }

    /// Adds a datetime column. Options are pruned per dialect at render time.
    pub fn datetime(&mut self, name: impl Into<String>, options: DateTimeOptions) -> &mut ColumnDef {
        self.column(name, ColumnType::DateTime(options))
    }

    /// Queues a statement to run once the table exists.
    pub fn after_create(&mut self, sql: impl Into<String>) -> &mut Self {
        self.after_create.push(sql.into());
        self
    }

    /// Renders the `CREATE TABLE IF NOT EXISTS` statement followed by every
    /// queued follow-up statement.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidIdentifier`] for an empty table name and
    /// [`CoreError::InvalidTable`] when the table has no columns, two columns
    /// share a storage name, or an auto-increment key is combined with other
    /// primary key columns.
    pub fn to_sql(&self, grammar: &Grammar) -> Result<Vec<String>> {
        self.validate(grammar)?;

        let mut parts: Vec<String> = self.columns.iter().map(|c| c.render(grammar)).collect();

        let primary: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.primary && c.column_type != ColumnType::Increments)
            .map(|c| grammar.wrap_identifier(&c.name))
            .collect();
        if !primary.is_empty() {
            parts.push(format!("primary key ({})", primary.join(", ")));
        }

        for col in &self.columns {
            if let Some(fk) = &col.references {
                parts.push(format!(
                    "foreign key ({}) references {} ({})",
                    grammar.wrap_identifier(&col.name),
                    grammar.wrap_identifier(&fk.table),
                    grammar.wrap_identifier(&fk.column)
                ));
            }
        }

        let create = format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            grammar.wrap_identifier(&self.table),
            parts.join(",\n    ")
        );

        let mut statements = Vec::with_capacity(1 + self.after_create.len());
        statements.push(create);
        statements.extend(self.after_create.iter().cloned());
        Ok(statements)
    }

    fn validate(&self, grammar: &Grammar) -> Result<()> {
        if self.table.trim().is_empty() {
            return Err(CoreError::InvalidIdentifier(self.table.clone()));
        }
        if self.columns.is_empty() {
            return Err(self.invalid("table has no columns"));
        }

        let mut seen = HashSet::new();
        for col in &self.columns {
            if col.name.trim().is_empty() {
                return Err(CoreError::InvalidIdentifier(col.name.clone()));
            }
            let storage = grammar.storage_name(&col.name);
            if !seen.insert(storage.clone()) {
                return Err(self.invalid(&format!("duplicate column '{storage}'")));
            }
        }

        let has_increments = self
            .columns
            .iter()
            .any(|c| c.column_type == ColumnType::Increments);
        let other_primary = self
            .columns
            .iter()
            .any(|c| c.primary && c.column_type != ColumnType::Increments);
        if has_increments && other_primary {
            return Err(self.invalid("auto-increment key cannot be combined with other primary key columns"));
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> CoreError {
        CoreError::InvalidTable {
            table: self.table.clone(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite() -> Grammar {
        Grammar::new(Dialect::Sqlite)
    }

    #[test]
    fn test_renders_columns_and_constraints() {
        let mut b = TableBuilder::new("posts");
        b.uuid("id").primary().not_nullable();
        b.string("title", 200).not_nullable().unique();
        b.integer("votes").default_to(DefaultValue::Integer(0));
        b.text("status").default_to(DefaultValue::Text("it's new".into()));

        let sql = b.to_sql(&Grammar::new(Dialect::Postgres)).unwrap();
        let create = &sql[0];
        assert!(create.starts_with("CREATE TABLE IF NOT EXISTS \"posts\" ("));
        assert!(create.contains("\"id\" uuid not null"));
        assert!(create.contains("\"title\" varchar(200) not null unique"));
        assert!(create.contains("\"votes\" integer default 0"));
        assert!(create.contains("\"status\" text default 'it''s new'"));
        assert!(create.contains("primary key (\"id\")"));
    }

    #[test]
    fn test_increments_per_dialect() {
        let mut b = TableBuilder::new("t");
        b.increments("id");
        let render = |d: Dialect| b.to_sql(&Grammar::new(d)).unwrap().remove(0);
        assert!(render(Dialect::Postgres).contains("\"id\" serial primary key"));
        assert!(render(Dialect::MySql).contains("`id` int unsigned not null auto_increment primary key"));
        assert!(render(Dialect::Sqlite).contains("\"id\" integer not null primary key autoincrement"));
        assert!(!render(Dialect::Sqlite).contains("primary key (\"id\")"));
    }

    #[test]
    fn test_foreign_keys_and_case_transforms() {
        let mut b = TableBuilder::new("orderItems");
        b.increments("id");
        b.integer("orderId").not_nullable().references("orders", "id");
        let grammar = sqlite().with_case_transforms(true);
        let create = b.to_sql(&grammar).unwrap().remove(0);
        assert!(create.contains("\"order_items\""));
        assert!(create.contains("foreign key (\"order_id\") references \"orders\" (\"id\")"));
    }

    #[test]
    fn test_boolean_defaults() {
        let mut b = TableBuilder::new("flags");
        b.boolean("enabled").default_to(DefaultValue::Boolean(true));
        assert!(b.to_sql(&sqlite()).unwrap()[0].contains("default 1"));
        assert!(b.to_sql(&Grammar::new(Dialect::Postgres)).unwrap()[0].contains("default true"));
    }

    #[test]
    fn test_after_create_statements_follow_create() {
        let mut b = TableBuilder::new("t");
        b.increments("id");
        b.after_create("SELECT 1").after_create("SELECT 2");
        let sql = b.to_sql(&sqlite()).unwrap();
        assert_eq!(sql.len(), 3);
        assert_eq!(sql[1], "SELECT 1");
        assert_eq!(sql[2], "SELECT 2");
    }

    #[test]
    fn test_rejects_empty_table() {
        let b = TableBuilder::new("t");
        assert!(matches!(b.to_sql(&sqlite()), Err(CoreError::InvalidTable { .. })));
        let mut unnamed = TableBuilder::new("");
        unnamed.increments("id");
        assert!(matches!(unnamed.to_sql(&sqlite()), Err(CoreError::InvalidIdentifier(_))));
    }

    #[test]
    fn test_rejects_duplicate_storage_names() {
        let mut b = TableBuilder::new("t");
        b.text("userName");
        b.text("user_name");
        assert!(b.to_sql(&sqlite()).is_ok());
        assert!(b.to_sql(&sqlite().with_case_transforms(true)).is_err());
    }

    #[test]
    fn test_rejects_mixed_primary_keys() {
        let mut b = TableBuilder::new("t");
        b.increments("id");
        b.uuid("other").primary();
        assert!(b.to_sql(&sqlite()).is_err());
    }

    #[test]
    fn test_sqlite_rendering_prunes_datetime_options() {
        let mut b = TableBuilder::new("t");
        b.increments("id");
        b.string("name", 10).not_nullable();
        b.real("score").default_to(DefaultValue::Real(1.5));
        b.json("meta");
        b.datetime("seenAt", DateTimeOptions::new(true));
        let sql = b.to_sql(&sqlite()).unwrap();
        assert!(sql[0].contains("\"seenAt\" datetime"));
        assert!(sql[0].contains("\"score\" real default 1.5"));
    }
}

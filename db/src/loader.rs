//! Loading definition documents into an ordered [`DefinitionSet`].
//!
//! ```no_run
//! use tablekit_db::DefinitionSet;
//!
//! // A single YAML or JSON document
//! let set = DefinitionSet::from_file("schema/tables.yaml").unwrap();
//!
//! // Every document of a directory, in file-name order
//! let set = DefinitionSet::from_dir("schema/").unwrap();
//! for name in set.table_names() {
//!     println!("  {}", name);
//! }
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tablekit_core::transform::wrap_identifier;
use tablekit_core::{CaseQuery, DatabaseClient, TableInit, TableInitMap};

use crate::definition::TableDefinition;
use crate::error::{DefinitionError, Result};

/// On-disk shape of one definition document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefinitionDocument {
    #[serde(default)]
    pub tables: Vec<TableDefinition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Self::Json),
            Some("yaml" | "yml") => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Validated table definitions in dependency order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionSet {
    tables: Vec<TableDefinition>,
    sources: Vec<PathBuf>,
}

impl DefinitionSet {
    /// Builds a set from in-memory definitions.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::InvalidDefinition`] or
    /// [`DefinitionError::DuplicateTable`] if validation fails.
    pub fn from_tables(tables: Vec<TableDefinition>) -> Result<Self> {
        let set = Self {
            tables,
            sources: Vec::new(),
        };
        set.validate()?;
        Ok(set)
    }

    /// Loads one `.json`, `.yaml` or `.yml` document.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::UnsupportedFormat`] for other extensions,
    /// [`DefinitionError::IoError`] if the file cannot be read, a parse error
    /// for malformed documents, or a validation error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = read_document(path)?;
        let set = Self {
            tables: document.tables,
            sources: vec![path.to_path_buf()],
        };
        set.validate()?;
        Ok(set)
    }

    /// Loads every definition document in `path`, sorted by file name.
    ///
    /// Files with other extensions are skipped. Tables keep their document
    /// order, and documents are concatenated in file-name order, so prefixing
    /// files (`01_users.yaml`, `02_posts.yaml`) controls dependency order.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::IoError`] if the directory cannot be read,
    /// a parse error for any malformed document, or a validation error for
    /// the combined set.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path.as_ref())? {
            let file_path = entry?.path();
            if file_path.is_file() && Format::of(&file_path).is_some() {
                files.push(file_path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut tables = Vec::new();
        for file in &files {
            tables.extend(read_document(file)?.tables);
        }

        let set = Self {
            tables,
            sources: files,
        };
        set.validate()?;
        Ok(set)
    }

    /// Loads `path` as a directory or a single document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::from_dir(path)
        } else {
            Self::from_file(path)
        }
    }

    pub fn tables(&self) -> &[TableDefinition] {
        &self.tables
    }

    /// Files the set was read from, in load order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn get(&self, table: &str) -> Option<&TableDefinition> {
        self.tables.iter().find(|t| t.name == table)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn table_names(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    /// Builds one [`TableInit`] per definition, in set order.
    ///
    /// The create action renders the table with the client's grammar, so the
    /// same set works for any client. The seed action inserts each row with
    /// [`CaseQuery::insert_ignore`]; rows whose key already exists are left
    /// alone, which makes re-applying a set safe as long as seed rows carry
    /// their primary key.
    pub fn to_init_map<C: DatabaseClient + 'static>(&self) -> TableInitMap<C> {
        self.tables
            .iter()
            .map(|table| (table.name.clone(), init_for(table)))
            .collect()
    }

    /// Tables are compared by their `snake_case` storage name, so
    /// `userAccounts` and `user_accounts` count as the same table.
    fn validate(&self) -> Result<()> {
        let mut seen: Vec<(String, &str)> = Vec::with_capacity(self.tables.len());
        for table in &self.tables {
            table
                .validate()
                .map_err(DefinitionError::InvalidDefinition)?;
            let storage = wrap_identifier(&table.name, str::to_string);
            if let Some((_, first)) = seen.iter().find(|(name, _)| *name == storage) {
                let name = if *first == table.name {
                    table.name.clone()
                } else {
                    format!("{} (same table as {first})", table.name)
                };
                return Err(DefinitionError::DuplicateTable(name));
            }
            seen.push((storage, &table.name));
        }
        Ok(())
    }
}

fn read_document(path: &Path) -> Result<DefinitionDocument> {
    let format =
        Format::of(path).ok_or_else(|| DefinitionError::UnsupportedFormat(path.to_path_buf()))?;
    let reader = BufReader::new(std::fs::File::open(path)?);
    let document: DefinitionDocument = match format {
        Format::Json => serde_json::from_reader(reader)?,
        Format::Yaml => serde_yaml::from_reader(reader)?,
    };
    Ok(document)
}

fn init_for<C: DatabaseClient + 'static>(table: &TableDefinition) -> TableInit<C> {
    let mut init = TableInit::new();

    if table.has_schema() {
        let definition = table.clone();
        init = init.with_create(move |client: &C| {
            let builder = definition.to_table_builder(&client.grammar())?;
            client.create_table(&builder)
        });
    }

    if table.has_seed() {
        let name = table.name.clone();
        let rows: Vec<Value> = table.seed.iter().cloned().map(Value::Object).collect();
        init = init.with_seed(move |client: &C| {
            let query = CaseQuery::new(client);
            for row in &rows {
                query.insert_ignore(&name, row)?;
            }
            Ok(())
        });
    }

    init
}

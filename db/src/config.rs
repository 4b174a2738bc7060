//! Project configuration for the `tablekit` command.
//!
//! # Example YAML
//!
//! ```yaml
//! database: data/app.sqlite3
//! definitions: schema/
//! case_transforms: true
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File names probed by [`TablekitConfig::discover`], in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["tablekit.yaml", "tablekit.yml"];

fn default_true() -> bool {
    true
}

/// Settings shared by every `tablekit` invocation in a project.
///
/// # Examples
///
/// ```
/// # use tablekit_db::TablekitConfig;
/// let config: TablekitConfig = serde_yaml::from_str("database: app.db").unwrap();
/// assert!(config.case_transforms);
/// assert!(config.definitions.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablekitConfig {
    /// SQLite database file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
    /// Definition document or directory of documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<PathBuf>,
    /// Translate between `camelCase` and `snake_case` identifiers.
    #[serde(default = "default_true")]
    pub case_transforms: bool,
}

impl Default for TablekitConfig {
    fn default() -> Self {
        Self {
            database: None,
            definitions: None,
            case_transforms: true,
        }
    }
}

impl TablekitConfig {
    /// Loads configuration from a YAML file and resolves relative paths
    /// against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DefinitionError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::DefinitionError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolved_against(base))
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DefinitionError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::DefinitionError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Loads the first of [`CONFIG_FILE_NAMES`] present in `dir`.
    ///
    /// Returns `Ok(None)` when none exists.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Option<Self>> {
        let dir = dir.as_ref();
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Self::load(candidate).map(Some);
            }
        }
        Ok(None)
    }

    /// Makes relative `database` and `definitions` paths relative to `base`.
    pub fn resolved_against(mut self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.database = self.database.map(resolve);
        self.definitions = self.definitions.map(resolve);
        self
    }
}

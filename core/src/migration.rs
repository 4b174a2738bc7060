//! Ordered table-initializer migrations.
//!
//! A [`TableInitMap`] lists table initializers in dependency order:
//! referenced tables before the tables that reference them. Applying walks
//! the map front to back, running each table's `create` then `seed` action
//! to completion before moving on. Reverting walks it back to front and drops
//! every table, so dependents go before their dependencies.
//!
//! There is no rollback. If an action fails the error is returned as is,
//! tables already processed stay applied and nothing after the failing action
//! runs.
//!
//! # Example
//!
//! ```no_run
//! # fn demo<C: tablekit_core::DatabaseClient + 'static>(client: &C) -> Result<(), C::Error> {
//! use tablekit_core::{MigrationRunner, TableBuilder, TableInit, TableInitMap};
//!
//! let mut map = TableInitMap::new();
//! map.insert(
//!     "authors",
//!     TableInit::new().with_create(|c: &C| {
//!         let mut b = TableBuilder::new("authors");
//!         b.increments("id");
//!         b.text("name").not_nullable();
//!         c.create_table(&b)
//!     }),
//! );
//!
//! let runner = MigrationRunner::new(client);
//! let report = runner.up(&map)?;
//! println!("applied {} tables in {:.2}s", report.tables.len(), report.elapsed_secs());
//! runner.down(&map)?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::client::DatabaseClient;

/// A create or seed step for one table.
pub type InitAction<C> = Box<dyn Fn(&C) -> Result<(), <C as DatabaseClient>::Error>>;

/// Schema and seed actions for one table. Both are optional; an initializer
/// with neither is a no-op.
pub struct TableInit<C: DatabaseClient> {
    create: Option<InitAction<C>>,
    seed: Option<InitAction<C>>,
}

impl<C: DatabaseClient> TableInit<C> {
    pub fn new() -> Self {
        Self {
            create: None,
            seed: None,
        }
    }

    /// Sets the action that establishes the table's schema.
    pub fn with_create<F>(mut self, create: F) -> Self
    where
        F: Fn(&C) -> Result<(), C::Error> + 'static,
    {
        self.create = Some(Box::new(create));
        self
    }

    /// Sets the action that populates initial data.
    pub fn with_seed<F>(mut self, seed: F) -> Self
    where
        F: Fn(&C) -> Result<(), C::Error> + 'static,
    {
        self.seed = Some(Box::new(seed));
        self
    }

    pub fn has_create(&self) -> bool {
        self.create.is_some()
    }

    pub fn has_seed(&self) -> bool {
        self.seed.is_some()
    }

    fn run(&self, client: &C) -> Result<(), C::Error> {
        if let Some(create) = &self.create {
            create(client)?;
        }
        if let Some(seed) = &self.seed {
            seed(client)?;
        }
        Ok(())
    }
}

impl<C: DatabaseClient> Default for TableInit<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DatabaseClient> fmt::Debug for TableInit<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableInit")
            .field("create", &self.has_create())
            .field("seed", &self.has_seed())
            .finish()
    }
}

/// Table initializers keyed by table name, in insertion order.
///
/// Inserting a name that is already present replaces its initializer in
/// place, keeping the original position.
pub struct TableInitMap<C: DatabaseClient> {
    entries: Vec<(String, TableInit<C>)>,
}

impl<C: DatabaseClient> TableInitMap<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds or replaces the initializer for `table`, returning the previous one.
    pub fn insert(&mut self, table: impl Into<String>, init: TableInit<C>) -> Option<TableInit<C>> {
        let table = table.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(name, _)| *name == table) {
            return Some(std::mem::replace(existing, init));
        }
        self.entries.push((table, init));
        None
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, table: impl Into<String>, init: TableInit<C>) -> Self {
        self.insert(table, init);
        self
    }

    pub fn get(&self, table: &str) -> Option<&TableInit<C>> {
        self.entries
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, init)| init)
    }

    pub fn contains(&self, table: &str) -> bool {
        self.get(table).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Table names in definition order.
    pub fn tables(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// `(table, initializer)` pairs in definition order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &TableInit<C>)> {
        self.entries.iter().map(|(name, init)| (name.as_str(), init))
    }
}

impl<C: DatabaseClient> Default for TableInitMap<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DatabaseClient> fmt::Debug for TableInitMap<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<C: DatabaseClient, S: Into<String>> FromIterator<(S, TableInit<C>)> for TableInitMap<C> {
    fn from_iter<I: IntoIterator<Item = (S, TableInit<C>)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (table, init) in iter {
            map.insert(table, init);
        }
        map
    }
}

/// Outcome of a successful apply pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Tables processed, in order.
    pub tables: Vec<String>,
    /// Wall-clock time from before the first table to after the last.
    pub elapsed: Duration,
}

impl MigrationReport {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Existence and size of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStatus {
    pub table: String,
    pub exists: bool,
    /// Row count; zero when the table does not exist.
    pub row_count: usize,
}

/// Snapshot of every table in a [`TableInitMap`], in map order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStatus {
    pub tables: Vec<TableStatus>,
}

impl MigrationStatus {
    /// Returns `true` if every table of the map exists.
    pub fn all_tables_exist(&self) -> bool {
        self.tables.iter().all(|t| t.exists)
    }

    /// Returns `true` if at least one table of the map exists.
    pub fn any_table_exists(&self) -> bool {
        self.tables.iter().any(|t| t.exists)
    }
}

/// Applies every initializer of `map` in order.
///
/// Logs the start and end of each table and the total elapsed time.
///
/// # Errors
///
/// Returns the first error raised by a create or seed action, unmodified.
/// Earlier tables remain applied; later actions are not run.
pub fn apply_table_initializers<C: DatabaseClient>(
    client: &C,
    map: &TableInitMap<C>,
) -> Result<MigrationReport, C::Error> {
    let started = Instant::now();
    let mut tables = Vec::with_capacity(map.len());

    for (table, init) in map.iter() {
        info!(table, "-> Running table-init migration for {table} table ...");
        init.run(client)?;
        info!(table, "-> Done: table-init migration for {table} table.");
        tables.push(table.to_string());
    }

    let elapsed = started.elapsed();
    info!(
        tables = tables.len(),
        "Migration completed in: {:.2} seconds",
        elapsed.as_secs_f64()
    );
    Ok(MigrationReport { tables, elapsed })
}

/// Drops every table of `map` in reverse order.
///
/// Tables that do not exist are skipped silently.
///
/// # Errors
///
/// Returns the first error raised by the client.
pub fn revert_table_initializers<C: DatabaseClient>(
    client: &C,
    map: &TableInitMap<C>,
) -> Result<(), C::Error> {
    for table in map.tables().rev() {
        debug!(table, "Reverting table-init migration");
        client.drop_table_if_exists(table)?;
    }
    Ok(())
}

/// Runs table-init migrations against one client.
///
/// Holds nothing but the client reference; each call is an independent pass.
pub struct MigrationRunner<'a, C: DatabaseClient> {
    client: &'a C,
}

impl<'a, C: DatabaseClient> MigrationRunner<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// See [`apply_table_initializers`].
    pub fn up(&self, map: &TableInitMap<C>) -> Result<MigrationReport, C::Error> {
        apply_table_initializers(self.client, map)
    }

    /// See [`revert_table_initializers`].
    pub fn down(&self, map: &TableInitMap<C>) -> Result<(), C::Error> {
        revert_table_initializers(self.client, map)
    }

    /// Reverts then re-applies `map`.
    pub fn refresh(&self, map: &TableInitMap<C>) -> Result<MigrationReport, C::Error> {
        self.down(map)?;
        self.up(map)
    }

    /// Reports which tables of `map` exist and how many rows they hold.
    pub fn status(&self, map: &TableInitMap<C>) -> Result<MigrationStatus, C::Error> {
        let mut tables = Vec::with_capacity(map.len());
        for table in map.tables() {
            let exists = self.client.has_table(table)?;
            let row_count = if exists {
                self.client.count_rows(table)?
            } else {
                0
            };
            tables.push(TableStatus {
                table: table.to_string(),
                exists,
                row_count,
            });
        }
        Ok(MigrationStatus { tables })
    }
}

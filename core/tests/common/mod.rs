//! Recording client shared by the core integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use serde_json::{Value, json};
use tablekit_core::{CoreError, DatabaseClient, Dialect, Grammar};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("action failed: {0}")]
    Failed(String),
}

/// Shared invocation log.
pub type Log = Rc<RefCell<Vec<String>>>;

/// Client that records statements instead of running them.
pub struct RecordingClient {
    pub grammar: Grammar,
    pub statements: RefCell<Vec<(String, Vec<Value>)>>,
    pub tables: RefCell<HashSet<String>>,
    pub drops: RefCell<Vec<String>>,
    /// Rows handed back by every `query` call.
    pub rows: RefCell<Vec<Value>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::with_grammar(Grammar::new(Dialect::Sqlite))
    }

    pub fn with_grammar(grammar: Grammar) -> Self {
        Self {
            grammar,
            statements: RefCell::new(Vec::new()),
            tables: RefCell::new(HashSet::new()),
            drops: RefCell::new(Vec::new()),
            rows: RefCell::new(vec![json!({ "row_count": 0 })]),
        }
    }

    pub fn sql(&self) -> Vec<String> {
        self.statements.borrow().iter().map(|(sql, _)| sql.clone()).collect()
    }
}

impl DatabaseClient for RecordingClient {
    type Error = TestError;

    fn grammar(&self) -> Grammar {
        self.grammar
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize, TestError> {
        self.statements
            .borrow_mut()
            .push((sql.to_string(), params.to_vec()));
        if let Some(rest) = sql.strip_prefix("DROP TABLE IF EXISTS ") {
            let table = rest.trim_matches(|c| c == '"' || c == '`').to_string();
            self.tables.borrow_mut().remove(&table);
            self.drops.borrow_mut().push(table);
        }
        Ok(1)
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Value>, TestError> {
        self.statements
            .borrow_mut()
            .push((sql.to_string(), params.to_vec()));
        Ok(self.rows.borrow().clone())
    }

    fn has_table(&self, table: &str) -> Result<bool, TestError> {
        Ok(self.tables.borrow().contains(table))
    }
}

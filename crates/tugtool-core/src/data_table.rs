//! Row sink for structured findings.
//!
//! Recipes that search rather than rewrite report each finding as one row in
//! a named table. The store only guarantees a stable row-insertion call; what
//! happens to the tables after a run is up to the caller.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

use crate::error::TugError;

/// A named table of rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataTable {
    pub name: String,
    pub rows: Vec<Value>,
}

/// Thread-safe collection of data tables for one run.
#[derive(Debug, Default)]
pub struct DataTableStore {
    tables: Mutex<BTreeMap<String, DataTable>>,
}

impl DataTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize `row` and append it to `table`, creating the table on first use.
    pub fn insert_row<R: Serialize>(&self, table: &str, row: &R) -> Result<(), TugError> {
        let value = serde_json::to_value(row)?;
        let mut tables = self.tables.lock();
        tables
            .entry(table.to_string())
            .or_insert_with(|| DataTable {
                name: table.to_string(),
                rows: Vec::new(),
            })
            .rows
            .push(value);
        Ok(())
    }

    /// Copy of one table, if any row was ever inserted into it.
    pub fn table(&self, name: &str) -> Option<DataTable> {
        self.tables.lock().get(name).cloned()
    }

    pub fn row_count(&self, name: &str) -> usize {
        self.tables.lock().get(name).map_or(0, |t| t.rows.len())
    }

    /// Copy of all tables, ordered by name.
    pub fn snapshot(&self) -> Vec<DataTable> {
        self.tables.lock().values().cloned().collect()
    }
}

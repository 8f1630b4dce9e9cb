//! Run-scoped execution context.
//!
//! One [`ExecutionContext`] lives for exactly one batch run and is passed by
//! reference into every visitor invocation. It replaces process-wide statics:
//! option lookups, "report this finding once" bookkeeping, the data-table
//! sink and per-file diagnostics all hang off it. Every write path is
//! internally synchronized so files can be processed in parallel.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::data_table::DataTableStore;
use crate::error::{OutputErrorCode, TugError};

/// A failure isolated to one recipe on one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub recipe: String,
    pub source_path: String,
    pub code: OutputErrorCode,
    pub message: String,
}

impl Diagnostic {
    pub fn from_error(recipe: &str, source_path: &str, error: &TugError) -> Self {
        Diagnostic {
            recipe: recipe.to_string(),
            source_path: source_path.to_string(),
            code: error.error_code(),
            message: error.to_string(),
        }
    }
}

/// Options, dedup state, data tables and diagnostics for one run.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    options: HashMap<String, Value>,
    seen: Mutex<HashSet<String>>,
    data_tables: DataTableStore,
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style option setter.
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Typed option lookup. A present but mistyped option is an error.
    pub fn option_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, TugError> {
        match self.options.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| TugError::invalid_args(format!("option `{}`: {}", key, e))),
        }
    }

    /// Returns `true` the first time `key` is offered during this run.
    pub fn first_seen(&self, key: impl Into<String>) -> bool {
        self.seen.lock().insert(key.into())
    }

    /// Append one finding to a data table.
    pub fn insert_row<R: Serialize>(&self, table: &str, row: &R) -> Result<(), TugError> {
        self.data_tables.insert_row(table, row)
    }

    pub fn data_tables(&self) -> &DataTableStore {
        &self.data_tables
    }

    pub fn add_diagnostic(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().push(diagnostic);
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }
}

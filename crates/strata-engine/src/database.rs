//! The table catalog.
//!
//! A `Database` owns a set of named tables rooted in one data directory.
//! It exists for the shell and for embedding; individual tables are fully
//! usable on their own.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use strata_common::config::TableConfig;
use strata_common::error::{StrataError, StrataResult};
use strata_common::types::ColumnSpec;

use crate::table::Table;

/// A name → table catalog.
pub struct Database {
    dir: PathBuf,
    tables: RwLock<HashMap<String, Arc<Table>>>,
}

impl Database {
    /// Creates a catalog whose tables keep their log files under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a fresh table with the given columns, truncating any
    /// existing log of the same name.
    pub fn create_table(
        &self,
        name: &str,
        columns: Vec<ColumnSpec>,
    ) -> StrataResult<Arc<Table>> {
        let mut tables = self.tables.write();
        if tables.contains_key(name) {
            return Err(StrataError::TableExists {
                table: name.to_string(),
            });
        }

        let table = Arc::new(Table::new(
            TableConfig::new(name).with_dir(&self.dir),
        )?);
        for spec in columns {
            table.create_column(spec)?;
        }

        tables.insert(name.to_string(), Arc::clone(&table));
        Ok(table)
    }

    /// Opens a table whose log already exists, re-declares its schema,
    /// and replays the log.
    pub fn open_table(
        &self,
        name: &str,
        columns: Vec<ColumnSpec>,
    ) -> StrataResult<Arc<Table>> {
        let mut tables = self.tables.write();
        if tables.contains_key(name) {
            return Err(StrataError::TableExists {
                table: name.to_string(),
            });
        }

        let table = Arc::new(Table::new(
            TableConfig::new(name)
                .with_dir(&self.dir)
                .with_truncate_log(false),
        )?);
        for spec in columns {
            table.create_column(spec)?;
        }
        table.recover()?;

        tables.insert(name.to_string(), Arc::clone(&table));
        Ok(table)
    }

    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> StrataResult<Arc<Table>> {
        self.tables
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| StrataError::TableNotFound {
                table: name.to_string(),
            })
    }

    /// Returns the catalog's table names, sorted.
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("dir", &self.dir)
            .field("tables", &self.table_names())
            .finish()
    }
}

//! Per-table runtime configuration.
//!
//! Chunk geometry and index fan-out are compile-time constants
//! (see [`crate::constants`]); this module covers the knobs that vary per
//! table instance at runtime.

use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_FLUSH_INTERVAL_MS, LOG_BUFFER_CAPACITY, LOG_FILE_EXTENSION};

/// Configuration for a single table.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Table name. Determines the log file name.
    pub name: String,

    /// Directory where the table's log file lives.
    pub dir: PathBuf,

    /// Whether to truncate an existing log on open.
    ///
    /// `true` for a new table; `false` to preserve existing records for
    /// recovery, after which new records are appended.
    pub truncate_log: bool,

    /// Interval between background log flushes.
    pub flush_interval: Duration,

    /// Initial capacity of the log ingest buffer in bytes.
    pub log_buffer_capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: "table".to_string(),
            dir: PathBuf::from("."),
            truncate_log: true,
            flush_interval: Duration::from_millis(DEFAULT_FLUSH_INTERVAL_MS),
            log_buffer_capacity: LOG_BUFFER_CAPACITY,
        }
    }
}

impl TableConfig {
    /// Creates a configuration for a table with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the directory holding the log file.
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Sets whether the log is truncated on open.
    #[must_use]
    pub fn with_truncate_log(mut self, truncate: bool) -> Self {
        self.truncate_log = truncate;
        self
    }

    /// Sets the background flush interval.
    #[must_use]
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Sets the log ingest buffer capacity.
    #[must_use]
    pub fn with_log_buffer_capacity(mut self, capacity: usize) -> Self {
        self.log_buffer_capacity = capacity;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("table name must not be empty".to_string());
        }

        if self.flush_interval.is_zero() {
            return Err("flush interval must be positive".to_string());
        }

        Ok(())
    }

    /// Returns the path of this table's log file: `<dir>/<name>.log`.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.dir
            .join(format!("{}.{}", self.name, LOG_FILE_EXTENSION))
    }
}

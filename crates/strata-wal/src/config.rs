//! Write-ahead log configuration.

use std::path::PathBuf;
use std::time::Duration;

use strata_common::constants::{DEFAULT_FLUSH_INTERVAL_MS, LOG_BUFFER_CAPACITY};

/// Configuration for one table's write-ahead log.
#[derive(Debug, Clone)]
pub struct WalConfig {
    /// Path of the log file.
    pub path: PathBuf,

    /// Whether to truncate an existing file on open. `false` preserves
    /// existing records (recovery mode) and appends after them.
    pub truncate: bool,

    /// How long the background writer waits between flushes.
    pub flush_interval: Duration,

    /// Initial capacity of the ingest buffer in bytes.
    pub buffer_capacity: usize,
}

impl WalConfig {
    /// Creates a configuration for the given log file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            truncate: true,
            flush_interval: Duration::from_millis(DEFAULT_FLUSH_INTERVAL_MS),
            buffer_capacity: LOG_BUFFER_CAPACITY,
        }
    }

    /// Sets whether the file is truncated on open.
    #[must_use]
    pub fn with_truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    /// Sets the background flush interval.
    #[must_use]
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Sets the ingest buffer capacity.
    #[must_use]
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = WalConfig::new("/tmp/orders.log")
            .with_truncate(false)
            .with_flush_interval(Duration::from_millis(2))
            .with_buffer_capacity(4096);

        assert_eq!(config.path, PathBuf::from("/tmp/orders.log"));
        assert!(!config.truncate);
        assert_eq!(config.flush_interval, Duration::from_millis(2));
        assert_eq!(config.buffer_capacity, 4096);
    }

    #[test]
    fn test_defaults() {
        let config = WalConfig::new("t.log");
        assert!(config.truncate);
        assert_eq!(
            config.flush_interval,
            Duration::from_millis(DEFAULT_FLUSH_INTERVAL_MS)
        );
    }
}

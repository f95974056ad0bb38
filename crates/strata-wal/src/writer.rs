//! The background log writer.
//!
//! Producers serialize rows into the ingest buffer under a mutex and
//! return immediately; nothing blocks on file I/O. The background thread
//! wakes every flush interval (or on shutdown), swaps the ingest buffer
//! with its local drain buffer while holding the lock (a constant-time
//! pointer swap) and performs the file write and flush outside the lock.
//!
//! Dropping the writer signals shutdown, drains whatever is buffered, and
//! joins the thread, so a cleanly closed log ends on a record boundary.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::error;

use strata_common::types::Value;

use crate::config::WalConfig;
use crate::error::WalResult;
use crate::record::encode_row;

/// State shared between producers and the background thread.
struct Shared {
    /// Ingest buffer; producers append serialized records here.
    buffer: Mutex<Vec<u8>>,
    /// Wakes the background thread early (shutdown only; steady-state
    /// flushing rides the timeout to avoid context-switch churn).
    wakeup: Condvar,
    /// Set once, by `Drop`.
    shutdown: AtomicBool,
}

/// Asynchronous writer for one table's log file.
pub struct WalWriter {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl WalWriter {
    /// Opens the log file and starts the background thread.
    ///
    /// The file is truncated or appended-to according to the
    /// configuration's open mode.
    pub fn open(config: WalConfig) -> WalResult<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true);
        if config.truncate {
            options.truncate(true);
        } else {
            options.append(true);
        }
        let file = options.open(&config.path)?;

        let shared = Arc::new(Shared {
            buffer: Mutex::new(Vec::with_capacity(config.buffer_capacity)),
            wakeup: Condvar::new(),
            shutdown: AtomicBool::new(false),
        });

        let thread_shared = Arc::clone(&shared);
        let interval = config.flush_interval;
        let capacity = config.buffer_capacity;
        let handle = std::thread::Builder::new()
            .name("strata-wal".to_string())
            .spawn(move || flush_loop(&thread_shared, file, interval, capacity))?;

        Ok(Self {
            shared,
            handle: Some(handle),
        })
    }

    /// Serializes one row into the ingest buffer.
    ///
    /// Returns as soon as the bytes are buffered; durability follows
    /// within one flush interval. Background write failures are reported
    /// on the diagnostic channel and never surface here.
    pub fn append_entry(&self, values: &[Value]) {
        let mut buffer = self.shared.buffer.lock();
        encode_row(&mut buffer, values);
    }
}

impl Drop for WalWriter {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        self.shared.wakeup.notify_all();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// The background thread body: wait, swap, write, flush.
fn flush_loop(shared: &Shared, mut file: File, interval: Duration, capacity: usize) {
    let mut drain: Vec<u8> = Vec::with_capacity(capacity);

    loop {
        let shutting_down;
        {
            let mut buffer = shared.buffer.lock();
            if buffer.is_empty() && !shared.shutdown.load(Ordering::Acquire) {
                shared.wakeup.wait_for(&mut buffer, interval);
            }
            shutting_down = shared.shutdown.load(Ordering::Acquire);
            std::mem::swap(&mut *buffer, &mut drain);
        }

        if !drain.is_empty() {
            if let Err(e) = file.write_all(&drain).and_then(|()| file.flush()) {
                // Best-effort durability: producers never see this.
                error!(error = %e, "log flush failed, dropping batch");
            }
            drain.clear();
        } else if shutting_down {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_log;
    use strata_common::types::ColumnType;
    use tempfile::TempDir;

    fn row(key: &str, amount: i64) -> Vec<Value> {
        vec![Value::from(key), Value::Int(amount)]
    }

    const SCHEMA: &[ColumnType] = &[ColumnType::Str, ColumnType::Int];

    #[test]
    fn test_drop_drains_buffer() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("t.log");

        let writer = WalWriter::open(WalConfig::new(&path)).unwrap();
        writer.append_entry(&row("Tires", 10));
        writer.append_entry(&row("Frames", 20));
        drop(writer);

        let rows = read_log(&path, SCHEMA).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], row("Tires", 10));
        assert_eq!(rows[1], row("Frames", 20));
    }

    #[test]
    fn test_background_flush_without_shutdown() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("t.log");

        let config = WalConfig::new(&path).with_flush_interval(Duration::from_millis(1));
        let writer = WalWriter::open(config).unwrap();
        writer.append_entry(&row("k", 1));

        // Give the background thread a few intervals to flush
        std::thread::sleep(Duration::from_millis(50));
        let rows = read_log(&path, SCHEMA).unwrap();
        assert_eq!(rows.len(), 1);

        drop(writer);
    }

    #[test]
    fn test_truncate_mode_clears_old_records() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("t.log");

        let writer = WalWriter::open(WalConfig::new(&path)).unwrap();
        writer.append_entry(&row("old", 1));
        drop(writer);

        let writer = WalWriter::open(WalConfig::new(&path)).unwrap();
        writer.append_entry(&row("new", 2));
        drop(writer);

        let rows = read_log(&path, SCHEMA).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], row("new", 2));
    }

    #[test]
    fn test_append_mode_preserves_old_records() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("t.log");

        let writer = WalWriter::open(WalConfig::new(&path)).unwrap();
        writer.append_entry(&row("first", 1));
        drop(writer);

        let writer = WalWriter::open(WalConfig::new(&path).with_truncate(false)).unwrap();
        writer.append_entry(&row("second", 2));
        drop(writer);

        let rows = read_log(&path, SCHEMA).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], row("first", 1));
        assert_eq!(rows[1], row("second", 2));
    }

    #[test]
    fn test_concurrent_producers() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("t.log");

        let writer = Arc::new(WalWriter::open(WalConfig::new(&path)).unwrap());
        let threads = 4;
        let per_thread = 500;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let writer = Arc::clone(&writer);
                std::thread::spawn(move || {
                    for i in 0..per_thread {
                        writer.append_entry(&row(&format!("k{t}"), i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        drop(Arc::try_unwrap(writer).ok().expect("sole owner"));

        let rows = read_log(&path, SCHEMA).unwrap();
        assert_eq!(rows.len(), threads * per_thread as usize);
    }
}

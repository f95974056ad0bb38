//! # strata-wal
//!
//! The asynchronous binary write-ahead log for StrataDB.
//!
//! Producers serialize row records into an in-memory ingest buffer; a
//! background thread swaps that buffer out on a short timer and writes the
//! drained bytes to the log file in one batch, flushing once per batch.
//! Durability is therefore best-effort with a bound of one flush interval,
//! and background write failures never propagate to producers.
//!
//! The on-disk format is little-endian with no framing, no per-record
//! length, and no checksum: cells are emitted in schema order, an INT cell
//! as 8 bytes and a STRING cell as a 4-byte signed length followed by the
//! raw payload. Replay streams complete records until end-of-file and
//! silently discards a torn tail.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod reader;
pub mod record;
pub mod writer;

pub use config::WalConfig;
pub use error::{WalError, WalResult};
pub use reader::read_log;
pub use writer::WalWriter;

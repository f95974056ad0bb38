//! System-wide constants for StrataDB.
//!
//! This module defines the compile-time geometry of the column store,
//! the index fan-out, and the write-ahead log timing.

// =============================================================================
// Chunk Geometry
// =============================================================================

/// Number of cells in one column chunk.
///
/// Every column and the MVCC metadata share this geometry, so a row index
/// maps to the same (chunk, offset) pair everywhere. Allocation contention
/// on the append path is bounded to one event per `CHUNK_SIZE` rows per
/// column.
pub const CHUNK_SIZE: usize = 100_000;

/// Maximum number of chunk slots per column.
///
/// Slots are pointer-sized and pre-sized at column creation; chunks behind
/// them are allocated lazily on first write and never freed or resized.
pub const MAX_CHUNKS: usize = 4096;

/// Maximum number of rows a table can hold.
pub const MAX_ROWS: u64 = (CHUNK_SIZE * MAX_CHUNKS) as u64;

// =============================================================================
// Index
// =============================================================================

/// Number of independently locked partitions in the equality index.
///
/// Shard fan-out well above the expected writer count keeps lock
/// contention negligible for the short insert/probe critical sections.
pub const INDEX_SHARDS: usize = 1024;

// =============================================================================
// Write-Ahead Log
// =============================================================================

/// Interval between background log flushes, in milliseconds.
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 10;

/// Initial capacity of the log ingest buffer in bytes (64 KB).
pub const LOG_BUFFER_CAPACITY: usize = 64 * 1024;

/// File extension of a table's log file.
pub const LOG_FILE_EXTENSION: &str = "log";

// =============================================================================
// MVCC
// =============================================================================

/// Creation-timestamp sentinel meaning "not yet created".
///
/// A row is committed iff its creation timestamp is below this value.
pub const TS_INFINITY: u64 = u64::MAX;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_geometry() {
        assert!(CHUNK_SIZE > 0);
        assert!(MAX_CHUNKS > 0);
        assert_eq!(MAX_ROWS, CHUNK_SIZE as u64 * MAX_CHUNKS as u64);
    }

    #[test]
    fn test_shard_count() {
        // Power-of-two fan-out keeps the modulo cheap
        assert!(INDEX_SHARDS.is_power_of_two());
    }

    #[test]
    fn test_infinity_is_max() {
        assert_eq!(TS_INFINITY, u64::MAX);
    }
}

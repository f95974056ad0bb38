//! Core identifier types for StrataDB.
//!
//! These types provide type-safe wrappers around numeric identifiers,
//! preventing accidental misuse of different ID types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Row identifier - the dense physical index of a row within a table.
///
/// Row indices are claimed from an atomic tail cursor on insert and are
/// never reused. They define the positional layout used by the chunked
/// column store and by the write-ahead log.
///
/// # Example
///
/// ```rust
/// use strata_common::types::RowId;
///
/// let row = RowId::new(42);
/// assert_eq!(row.as_u64(), 42);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct RowId(u64);

impl RowId {
    /// First row index in any table.
    pub const FIRST: Self = Self(0);

    /// Creates a new `RowId` from a raw u64 value.
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw u64 value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the raw value as a usize for direct slot arithmetic.
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Returns the chunk index containing this row.
    #[inline]
    #[must_use]
    pub const fn chunk_index(self, chunk_size: usize) -> usize {
        (self.0 as usize) / chunk_size
    }

    /// Returns the cell offset of this row within its chunk.
    #[inline]
    #[must_use]
    pub const fn chunk_offset(self, chunk_size: usize) -> usize {
        (self.0 as usize) % chunk_size
    }

    /// Returns the next row index.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Debug for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowId({})", self.0)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RowId {
    #[inline]
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<RowId> for u64 {
    #[inline]
    fn from(id: RowId) -> Self {
        id.0
    }
}

/// Transaction identifier - a value drawn from a table's logical clock.
///
/// The logical clock advances by one on every insert, so transaction IDs
/// totally order row publication. `TxId` doubles as the MVCC creation
/// timestamp: a row is visible to a query iff its `TxId` is finite and at
/// most the query's sampled clock value.
///
/// # Example
///
/// ```rust
/// use strata_common::types::TxId;
///
/// let tx = TxId::new(7);
/// assert!(tx.is_committed());
/// assert!(!TxId::INFINITY.is_committed());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TxId(u64);

impl TxId {
    /// Sentinel meaning "not yet created"; rows carrying it are invisible.
    pub const INFINITY: Self = Self(u64::MAX);

    /// First transaction ID a table's clock hands out.
    pub const FIRST: Self = Self(1);

    /// Creates a new `TxId` from a raw u64 value.
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw u64 value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Checks whether this timestamp marks a committed row.
    #[inline]
    #[must_use]
    pub const fn is_committed(self) -> bool {
        self.0 != Self::INFINITY.0
    }

    /// Visibility test against a sampled query timestamp.
    #[inline]
    #[must_use]
    pub const fn is_visible_at(self, query_ts: u64) -> bool {
        self.is_committed() && self.0 <= query_ts
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INFINITY {
            write!(f, "TxId(INFINITY)")
        } else {
            write!(f, "TxId({})", self.0)
        }
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TxId {
    #[inline]
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<TxId> for u64 {
    #[inline]
    fn from(id: TxId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_id() {
        let row = RowId::new(42);
        assert_eq!(row.as_u64(), 42);
        assert_eq!(row.next().as_u64(), 43);

        // Chunk arithmetic
        let row = RowId::new(250_001);
        assert_eq!(row.chunk_index(100_000), 2);
        assert_eq!(row.chunk_offset(100_000), 50_001);
    }

    #[test]
    fn test_row_id_chunk_boundary() {
        assert_eq!(RowId::new(99_999).chunk_index(100_000), 0);
        assert_eq!(RowId::new(100_000).chunk_index(100_000), 1);
        assert_eq!(RowId::new(100_000).chunk_offset(100_000), 0);
    }

    #[test]
    fn test_tx_id_visibility() {
        let tx = TxId::new(5);
        assert!(tx.is_committed());
        assert!(tx.is_visible_at(5));
        assert!(tx.is_visible_at(10));
        assert!(!tx.is_visible_at(4));

        assert!(!TxId::INFINITY.is_committed());
        assert!(!TxId::INFINITY.is_visible_at(u64::MAX));
    }

    #[test]
    fn test_ordering() {
        assert!(RowId::new(1) < RowId::new(2));
        assert!(TxId::new(1) < TxId::new(2));
        assert!(TxId::new(u64::MAX - 1) < TxId::INFINITY);
    }
}

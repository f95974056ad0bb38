//! MVCC creation-timestamp metadata.
//!
//! A chunked array of 64-bit creation timestamps, parallel to the columns
//! and sharing their geometry. Cells start at infinity ("not yet
//! created"); the release-store in [`MvccMeta::set_created`] is the act of
//! publication that makes a row, and transitively all of its cell
//! writes, visible to readers.

use strata_common::constants::CHUNK_SIZE;
use strata_common::error::StrataResult;
use strata_common::types::{RowId, TxId};

use crate::chunk::{ChunkDirectory, TsChunk};

/// Per-row creation timestamps with the column store's chunk geometry.
pub struct MvccMeta {
    chunks: ChunkDirectory<TsChunk>,
}

impl MvccMeta {
    /// Creates empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunks: ChunkDirectory::new(),
        }
    }

    /// Idempotently allocates the chunk at `chunk_index`, with every cell
    /// initialised to infinity.
    pub fn ensure_chunk(&self, chunk_index: usize) -> StrataResult<()> {
        self.chunks.ensure(chunk_index, TsChunk::new)?;
        Ok(())
    }

    /// Publishes a row's creation timestamp (release-store).
    ///
    /// Must be the last step of the insert path: every cell write for the
    /// row has to happen before this call.
    pub fn set_created(&self, row: RowId, ts: TxId) {
        let chunk = self
            .chunks
            .get(row.chunk_index(CHUNK_SIZE))
            .expect("MVCC chunk must be ensured before publication");
        chunk.set(row.chunk_offset(CHUNK_SIZE), ts.as_u64());
    }

    /// Reads a row's creation timestamp (acquire-load).
    ///
    /// Rows whose chunk has not been allocated read as infinity, i.e. not
    /// yet created.
    #[must_use]
    pub fn get_created(&self, row: RowId) -> TxId {
        self.chunks
            .get(row.chunk_index(CHUNK_SIZE))
            .map_or(TxId::INFINITY, |chunk| {
                TxId::new(chunk.get(row.chunk_offset(CHUNK_SIZE)))
            })
    }

    /// Visibility test: committed and no later than the sampled query
    /// timestamp.
    #[must_use]
    pub fn is_visible(&self, row: RowId, query_ts: u64) -> bool {
        self.get_created(row).is_visible_at(query_ts)
    }

    /// Returns the number of allocated chunks.
    #[must_use]
    pub fn allocated_chunks(&self) -> usize {
        self.chunks.allocated()
    }
}

impl Default for MvccMeta {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncreated_rows_are_invisible() {
        let meta = MvccMeta::new();
        meta.ensure_chunk(0).unwrap();

        let row = RowId::new(0);
        assert_eq!(meta.get_created(row), TxId::INFINITY);
        assert!(!meta.is_visible(row, u64::MAX));
    }

    #[test]
    fn test_publication_makes_row_visible() {
        let meta = MvccMeta::new();
        meta.ensure_chunk(0).unwrap();

        let row = RowId::new(42);
        meta.set_created(row, TxId::new(7));

        assert_eq!(meta.get_created(row), TxId::new(7));
        assert!(meta.is_visible(row, 7));
        assert!(meta.is_visible(row, 100));
        // Committed after the sampled timestamp: invisible
        assert!(!meta.is_visible(row, 6));
    }

    #[test]
    fn test_unallocated_chunk_reads_infinity() {
        let meta = MvccMeta::new();
        assert_eq!(meta.get_created(RowId::new(1_000_000)), TxId::INFINITY);
        assert!(!meta.is_visible(RowId::new(1_000_000), u64::MAX));
    }

    #[test]
    fn test_ensure_chunk_idempotent() {
        let meta = MvccMeta::new();
        meta.ensure_chunk(2).unwrap();
        meta.ensure_chunk(2).unwrap();
        assert_eq!(meta.allocated_chunks(), 1);
    }
}

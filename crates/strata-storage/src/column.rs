//! Typed chunked columns.
//!
//! A column is one of two parallel specializations chosen by the column
//! type; [`ColumnData`] is the tagged pair the table engine works with.
//! The shared surface is small: `ensure_chunk`, `set`, `get`.

use bytes::Bytes;

use strata_common::constants::CHUNK_SIZE;
use strata_common::error::{StrataError, StrataResult};
use strata_common::types::{ColumnType, RowId, Value};

use crate::chunk::{ChunkDirectory, IntChunk, StrChunk};

/// A chunked column of signed 64-bit integers.
pub struct IntColumn {
    chunks: ChunkDirectory<IntChunk>,
}

impl IntColumn {
    /// Creates an empty column.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunks: ChunkDirectory::new(),
        }
    }

    /// Idempotently allocates the chunk at `chunk_index`.
    pub fn ensure_chunk(&self, chunk_index: usize) -> StrataResult<()> {
        self.chunks.ensure(chunk_index, IntChunk::new)?;
        Ok(())
    }

    /// Writes a cell. The enclosing chunk must have been ensured, and the
    /// caller must own the row index.
    pub fn set(&self, row: RowId, value: i64) {
        let chunk = self
            .chunks
            .get(row.chunk_index(CHUNK_SIZE))
            .expect("chunk must be ensured before set");
        chunk.set(row.chunk_offset(CHUNK_SIZE), value);
    }

    /// Reads a cell; zero if the chunk or cell was never written.
    #[must_use]
    pub fn get(&self, row: RowId) -> i64 {
        self.chunks
            .get(row.chunk_index(CHUNK_SIZE))
            .map_or(0, |chunk| chunk.get(row.chunk_offset(CHUNK_SIZE)))
    }

    /// Returns the number of allocated chunks.
    #[must_use]
    pub fn allocated_chunks(&self) -> usize {
        self.chunks.allocated()
    }
}

impl Default for IntColumn {
    fn default() -> Self {
        Self::new()
    }
}

/// A chunked column of opaque byte-strings.
pub struct StringColumn {
    chunks: ChunkDirectory<StrChunk>,
}

impl StringColumn {
    /// Creates an empty column.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunks: ChunkDirectory::new(),
        }
    }

    /// Idempotently allocates the chunk at `chunk_index`.
    pub fn ensure_chunk(&self, chunk_index: usize) -> StrataResult<()> {
        self.chunks.ensure(chunk_index, StrChunk::new)?;
        Ok(())
    }

    /// Writes a cell. The enclosing chunk must have been ensured, and the
    /// caller must own the row index.
    pub fn set(&self, row: RowId, value: Bytes) {
        let chunk = self
            .chunks
            .get(row.chunk_index(CHUNK_SIZE))
            .expect("chunk must be ensured before set");
        chunk.set(row.chunk_offset(CHUNK_SIZE), value);
    }

    /// Reads a cell; empty bytes if the chunk or cell was never written.
    #[must_use]
    pub fn get(&self, row: RowId) -> Bytes {
        self.chunks
            .get(row.chunk_index(CHUNK_SIZE))
            .and_then(|chunk| chunk.get(row.chunk_offset(CHUNK_SIZE)))
            .unwrap_or_else(Bytes::new)
    }

    /// Returns the number of allocated chunks.
    #[must_use]
    pub fn allocated_chunks(&self) -> usize {
        self.chunks.allocated()
    }
}

impl Default for StringColumn {
    fn default() -> Self {
        Self::new()
    }
}

/// The typed pair the table engine stores per column.
pub enum ColumnData {
    /// An integer column.
    Int(IntColumn),
    /// A byte-string column.
    Str(StringColumn),
}

impl ColumnData {
    /// Creates an empty column of the given type.
    #[must_use]
    pub fn new(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Int => Self::Int(IntColumn::new()),
            ColumnType::Str => Self::Str(StringColumn::new()),
        }
    }

    /// Returns this column's type.
    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        match self {
            Self::Int(_) => ColumnType::Int,
            Self::Str(_) => ColumnType::Str,
        }
    }

    /// Idempotently allocates the chunk at `chunk_index`.
    pub fn ensure_chunk(&self, chunk_index: usize) -> StrataResult<()> {
        match self {
            Self::Int(col) => col.ensure_chunk(chunk_index),
            Self::Str(col) => col.ensure_chunk(chunk_index),
        }
    }

    /// Writes a cell, failing on a variant mismatch.
    pub fn set(&self, row: RowId, value: &Value) -> StrataResult<()> {
        match (self, value) {
            (Self::Int(col), Value::Int(v)) => {
                col.set(row, *v);
                Ok(())
            }
            (Self::Str(col), Value::Str(b)) => {
                col.set(row, b.clone());
                Ok(())
            }
            _ => Err(StrataError::TypeMismatch {
                expected: self.column_type(),
                actual: value.column_type(),
            }),
        }
    }

    /// Reads a cell as a [`Value`].
    #[must_use]
    pub fn get(&self, row: RowId) -> Value {
        match self {
            Self::Int(col) => Value::Int(col.get(row)),
            Self::Str(col) => Value::Str(col.get(row)),
        }
    }

    /// Returns the number of allocated chunks.
    #[must_use]
    pub fn allocated_chunks(&self) -> usize {
        match self {
            Self::Int(col) => col.allocated_chunks(),
            Self::Str(col) => col.allocated_chunks(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_column_round_trip() {
        let col = IntColumn::new();
        col.ensure_chunk(0).unwrap();
        col.set(RowId::new(0), 100);
        col.set(RowId::new(1), -5);
        assert_eq!(col.get(RowId::new(0)), 100);
        assert_eq!(col.get(RowId::new(1)), -5);
    }

    #[test]
    fn test_string_column_round_trip() {
        let col = StringColumn::new();
        col.ensure_chunk(0).unwrap();
        col.set(RowId::new(3), Bytes::from_static(b"Frames"));
        assert_eq!(col.get(RowId::new(3)).as_ref(), b"Frames");
        // Unwritten cells read as empty
        assert!(col.get(RowId::new(4)).is_empty());
    }

    #[test]
    fn test_chunk_boundary_allocation() {
        let col = IntColumn::new();
        col.ensure_chunk(0).unwrap();
        col.set(RowId::new(CHUNK_SIZE as u64 - 1), 1);
        assert_eq!(col.allocated_chunks(), 1);

        col.ensure_chunk(1).unwrap();
        col.set(RowId::new(CHUNK_SIZE as u64), 2);
        assert_eq!(col.allocated_chunks(), 2);

        assert_eq!(col.get(RowId::new(CHUNK_SIZE as u64 - 1)), 1);
        assert_eq!(col.get(RowId::new(CHUNK_SIZE as u64)), 2);
    }

    #[test]
    fn test_column_data_dispatch() {
        let col = ColumnData::new(ColumnType::Int);
        col.ensure_chunk(0).unwrap();
        col.set(RowId::new(0), &Value::Int(7)).unwrap();
        assert_eq!(col.get(RowId::new(0)), Value::Int(7));

        let err = col.set(RowId::new(1), &Value::from("oops")).unwrap_err();
        assert!(matches!(err, StrataError::TypeMismatch { .. }));
    }

    #[test]
    fn test_get_on_unallocated_chunk() {
        let col = ColumnData::new(ColumnType::Str);
        assert_eq!(col.get(RowId::new(500_000)), Value::Str(Bytes::new()));
    }
}

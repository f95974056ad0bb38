//! Lazy chunk allocation shared by columns and the MVCC metadata.
//!
//! A `ChunkDirectory` owns a fixed array of `MAX_CHUNKS` slots. Each slot
//! is an atomic pointer to a heap-allocated chunk, null until the first
//! write into that chunk's row range. Publication uses the double-checked
//! pattern: an acquire-load fast path, then the directory's allocation
//! mutex and a re-check before the release-store that makes the chunk
//! visible to other threads.

use std::cell::UnsafeCell;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicI64, AtomicPtr, AtomicU64, Ordering};

use bytes::Bytes;
use parking_lot::Mutex;

use strata_common::constants::{CHUNK_SIZE, MAX_CHUNKS, MAX_ROWS, TS_INFINITY};
use strata_common::error::{StrataError, StrataResult};

/// A fixed directory of lazily allocated chunk slots.
pub(crate) struct ChunkDirectory<C> {
    /// One atomic pointer per chunk slot; null means "not yet allocated".
    slots: Box<[AtomicPtr<C>]>,
    /// Serializes allocation; held only while installing a new chunk.
    alloc_lock: Mutex<()>,
    /// The directory logically owns the chunks behind the raw pointers.
    _owns: PhantomData<Box<C>>,
}

impl<C> ChunkDirectory<C> {
    /// Creates a directory with `MAX_CHUNKS` empty slots.
    pub(crate) fn new() -> Self {
        let slots = (0..MAX_CHUNKS)
            .map(|_| AtomicPtr::new(std::ptr::null_mut()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            slots,
            alloc_lock: Mutex::new(()),
            _owns: PhantomData,
        }
    }

    /// Returns the chunk at `chunk_index`, if allocated.
    #[inline]
    pub(crate) fn get(&self, chunk_index: usize) -> Option<&C> {
        let ptr = self.slots.get(chunk_index)?.load(Ordering::Acquire);
        if ptr.is_null() {
            None
        } else {
            // Safety: a non-null slot was published with release after the
            // chunk was fully constructed, and chunks are never freed while
            // the directory is alive.
            Some(unsafe { &*ptr })
        }
    }

    /// Idempotently installs a chunk at `chunk_index`.
    ///
    /// The fast path is a single acquire-load; allocation itself happens
    /// at most once per slot, under the directory's mutex, with a re-check
    /// so racing callers agree on one chunk.
    pub(crate) fn ensure(&self, chunk_index: usize, init: impl FnOnce() -> C) -> StrataResult<&C> {
        let slot = self
            .slots
            .get(chunk_index)
            .ok_or(StrataError::CapacityExceeded {
                row: chunk_index as u64 * CHUNK_SIZE as u64,
                max_rows: MAX_ROWS,
            })?;

        let ptr = slot.load(Ordering::Acquire);
        if !ptr.is_null() {
            // Safety: see `get`.
            return Ok(unsafe { &*ptr });
        }

        let _guard = self.alloc_lock.lock();

        // Re-check under the lock; another writer may have won the race.
        let ptr = slot.load(Ordering::Relaxed);
        if !ptr.is_null() {
            // Safety: see `get`.
            return Ok(unsafe { &*ptr });
        }

        let chunk = Box::into_raw(Box::new(init()));
        slot.store(chunk, Ordering::Release);

        // Safety: we just installed this pointer and still hold &self.
        Ok(unsafe { &*chunk })
    }

    /// Returns the number of allocated chunks.
    pub(crate) fn allocated(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| !slot.load(Ordering::Acquire).is_null())
            .count()
    }
}

impl<C> Drop for ChunkDirectory<C> {
    fn drop(&mut self) {
        for slot in self.slots.iter_mut() {
            let ptr = *slot.get_mut();
            if !ptr.is_null() {
                // Safety: each non-null pointer came from Box::into_raw in
                // `ensure` and is dropped exactly once, here.
                drop(unsafe { Box::from_raw(ptr) });
            }
        }
    }
}

/// A chunk of signed 64-bit integer cells.
///
/// Cells use relaxed atomics: each cell has exactly one writer, and the
/// reader-side happens-before edge comes from the MVCC publication, not
/// from the cell itself.
#[derive(Debug)]
pub(crate) struct IntChunk {
    cells: Box<[AtomicI64]>,
}

impl IntChunk {
    pub(crate) fn new() -> Self {
        let cells = (0..CHUNK_SIZE)
            .map(|_| AtomicI64::new(0))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { cells }
    }

    #[inline]
    pub(crate) fn set(&self, offset: usize, value: i64) {
        self.cells[offset].store(value, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn get(&self, offset: usize) -> i64 {
        self.cells[offset].load(Ordering::Relaxed)
    }
}

/// A chunk of opaque byte-string cells.
///
/// Cells are plain (non-atomic) slots. The single-writer-per-cell
/// contract plus the MVCC publication edge make reads of committed rows
/// race-free.
pub(crate) struct StrChunk {
    cells: Box<[UnsafeCell<Option<Bytes>>]>,
}

impl StrChunk {
    pub(crate) fn new() -> Self {
        let cells = (0..CHUNK_SIZE)
            .map(|_| UnsafeCell::new(None))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { cells }
    }

    /// Writes a cell. The caller must be the row's sole writer and must
    /// not have published the row yet.
    #[inline]
    pub(crate) fn set(&self, offset: usize, value: Bytes) {
        // Safety: the tail cursor hands each row index to exactly one
        // writer, so no other thread writes this cell; readers only touch
        // it after observing the row's creation timestamp, which is
        // published with release after this write.
        unsafe { *self.cells[offset].get() = Some(value) };
    }

    /// Reads a cell; `None` if the cell was never written.
    #[inline]
    pub(crate) fn get(&self, offset: usize) -> Option<Bytes> {
        // Safety: committed rows are immutable, and the acquire-load of
        // the creation timestamp ordered this read after the write.
        unsafe { (*self.cells[offset].get()).clone() }
    }
}

// Safety: StrChunk is shared across threads under the single-writer-per-cell
// contract; cross-thread visibility is established by the MVCC
// release/acquire publication.
unsafe impl Sync for StrChunk {}
unsafe impl Send for StrChunk {}

/// A chunk of creation-timestamp cells, initialised to infinity.
pub(crate) struct TsChunk {
    cells: Box<[AtomicU64]>,
}

impl TsChunk {
    pub(crate) fn new() -> Self {
        let cells = (0..CHUNK_SIZE)
            .map(|_| AtomicU64::new(TS_INFINITY))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { cells }
    }

    /// The publication write: release order pairs with `get`'s acquire.
    #[inline]
    pub(crate) fn set(&self, offset: usize, ts: u64) {
        self.cells[offset].store(ts, Ordering::Release);
    }

    #[inline]
    pub(crate) fn get(&self, offset: usize) -> u64 {
        self.cells[offset].load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_ensure_is_idempotent() {
        let dir: ChunkDirectory<IntChunk> = ChunkDirectory::new();
        assert_eq!(dir.allocated(), 0);

        let first = dir.ensure(0, IntChunk::new).unwrap() as *const IntChunk;
        let second = dir.ensure(0, IntChunk::new).unwrap() as *const IntChunk;
        assert_eq!(first, second);
        assert_eq!(dir.allocated(), 1);
    }

    #[test]
    fn test_get_before_ensure() {
        let dir: ChunkDirectory<IntChunk> = ChunkDirectory::new();
        assert!(dir.get(0).is_none());
        dir.ensure(3, IntChunk::new).unwrap();
        assert!(dir.get(0).is_none());
        assert!(dir.get(3).is_some());
    }

    #[test]
    fn test_ensure_out_of_range() {
        let dir: ChunkDirectory<IntChunk> = ChunkDirectory::new();
        let err = dir.ensure(MAX_CHUNKS, IntChunk::new).unwrap_err();
        assert!(matches!(err, StrataError::CapacityExceeded { .. }));
    }

    #[test]
    fn test_concurrent_ensure_single_allocation() {
        let dir: Arc<ChunkDirectory<IntChunk>> = Arc::new(ChunkDirectory::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let dir = Arc::clone(&dir);
                thread::spawn(move || dir.ensure(1, IntChunk::new).unwrap() as *const IntChunk as usize)
            })
            .collect();

        let ptrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ptrs.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(dir.allocated(), 1);
    }

    #[test]
    fn test_int_chunk_cells() {
        let chunk = IntChunk::new();
        assert_eq!(chunk.get(0), 0);
        chunk.set(7, -42);
        assert_eq!(chunk.get(7), -42);
        chunk.set(CHUNK_SIZE - 1, i64::MAX);
        assert_eq!(chunk.get(CHUNK_SIZE - 1), i64::MAX);
    }

    #[test]
    fn test_str_chunk_cells() {
        let chunk = StrChunk::new();
        assert!(chunk.get(0).is_none());
        chunk.set(5, Bytes::from_static(b"Tires"));
        assert_eq!(chunk.get(5).unwrap().as_ref(), b"Tires");
    }

    #[test]
    fn test_ts_chunk_starts_at_infinity() {
        let chunk = TsChunk::new();
        assert_eq!(chunk.get(0), TS_INFINITY);
        assert_eq!(chunk.get(CHUNK_SIZE - 1), TS_INFINITY);
        chunk.set(0, 12);
        assert_eq!(chunk.get(0), 12);
    }
}

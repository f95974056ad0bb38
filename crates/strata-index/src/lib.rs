//! # strata-index
//!
//! A sharded secondary index mapping byte-string values to the row
//! indices that carry them.
//!
//! The index is equality-only and multi-valued: a bucket holds every row
//! index ever inserted for its key, duplicates included, in shard-local
//! insertion order. Callers must not rely on bucket order; the query
//! fold resolves ties by creation timestamp, never by position.
//!
//! Shards are selected by key hash; each shard serializes its own readers
//! and writers with a mutex whose critical section is a single hash-map
//! insert or probe. With the shard fan-out well above the number of
//! contending threads, contention stays negligible.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use bytes::Bytes;
use parking_lot::Mutex;

use strata_common::constants::INDEX_SHARDS;
use strata_common::types::RowId;

/// One independently locked partition of the index.
struct Shard {
    map: Mutex<HashMap<Bytes, Vec<RowId>>>,
}

impl Shard {
    fn new() -> Self {
        Self {
            map: Mutex::new(HashMap::new()),
        }
    }
}

/// A sharded value → row-indices equality index.
pub struct HashIndex {
    shards: Box<[Shard]>,
}

impl HashIndex {
    /// Creates an index with the default shard count.
    #[must_use]
    pub fn new() -> Self {
        Self::with_shards(INDEX_SHARDS)
    }

    /// Creates an index with an explicit shard count.
    #[must_use]
    pub fn with_shards(shard_count: usize) -> Self {
        assert!(shard_count > 0, "index must have at least one shard");
        let shards = (0..shard_count)
            .map(|_| Shard::new())
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { shards }
    }

    #[inline]
    fn shard_for(&self, key: &[u8]) -> &Shard {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let idx = (hasher.finish() as usize) % self.shards.len();
        &self.shards[idx]
    }

    /// Appends a posting for `key`. Duplicate values are expected and are
    /// not deduplicated.
    pub fn insert(&self, key: Bytes, row: RowId) {
        let shard = self.shard_for(&key);
        shard.map.lock().entry(key).or_default().push(row);
    }

    /// Copies out the bucket for `key`, or an empty list.
    #[must_use]
    pub fn lookup(&self, key: &[u8]) -> Vec<RowId> {
        let shard = self.shard_for(key);
        shard.map.lock().get(key).cloned().unwrap_or_default()
    }

    /// Returns the number of distinct keys across all shards.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.shards.iter().map(|s| s.map.lock().len()).sum()
    }
}

impl Default for HashIndex {
    fn default() -> Self {
        Self::new()
    }
}

//! # strata-storage
//!
//! The chunked column store and MVCC metadata for StrataDB.
//!
//! A column is a fixed-size directory of chunk slots; each slot points to
//! a contiguous block of `CHUNK_SIZE` cells, allocated lazily on first
//! write and published atomically so concurrent writers never observe a
//! half-built chunk. The MVCC metadata is a parallel chunked array of
//! creation timestamps with the same geometry.
//!
//! Cell writes carry no synchronization of their own: the table's tail
//! cursor hands each row index to exactly one writer, and the
//! release-store of the row's creation timestamp (the *publication*)
//! paired with acquire-loads on the read side makes all of the row's cell
//! writes visible to any reader that observes the row as committed.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod chunk;
pub mod column;
pub mod mvcc;

pub use column::{ColumnData, IntColumn, StringColumn};
pub use mvcc::MvccMeta;

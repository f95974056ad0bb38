//! Core types for StrataDB.
//!
//! This module provides the data-model types shared by the column store,
//! the index, the write-ahead log, and the table engine.

mod ids;
mod value;

pub use ids::{RowId, TxId};
pub use value::{AggType, ColumnSpec, ColumnType, Value};

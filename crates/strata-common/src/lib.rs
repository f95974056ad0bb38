//! # strata-common
//!
//! Common types, errors, and configuration for StrataDB.
//!
//! This crate provides the foundational types shared by every StrataDB
//! component. It includes:
//!
//! - **Types**: cell values (`Value`), column descriptors (`ColumnType`,
//!   `AggType`, `ColumnSpec`), and identifiers (`RowId`, `TxId`)
//! - **Errors**: unified error handling with `StrataError`
//! - **Config**: per-table runtime configuration (`TableConfig`)
//! - **Constants**: chunk geometry, index sharding, and log timing
//!
//! ## Example
//!
//! ```rust
//! use strata_common::types::{AggType, ColumnSpec, ColumnType, Value};
//! use strata_common::error::StrataResult;
//!
//! fn example() -> StrataResult<()> {
//!     let spec = ColumnSpec::new("Price", ColumnType::Int, AggType::Last);
//!     let cell = Value::Int(100);
//!     assert!(cell.matches(spec.column_type));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at the crate root
pub use config::TableConfig;
pub use constants::*;
pub use error::{StrataError, StrataResult};
pub use types::{AggType, ColumnSpec, ColumnType, RowId, TxId, Value};

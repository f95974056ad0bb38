//! # strata-engine
//!
//! The StrataDB table engine: schema management, the concurrent insert
//! path, snapshot queries with the hybrid LAST / SUM fold, and log-replay
//! recovery, plus a small [`Database`] catalog for the shell.
//!
//! ## Example
//!
//! ```rust
//! use strata_common::config::TableConfig;
//! use strata_common::types::{AggType, ColumnSpec, ColumnType, Value};
//! use strata_engine::Table;
//!
//! # fn main() -> strata_common::error::StrataResult<()> {
//! let dir = tempfile::tempdir().unwrap();
//! let table = Table::new(TableConfig::new("inventory").with_dir(dir.path()))?;
//! table.create_column(ColumnSpec::new("Product", ColumnType::Str, AggType::Last).indexed())?;
//! table.create_column(ColumnSpec::new("Price", ColumnType::Int, AggType::Last))?;
//! table.create_column(ColumnSpec::new("Stock", ColumnType::Int, AggType::Sum))?;
//!
//! table.insert(&[Value::from("Tires"), Value::Int(100), Value::Int(10)])?;
//! table.insert(&[Value::from("Tires"), Value::Int(120), Value::Int(3)])?;
//!
//! let row = table.query_snapshot("Product", &Value::from("Tires"))?;
//! assert_eq!(row["Price"], "120");
//! assert_eq!(row["Stock"], "13");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod database;
mod table;

pub use database::Database;
pub use table::{Table, TableStats};

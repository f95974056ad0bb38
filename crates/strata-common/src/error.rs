//! Error types for StrataDB.
//!
//! Core operations signal failure through typed results; there is no
//! exception-for-control-flow anywhere in the engine.

use std::fmt;
use std::io;
use thiserror::Error;

use crate::types::ColumnType;

/// Result type for StrataDB operations.
pub type StrataResult<T> = Result<T, StrataError>;

/// Error codes for categorizing errors.
///
/// These codes can be used for programmatic error handling and are stable
/// across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // General errors (0x0000 - 0x00FF)
    /// Invalid configuration supplied.
    InvalidConfig = 0x0001,

    // Schema errors (0x0100 - 0x01FF)
    /// Row shape does not match the table schema.
    SchemaMismatch = 0x0100,
    /// Value variant does not match the column type.
    TypeMismatch = 0x0101,
    /// Referenced column does not exist.
    UnknownColumn = 0x0102,
    /// Column name already declared.
    DuplicateColumn = 0x0103,
    /// Schema can no longer be changed.
    SchemaFrozen = 0x0104,
    /// Column declaration violates a typing rule.
    InvalidColumnSpec = 0x0105,

    // Storage errors (0x0200 - 0x02FF)
    /// Row index beyond the table's chunk capacity.
    CapacityExceeded = 0x0200,

    // Catalog errors (0x0300 - 0x03FF)
    /// Referenced table does not exist.
    TableNotFound = 0x0300,
    /// Table name already in use.
    TableExists = 0x0301,

    // I/O errors (0x0400 - 0x04FF)
    /// Log read or write failure.
    Io = 0x0400,
}

impl ErrorCode {
    /// Returns the numeric code.
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match (*self as u16) >> 8 {
            0x00 => "General",
            0x01 => "Schema",
            0x02 => "Storage",
            0x03 => "Catalog",
            0x04 => "I/O",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The main error type for StrataDB.
///
/// Each variant carries the context a caller needs to act on the failure.
#[derive(Debug, Error)]
pub enum StrataError {
    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong with the configuration.
        message: String,
    },

    /// Row arity or cell type wrong at insert; the row was not claimed.
    #[error("schema mismatch: {reason}")]
    SchemaMismatch {
        /// What about the row did not fit the schema.
        reason: String,
    },

    /// A value's variant does not match the column it is aimed at.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The column's declared type.
        expected: ColumnType,
        /// The type of the supplied value.
        actual: ColumnType,
    },

    /// Referenced column does not exist.
    #[error("column '{column}' not found in table '{table}'")]
    UnknownColumn {
        /// The missing column.
        column: String,
        /// The table that was queried.
        table: String,
    },

    /// Column name already declared on this table.
    #[error("column '{column}' already exists in table '{table}'")]
    DuplicateColumn {
        /// The duplicated column name.
        column: String,
        /// The table involved.
        table: String,
    },

    /// Columns cannot be added once rows have been inserted.
    #[error("schema of table '{table}' is frozen after the first insert")]
    SchemaFrozen {
        /// The table involved.
        table: String,
    },

    /// Column declaration violates a typing rule (SUM on STRING, index on
    /// INT).
    #[error("invalid column spec for '{column}': {reason}")]
    InvalidColumnSpec {
        /// The column involved.
        column: String,
        /// Which rule was violated.
        reason: String,
    },

    /// Row index beyond max-chunks x chunk-size; the table is read-only
    /// from this point on.
    #[error("capacity exceeded: row {row} beyond maximum {max_rows}")]
    CapacityExceeded {
        /// The row index that overflowed.
        row: u64,
        /// The table's fixed row capacity.
        max_rows: u64,
    },

    /// Referenced table does not exist.
    #[error("table '{table}' not found")]
    TableNotFound {
        /// The missing table.
        table: String,
    },

    /// Table name already in use.
    #[error("table '{table}' already exists")]
    TableExists {
        /// The duplicated table name.
        table: String,
    },

    /// I/O error from the log.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: io::Error,
    },
}

impl StrataError {
    /// Returns the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidConfig { .. } => ErrorCode::InvalidConfig,
            Self::SchemaMismatch { .. } => ErrorCode::SchemaMismatch,
            Self::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            Self::UnknownColumn { .. } => ErrorCode::UnknownColumn,
            Self::DuplicateColumn { .. } => ErrorCode::DuplicateColumn,
            Self::SchemaFrozen { .. } => ErrorCode::SchemaFrozen,
            Self::InvalidColumnSpec { .. } => ErrorCode::InvalidColumnSpec,
            Self::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            Self::TableNotFound { .. } => ErrorCode::TableNotFound,
            Self::TableExists { .. } => ErrorCode::TableExists,
            Self::Io { .. } => ErrorCode::Io,
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates a schema mismatch error.
    #[must_use]
    pub fn schema_mismatch(reason: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            reason: reason.into(),
        }
    }

    /// Creates an unknown column error.
    #[must_use]
    pub fn unknown_column(column: impl Into<String>, table: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
            table: table.into(),
        }
    }

    /// Creates an invalid column spec error.
    #[must_use]
    pub fn invalid_column_spec(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidColumnSpec {
            column: column.into(),
            reason: reason.into(),
        }
    }
}

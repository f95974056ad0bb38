//! Cell values and column descriptors.
//!
//! A StrataDB cell is a tagged union of a signed 64-bit integer and an
//! opaque byte-string. Columns are typed to one of the two variants and
//! carry an aggregation policy that the query fold applies when collapsing
//! many physical rows into one logical row.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The physical type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Signed 64-bit integer cells.
    Int,
    /// Opaque byte-string cells.
    Str,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "INT"),
            Self::Str => write!(f, "STRING"),
        }
    }
}

/// Per-column aggregation policy for the hybrid query fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggType {
    /// The logical value is that of the newest visible row, ordered by
    /// creation timestamp.
    Last,
    /// The logical value is the 64-bit signed sum over all visible rows.
    /// Only defined for [`ColumnType::Int`].
    Sum,
}

impl fmt::Display for AggType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Last => write!(f, "LAST"),
            Self::Sum => write!(f, "SUM"),
        }
    }
}

/// Declaration of a single column: name, type, aggregation policy, and
/// whether an equality index is maintained for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name, unique within a table.
    pub name: String,
    /// Physical cell type.
    pub column_type: ColumnType,
    /// Aggregation policy applied by the query fold.
    pub agg: AggType,
    /// Whether a secondary equality index is maintained. Only permitted on
    /// STRING columns.
    pub indexed: bool,
}

impl ColumnSpec {
    /// Creates an unindexed column spec.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType, agg: AggType) -> Self {
        Self {
            name: name.into(),
            column_type,
            agg,
            indexed: false,
        }
    }

    /// Marks the column as indexed.
    #[must_use]
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }
}

/// A single cell value.
///
/// Byte-strings are carried as [`Bytes`]: no encoding is imposed and
/// payloads round-trip verbatim through the column store and the log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// A signed 64-bit integer.
    Int(i64),
    /// An opaque byte-string.
    Str(Bytes),
}

impl Value {
    /// Returns the column type this value inhabits.
    #[inline]
    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        match self {
            Self::Int(_) => ColumnType::Int,
            Self::Str(_) => ColumnType::Str,
        }
    }

    /// Checks whether this value matches the given column type.
    #[inline]
    #[must_use]
    pub const fn matches(&self, column_type: ColumnType) -> bool {
        matches!(
            (self, column_type),
            (Self::Int(_), ColumnType::Int) | (Self::Str(_), ColumnType::Str)
        )
    }

    /// Returns the integer payload, if this is an INT value.
    #[inline]
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Str(_) => None,
        }
    }

    /// Returns the byte-string payload, if this is a STRING value.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Int(_) => None,
            Self::Str(b) => Some(b),
        }
    }

    /// Renders the value for query results and the shell.
    ///
    /// Integers print in decimal; byte-strings are decoded lossily as
    /// UTF-8 for display purposes only (storage stays verbatim).
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Str(b) => String::from_utf8_lossy(b).into_owned(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Self::Str(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Self::Str(Bytes::from(s))
    }
}

impl From<Bytes> for Value {
    #[inline]
    fn from(b: Bytes) -> Self {
        Self::Str(b)
    }
}

//! Write-ahead log error types.

use std::io;
use thiserror::Error;

use strata_common::error::StrataError;

/// Result type for WAL operations.
pub type WalResult<T> = Result<T, WalError>;

/// Errors that can occur during WAL operations.
///
/// A torn tail (end-of-file in the middle of a record) is deliberately not
/// represented here: replay drops the partial record silently, because it
/// is the expected trace of a crash between buffer swap and flush.
#[derive(Debug, Error)]
pub enum WalError {
    /// I/O error while reading or writing the log file.
    #[error("log I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: io::Error,
    },
}

impl From<WalError> for StrataError {
    fn from(err: WalError) -> Self {
        match err {
            WalError::Io { source } => Self::Io { source },
        }
    }
}

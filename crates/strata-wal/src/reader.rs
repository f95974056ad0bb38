//! Log replay reader.

use std::io::Read;
use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use strata_common::types::{ColumnType, Value};

use crate::error::WalResult;
use crate::record::decode_row;

/// Reads every complete row record from the log at `path`.
///
/// The schema must be the one the records were written with, in the same
/// column order. Rows are returned in file order, which equals their
/// publication order before the crash. End-of-file between records is
/// normal termination; a torn tail (the file ending mid-record) is
/// discarded silently, as it represents a write that crashed before full
/// persistence.
///
/// A missing file reads as an empty log.
pub fn read_log(path: &Path, schema: &[ColumnType]) -> WalResult<Vec<Vec<Value>>> {
    // A zero-column schema encodes zero-length records; nothing to replay.
    if schema.is_empty() {
        return Ok(Vec::new());
    }

    let mut file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut raw = Vec::new();
    file.read_to_end(&mut raw)?;
    let total = raw.len();

    let mut buf = Bytes::from(raw);
    let mut rows = Vec::new();
    while let Some(row) = decode_row(&mut buf, schema) {
        rows.push(row);
    }

    if !buf.is_empty() {
        debug!(
            rows = rows.len(),
            torn_bytes = buf.len(),
            total_bytes = total,
            "discarded torn tail during log replay"
        );
    }

    Ok(rows)
}

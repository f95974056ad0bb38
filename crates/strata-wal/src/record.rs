//! Row record codec.
//!
//! One record is one row, cells in schema order, little-endian:
//!
//! - INT cell: 8 bytes, two's-complement signed integer.
//! - STRING cell: 4-byte signed length `n`, then `n` payload bytes,
//!   verbatim.
//!
//! There is no framing header, per-record length, or checksum; the schema
//! is supplied out-of-band at read time. A record that ends prematurely is
//! a torn tail, not an error.

use bytes::{Buf, BufMut, Bytes};

use strata_common::types::{ColumnType, Value};

/// Serializes one row into `buf`, cells in schema order.
pub fn encode_row(buf: &mut Vec<u8>, values: &[Value]) {
    for value in values {
        match value {
            Value::Int(v) => buf.put_i64_le(*v),
            Value::Str(b) => {
                buf.put_i32_le(b.len() as i32);
                buf.put_slice(b);
            }
        }
    }
}

/// Deserializes one row from the front of `buf` according to `schema`.
///
/// Returns `None` when the buffer holds less than a full record:
/// either clean end-of-file between records or a torn tail. Callers stop
/// reading at the first `None`.
pub fn decode_row(buf: &mut Bytes, schema: &[ColumnType]) -> Option<Vec<Value>> {
    let mut row = Vec::with_capacity(schema.len());

    for column_type in schema {
        match column_type {
            ColumnType::Int => {
                if buf.remaining() < 8 {
                    return None;
                }
                row.push(Value::Int(buf.get_i64_le()));
            }
            ColumnType::Str => {
                if buf.remaining() < 4 {
                    return None;
                }
                let len = buf.get_i32_le();
                if len < 0 || buf.remaining() < len as usize {
                    return None;
                }
                row.push(Value::Str(buf.copy_to_bytes(len as usize)));
            }
        }
    }

    Some(row)
}

//! Value codec for compressed columns
//!
//! Values of `TEXT_ZSTD` and `BLOB_ZSTD` columns are zstd-compressed one
//! value at a time, so rows stay independently readable.
//!
//! ## Stored forms
//! ```text
//! TEXT_ZSTD   TEXT                        value too small or incompressible
//!             BLOB [flag:u8][body...]     flag = ZSTD
//! BLOB_ZSTD   BLOB [flag:u8][body...]     flag = RAW or ZSTD
//! ```
//! The storage class tells a plain text value from a packed one; blob
//! columns always carry the flag byte.

use rusqlite::types::Value;

use crate::error::{ProfileError, Result};

use super::types::{ColumnType, SqlType};

/// Body is the value itself
pub const FLAG_RAW: u8 = 0;

/// Body is a zstd frame
pub const FLAG_ZSTD: u8 = 1;

/// Values shorter than this are never compressed
pub const MIN_COMPRESS_LEN: usize = 64;

/// Upper bound on a decompressed value
const MAX_VALUE_LEN: usize = 256 * 1024 * 1024;

/// Compress `raw`, returning the flagged form only when it is smaller
pub fn compress(raw: &[u8], level: i32) -> Result<Option<Vec<u8>>> {
    if raw.len() < MIN_COMPRESS_LEN {
        return Ok(None);
    }

    let body = zstd::bulk::compress(raw, level)?;
    if body.len() + 1 >= raw.len() {
        return Ok(None);
    }

    let mut packed = Vec::with_capacity(body.len() + 1);
    packed.push(FLAG_ZSTD);
    packed.extend_from_slice(&body);
    Ok(Some(packed))
}

/// Flagged form of `raw`, compressed when that makes it smaller
pub fn pack(raw: &[u8], level: i32) -> Result<Vec<u8>> {
    match compress(raw, level)? {
        Some(packed) => Ok(packed),
        None => {
            let mut packed = Vec::with_capacity(raw.len() + 1);
            packed.push(FLAG_RAW);
            packed.extend_from_slice(raw);
            Ok(packed)
        }
    }
}

/// Original bytes of a flagged value
pub fn unpack(stored: &[u8]) -> Result<Vec<u8>> {
    match stored.split_first() {
        Some((&FLAG_RAW, body)) => Ok(body.to_vec()),
        Some((&FLAG_ZSTD, body)) => Ok(zstd::bulk::decompress(body, MAX_VALUE_LEN)?),
        Some((flag, _)) => Err(ProfileError::Corrupt(format!(
            "unknown compression flag {}",
            flag
        ))),
        None => Err(ProfileError::Corrupt("empty compressed value".to_string())),
    }
}

/// Stored form of `value` in a column of type `column`
pub fn encode(value: Value, column: &ColumnType, level: i32) -> Result<Value> {
    if !column.compressed {
        return Ok(value);
    }

    let stored = match (column.sql, value) {
        (SqlType::Text, Value::Text(text)) => match compress(text.as_bytes(), level)? {
            Some(packed) => Value::Blob(packed),
            None => Value::Text(text),
        },
        (SqlType::Blob, Value::Blob(bytes)) => Value::Blob(pack(&bytes, level)?),
        (_, other) => other,
    };
    Ok(stored)
}

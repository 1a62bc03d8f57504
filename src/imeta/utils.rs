//! Low-level, bounds-checked byte slicing utilities.
//!
//! Every length and offset handed to these helpers comes from untrusted
//! input, so arithmetic is checked and out-of-range requests become
//! `TruncatedData` errors instead of panics.

use crate::imeta::types::error::{ImetaError, Result};

/// Returns `len` bytes of `buf` starting at the absolute `offset`.
pub fn slice_at<'a>(buf: &'a [u8], offset: u64, len: u64, context: &'static str) -> Result<&'a [u8]> {
    let available = buf.len() as u64;
    let end = offset.checked_add(len).ok_or(ImetaError::TruncatedData {
        context,
        needed: u64::MAX,
        available,
    })?;
    if end > available {
        return Err(ImetaError::TruncatedData {
            context,
            needed: end,
            available,
        });
    }
    Ok(&buf[offset as usize..end as usize])
}

/// Splits `len` bytes off the front of `reader` and advances it.
pub fn take<'a>(reader: &mut &'a [u8], len: usize, context: &'static str) -> Result<&'a [u8]> {
    if reader.len() < len {
        return Err(ImetaError::TruncatedData {
            context,
            needed: len as u64,
            available: reader.len() as u64,
        });
    }
    let (head, tail) = reader.split_at(len);
    *reader = tail;
    Ok(head)
}

/// Drops all trailing NUL bytes.
pub fn trim_trailing_nuls(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |pos| pos + 1);
    &bytes[..end]
}

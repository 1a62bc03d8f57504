//! The typed value codec.
//!
//! Maps a [`ValueType`] to its element width and decodes `count` elements
//! of that type from a byte slice in the active [`ByteOrder`]. Numeric
//! types yield a scalar when `count == 1` and a sequence otherwise; text
//! types yield a single string with trailing NULs stripped.

use log::trace;

use crate::imeta::codec::byte_order::ByteOrder;
use crate::imeta::types::error::{ImetaError, Result};
use crate::imeta::types::models::{Elements, Payload, Rational, SRational, Value, ValueType};
use crate::imeta::utils;

/// Total stored size of `count` elements of `value_type`, or `None` on overflow.
pub fn stored_size(value_type: ValueType, count: u32) -> Option<u64> {
    (value_type.width() as u64).checked_mul(count as u64)
}

/// Decodes `count` elements of `value_type` from the front of `data`.
///
/// `tag` is only used to give the error context. Fails with
/// `UnsupportedType` for zero-width types and `TruncatedData` when `data`
/// is shorter than the stored size.
pub fn read_value(
    tag: u16,
    value_type: ValueType,
    count: u32,
    order: ByteOrder,
    data: &[u8],
) -> Result<Value> {
    if value_type.width() == 0 {
        return Err(ImetaError::UnsupportedType {
            type_id: value_type as u16,
            tag,
        });
    }
    let size = stored_size(value_type, count).ok_or(ImetaError::TruncatedData {
        context: "tag value",
        needed: u64::MAX,
        available: data.len() as u64,
    })?;
    let bytes = utils::slice_at(data, 0, size, "tag value")?;
    let payload = decode_payload(value_type, count as usize, order, bytes);
    trace!("Decoded {} x{} ({} bytes)", value_type, count, size);
    Ok(Value {
        value_type,
        count,
        payload,
    })
}

/// Decodes exactly `count` elements from `bytes`, which must hold `width * count` bytes.
fn decode_payload(value_type: ValueType, count: usize, order: ByteOrder, bytes: &[u8]) -> Payload {
    match value_type {
        ValueType::None => Payload::None,
        ValueType::Ascii | ValueType::XmpText => {
            Payload::Text(String::from_utf8_lossy(utils::trim_trailing_nuls(bytes)).into_owned())
        }
        ValueType::Byte | ValueType::Undefined => Payload::Byte(Elements::from_vec(bytes.to_vec())),
        ValueType::SByte => Payload::SByte(Elements::from_vec(bytes.iter().map(|&b| b as i8).collect())),
        ValueType::Short => {
            let mut out = vec![0u16; count];
            order.read_u16_into(bytes, &mut out);
            Payload::Short(Elements::from_vec(out))
        }
        ValueType::SShort => {
            let mut out = vec![0i16; count];
            order.read_i16_into(bytes, &mut out);
            Payload::SShort(Elements::from_vec(out))
        }
        ValueType::Long => {
            let mut out = vec![0u32; count];
            order.read_u32_into(bytes, &mut out);
            Payload::Long(Elements::from_vec(out))
        }
        ValueType::SLong => {
            let mut out = vec![0i32; count];
            order.read_i32_into(bytes, &mut out);
            Payload::SLong(Elements::from_vec(out))
        }
        ValueType::Float => {
            let mut out = vec![0f32; count];
            order.read_f32_into(bytes, &mut out);
            Payload::Float(Elements::from_vec(out))
        }
        ValueType::Double => {
            let mut out = vec![0f64; count];
            order.read_f64_into(bytes, &mut out);
            Payload::Double(Elements::from_vec(out))
        }
        ValueType::Rational => Payload::Rational(Elements::from_vec(
            bytes
                .chunks_exact(8)
                .map(|pair| Rational {
                    num: order.read_u32(&pair[0..4]),
                    denom: order.read_u32(&pair[4..8]),
                })
                .collect(),
        )),
        ValueType::SRational => Payload::SRational(Elements::from_vec(
            bytes
                .chunks_exact(8)
                .map(|pair| SRational {
                    num: order.read_i32(&pair[0..4]),
                    denom: order.read_i32(&pair[4..8]),
                })
                .collect(),
        )),
    }
}

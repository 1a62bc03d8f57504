//! Legacy IPTC-IIM caption records.
//!
//! # Record Structure
//! ```text
//! [1 byte]  Tag marker (always 0x1C)
//! [1 byte]  Record number
//! [1 byte]  DataSet number
//! [2 bytes] Length (big-endian). With the top bit set, the low 15 bits
//!           give the number of following bytes that hold the real length.
//! [N bytes] Data
//! ```

use byteorder::{BigEndian, ByteOrder};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use log::{debug, trace};

use crate::imeta::types::error::{ImetaError, Result};
use crate::imeta::types::models::{Elements, GROUP_IPTC, IptcRecord, Metadata, Payload, TagId, Value, ValueType};
use crate::imeta::utils;

/// Sentinel byte starting every record.
pub const RECORD_TAG: u8 = 0x1C;
/// Escape sequence in dataset 1:90 declaring UTF-8 text.
const UTF8_CHARSET: &[u8] = b"\x1b%G";

/// Decodes a record stream into `(record, dataset, data)` triples.
///
/// The stream ends cleanly when the buffer is exhausted.
pub fn decode_records(data: &[u8]) -> Result<Vec<IptcRecord>> {
    let mut records = Vec::new();
    let mut reader = data;

    while !reader.is_empty() {
        let header = utils::take(&mut reader, 5, "IPTC record header")?;
        if header[0] != RECORD_TAG {
            return Err(ImetaError::MalformedRecord(format!(
                "unexpected tag in IPTC record ({:#04x})",
                header[0]
            )));
        }
        let record = header[1];
        let dataset = header[2];
        let raw_len = BigEndian::read_u16(&header[3..5]);

        let len = if raw_len & 0x8000 != 0 {
            read_extended_length(&mut reader, raw_len & 0x7FFF, record, dataset)?
        } else {
            raw_len as u64
        };

        let payload = utils::take(&mut reader, len as usize, "IPTC record data")?;
        trace!("IPTC rec {}, DS {}, {} bytes", record, dataset, payload.len());
        records.push(IptcRecord {
            record,
            dataset,
            data: payload.to_vec(),
        });
    }

    Ok(records)
}

/// Accumulates the big-endian extended length, never letting it exceed the
/// bytes left in the stream.
fn read_extended_length(reader: &mut &[u8], width: u16, record: u8, dataset: u8) -> Result<u64> {
    let len_bytes = utils::take(reader, width as usize, "IPTC extended length")?;
    let mut len: u64 = 0;
    for &b in len_bytes {
        len = (len << 8) | b as u64;
        if len > reader.len() as u64 {
            debug!("Bad extended length in IPTC rec {}, DS {}", record, dataset);
            return Err(ImetaError::TruncatedData {
                context: "IPTC extended dataset",
                needed: len,
                available: reader.len() as u64,
            });
        }
    }
    Ok(len)
}

/// Picks the text encoding declared by the envelope's coded character set.
fn text_encoding(records: &[IptcRecord]) -> &'static Encoding {
    let utf8 = records.iter().any(|r| {
        r.record == 1
            && r.dataset == 90
            && r.data.windows(UTF8_CHARSET.len()).any(|w| w == UTF8_CHARSET)
    });
    if utf8 { UTF_8 } else { WINDOWS_1252 }
}

/// Decodes a record stream and stores each record in the `Iptc` group.
///
/// Application records (2:x, except the binary record version 2:0) become
/// text values; everything else is kept as raw bytes.
pub fn add_records(meta: &mut Metadata, data: &[u8]) -> Result<()> {
    let records = decode_records(data)?;
    let encoding = text_encoding(&records);
    debug!("{} IPTC records, text encoding {}", records.len(), encoding.name());

    for rec in records {
        let count = rec.data.len() as u32;
        let value = if rec.record == 2 && rec.dataset != 0 {
            let (text, _, _) = encoding.decode(utils::trim_trailing_nuls(&rec.data));
            Value {
                value_type: ValueType::Ascii,
                count,
                payload: Payload::Text(text.into_owned()),
            }
        } else {
            Value {
                value_type: ValueType::Undefined,
                count,
                payload: Payload::Byte(Elements::from_vec(rec.data)),
            }
        };
        meta.insert(
            GROUP_IPTC,
            TagId::Dataset {
                record: rec.record,
                dataset: rec.dataset,
            },
            value,
        );
    }
    Ok(())
}

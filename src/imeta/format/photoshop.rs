//! Photoshop image resource blocks.
//!
//! # Block Structure
//! ```text
//! [4 bytes] Signature "8BIM"
//! [1 byte]  Version (0x04)
//! [1 byte]  Block id
//! [1 byte]  Name length L, then L name bytes; the name field (length byte
//!           included) is padded to an even size
//! [4 bytes] Payload length (big-endian)
//! [N bytes] Payload, followed by one zero pad byte when N is odd
//! ```

use byteorder::{BigEndian, ByteOrder};
use log::{debug, trace};

use crate::imeta::format::iptc;
use crate::imeta::types::error::{ImetaError, Result};
use crate::imeta::types::models::{Metadata, ResourceBlock, ResourceKind};
use crate::imeta::utils;

/// Prefixes of an APP13 segment carrying resource blocks.
pub const PHOTOSHOP_PREFIXES: [&[u8]; 2] = [b"Photoshop 3.0\0", b"Photoshop 2.5\0"];
/// Length of either APP13 prefix.
pub const PHOTOSHOP_PREFIX_LEN: usize = 14;
/// Signature starting every block.
pub const SIGNATURE: &[u8; 4] = b"8BIM";
/// Version byte following the signature.
pub const VERSION: u8 = 0x04;

fn has_header(reader: &[u8]) -> bool {
    reader.len() >= 5 && &reader[..4] == SIGNATURE && reader[4] == VERSION
}

/// Decodes consecutive resource blocks.
///
/// A block's declared payload length must account exactly for the bytes
/// that follow it: either the buffer ends there or another block starts.
/// After an odd payload, one zero pad byte is allowed in between.
pub fn decode_blocks(data: &[u8]) -> Result<Vec<ResourceBlock>> {
    if !has_header(data) {
        return Err(ImetaError::UnknownResourceHeader);
    }

    let mut blocks = Vec::new();
    let mut reader = data;
    loop {
        utils::take(&mut reader, 5, "resource block signature")?;
        let id = utils::take(&mut reader, 1, "resource block id")?[0];
        let name_len = *reader.first().ok_or(ImetaError::TruncatedData {
            context: "resource block name",
            needed: 1,
            available: 0,
        })? as usize;
        let name_field = (name_len + 1) + (name_len + 1) % 2;
        let name = utils::take(&mut reader, name_field, "resource block name")?;
        let size_bytes = utils::take(&mut reader, 4, "resource block length")?;
        let size = BigEndian::read_u32(size_bytes) as u64;

        let available = reader.len() as u64;
        if size > available {
            return Err(ImetaError::SizeMismatch {
                context: "resource block payload",
                expected: size,
                found: available,
            });
        }
        let payload = utils::take(&mut reader, size as usize, "resource block payload")?;
        let trailing = reader.len() as u64;
        // Only a zero byte after an odd payload is padding.
        if size % 2 == 1 && reader.first() == Some(&0) {
            utils::take(&mut reader, 1, "resource block padding")?;
        }
        trace!("Resource block {:#04x}: {} bytes", id, size);
        blocks.push(ResourceBlock {
            id,
            name: name[1..=name_len].to_vec(),
            data: payload.to_vec(),
        });

        if reader.is_empty() {
            return Ok(blocks);
        }
        if !has_header(reader) {
            return Err(ImetaError::SizeMismatch {
                context: "resource block payload",
                expected: size,
                found: size + trailing,
            });
        }
    }
}

/// Decodes the resource blocks of an APP13 payload (prefix removed).
///
/// IPTC blocks are decoded into the `Iptc` group; all blocks are recorded
/// in `Metadata::resources`, whose payloads external consumers can use.
pub fn add_resources(meta: &mut Metadata, data: &[u8]) -> Result<()> {
    for block in decode_blocks(data)? {
        match block.kind() {
            ResourceKind::Iptc => iptc::add_records(meta, &block.data)?,
            ResourceKind::Thumbnail => debug!("Thumbnail block ({} bytes)", block.data.len()),
            ResourceKind::IccProfile => debug!("ICC profile block ({} bytes)", block.data.len()),
            ResourceKind::Exif => debug!("EXIF block ({} bytes)", block.data.len()),
            ResourceKind::Xmp => debug!("XMP block ({} bytes)", block.data.len()),
            ResourceKind::Other(id) => trace!("Uninterpreted resource block {:#04x}", id),
        }
        meta.resources.push(block);
    }
    Ok(())
}

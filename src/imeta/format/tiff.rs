//! Offset-linked tag directories (IFDs) and the flat TIFF container.
//!
//! # Directory Structure
//! ```text
//! [2 bytes]       Entry count N
//! [N x 12 bytes]  Entries: tag (u16), type (u16), count (u32), value/offset (4 bytes)
//! [4 bytes]       Offset of the next directory (0 ends the chain)
//! ```
//!
//! All offsets are absolute within the buffer that holds the TIFF header,
//! so the reader always works on the complete buffer rather than a cursor.
//! A value whose stored size fits in 4 bytes lives inline in the entry;
//! larger values live at the offset held in those 4 bytes.

use std::collections::HashSet;
use std::io::SeekFrom;

use log::{debug, info, trace};

use crate::imeta::codec::byte_order::ByteOrder;
use crate::imeta::codec::value::{self, stored_size};
use crate::imeta::reader::ReadOptions;
use crate::imeta::types::error::{ImetaError, Result};
use crate::imeta::types::filetypes::{ImageFile, ReadSeek};
use crate::imeta::types::models::{
    Directory, GROUP_IMAGE, GROUP_PHOTO, Metadata, TagEntry, TagId, Value, ValueType,
};
use crate::imeta::utils;

/// TIFF version constant following the byte-order mark.
pub const TIFF_VERSION: u16 = 42;
/// Size of the TIFF header: mark, version, first directory offset.
pub const TIFF_HEADER_LEN: usize = 8;
/// Size of one directory entry in bytes.
pub const IFD_ENTRY_LEN: usize = 12;
/// Largest value stored inline in an entry.
pub const INLINE_VALUE_LEN: u64 = 4;
/// Tag whose value is the offset of the Exif sub-directory chain.
pub const TAG_EXIF_IFD_POINTER: u16 = 0x8769;
/// Directories visited per decode unless configured otherwise.
pub const DEFAULT_MAX_DIRECTORIES: usize = 256;

/// Parsed TIFF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    pub order: ByteOrder,
    pub first_ifd: u32,
}

/// Parses the 8-byte TIFF header at the start of `buf`.
pub fn read_header(buf: &[u8]) -> Result<TiffHeader> {
    let header = utils::slice_at(buf, 0, TIFF_HEADER_LEN as u64, "TIFF header")?;
    let order = ByteOrder::from_mark([header[0], header[1]]).ok_or_else(|| {
        ImetaError::BadByteOrderOrVersion(format!(
            "unknown TIFF byte align ({:#04x} {:#04x})",
            header[0], header[1]
        ))
    })?;
    let version = order.read_u16(&header[2..4]);
    if version != TIFF_VERSION {
        return Err(ImetaError::BadByteOrderOrVersion(format!(
            "unexpected TIFF version ({:#x})",
            version
        )));
    }
    let first_ifd = order.read_u32(&header[4..8]);
    trace!("TIFF header: order={:?}, first IFD at {:#x}", order, first_ifd);
    Ok(TiffHeader { order, first_ifd })
}

/// Reads a directory chain starting at `start` with a fresh cycle guard.
pub fn read_chain(buf: &[u8], order: ByteOrder, start: u32) -> Result<Vec<Directory>> {
    DirectoryReader::new(buf, order).read_chain(start)
}

/// Resolves a single entry's value against `buf`.
pub fn resolve(buf: &[u8], order: ByteOrder, entry: &TagEntry) -> Result<Value> {
    DirectoryReader::new(buf, order).resolve(entry)
}

/// Walks directory chains over one immutable buffer.
///
/// The set of visited offsets is shared by every chain read through the
/// same reader, so a sub-directory pointing back into its parent chain is
/// caught as well as a chain linking to itself.
#[derive(Debug)]
pub struct DirectoryReader<'a> {
    buf: &'a [u8],
    order: ByteOrder,
    visited: HashSet<u32>,
    max_directories: usize,
}

impl<'a> DirectoryReader<'a> {
    pub fn new(buf: &'a [u8], order: ByteOrder) -> Self {
        Self {
            buf,
            order,
            visited: HashSet::new(),
            max_directories: DEFAULT_MAX_DIRECTORIES,
        }
    }

    pub fn with_max_directories(mut self, max_directories: usize) -> Self {
        self.max_directories = max_directories;
        self
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Follows the `next` links from `start` until a zero offset.
    ///
    /// Fails with `DirectoryLoop` when an offset repeats or the directory
    /// limit is reached.
    pub fn read_chain(&mut self, start: u32) -> Result<Vec<Directory>> {
        let mut chain = Vec::new();
        let mut offset = start;
        while offset != 0 {
            if self.visited.len() >= self.max_directories || !self.visited.insert(offset) {
                return Err(ImetaError::DirectoryLoop { offset });
            }
            let directory = self.read_directory(offset)?;
            offset = directory.next;
            chain.push(directory);
        }
        Ok(chain)
    }

    /// Reads the directory at the absolute `offset`.
    pub fn read_directory(&self, offset: u32) -> Result<Directory> {
        let start = offset as u64;
        let count_bytes = utils::slice_at(self.buf, start, 2, "directory entry count")?;
        let count = self.order.read_u16(count_bytes);
        debug!("IFD at {:#x}: {} entries", offset, count);

        let table_len = count as u64 * IFD_ENTRY_LEN as u64;
        let table = utils::slice_at(self.buf, start + 2, table_len, "directory entries")?;
        let entries = table
            .chunks_exact(IFD_ENTRY_LEN)
            .map(|raw| TagEntry {
                tag: self.order.read_u16(&raw[0..2]),
                type_id: self.order.read_u16(&raw[2..4]),
                count: self.order.read_u32(&raw[4..8]),
                value_offset: [raw[8], raw[9], raw[10], raw[11]],
            })
            .collect();

        let next_bytes = utils::slice_at(self.buf, start + 2 + table_len, 4, "next directory offset")?;
        let next = self.order.read_u32(next_bytes);
        Ok(Directory {
            offset,
            entries,
            next,
        })
    }

    /// Decodes an entry's value, inline when it fits in 4 bytes and from
    /// its absolute offset otherwise.
    pub fn resolve(&self, entry: &TagEntry) -> Result<Value> {
        let value_type = ValueType::from_id(entry.type_id)
            .filter(|t| t.is_directory_type())
            .ok_or(ImetaError::UnsupportedType {
                type_id: entry.type_id,
                tag: entry.tag,
            })?;
        let size = stored_size(value_type, entry.count).ok_or(ImetaError::TruncatedData {
            context: "tag value",
            needed: u64::MAX,
            available: self.buf.len() as u64,
        })?;
        if size <= INLINE_VALUE_LEN {
            value::read_value(entry.tag, value_type, entry.count, self.order, &entry.value_offset)
        } else {
            let offset = self.order.read_u32(&entry.value_offset);
            let data = utils::slice_at(self.buf, offset as u64, size, "tag value")?;
            value::read_value(entry.tag, value_type, entry.count, self.order, data)
        }
    }

    /// Decodes every directory of the chain at `start` into `group`,
    /// descending into the Exif pointer's chain under the `Photo` group.
    pub fn scan_into(&mut self, meta: &mut Metadata, start: u32, group: &str) -> Result<()> {
        let chain = self.read_chain(start)?;
        for (i, directory) in chain.iter().enumerate() {
            debug!("{} IFD {}: {} tags", group, i, directory.entries.len());
            for entry in &directory.entries {
                let value = self.resolve(entry)?;
                trace!(
                    "{} tag {:#06x}, type {}, count {}, val = {}",
                    group, entry.tag, value.value_type, entry.count, value
                );
                let sub_ifd = if entry.tag == TAG_EXIF_IFD_POINTER {
                    Some(pointer_offset(&value)?)
                } else {
                    None
                };
                meta.insert(group, TagId::Numeric(entry.tag), value);
                if let Some(sub_ifd) = sub_ifd {
                    debug!("Exif sub-IFD at {:#x}", sub_ifd);
                    self.scan_into(meta, sub_ifd, GROUP_PHOTO)?;
                }
            }
        }
        Ok(())
    }
}

/// The offset held by a resolved pointer tag, which may be stored as any
/// single unsigned integer.
fn pointer_offset(value: &Value) -> Result<u32> {
    value.as_u32().ok_or_else(|| {
        ImetaError::malformed(format!(
            "Exif IFD pointer is not a single offset ({} x{})",
            value.value_type, value.count
        ))
    })
}

/// Decodes a complete TIFF-structured buffer (header included) into the
/// `Image` and `Photo` groups.
pub fn decode_buffer(meta: &mut Metadata, buf: &[u8], options: &ReadOptions) -> Result<()> {
    let header = read_header(buf)?;
    DirectoryReader::new(buf, header.order)
        .with_max_directories(options.max_directories)
        .scan_into(meta, header.first_ifd, GROUP_IMAGE)
}

/// A matched flat TIFF container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffFile {
    pub order: ByteOrder,
}

/// Recognizes a byte-order mark followed by the version constant.
pub fn detect(src: &mut dyn ReadSeek) -> Option<TiffFile> {
    let mut magic = [0u8; 4];
    src.read_exact(&mut magic).ok()?;
    let order = ByteOrder::from_mark([magic[0], magic[1]])?;
    (order.read_u16(&magic[2..4]) == TIFF_VERSION).then_some(TiffFile { order })
}

impl ImageFile for TiffFile {
    fn format(&self) -> &'static str {
        "TIFF"
    }

    fn read_meta(&self, meta: &mut Metadata, src: &mut dyn ReadSeek, options: &ReadOptions) -> Result<()> {
        // Offsets address the whole stream, so load it from the start.
        src.seek(SeekFrom::Start(0))?;
        let mut buf = Vec::new();
        src.read_to_end(&mut buf)?;
        info!("Decoding TIFF container ({} bytes, {:?})", buf.len(), self.order);
        decode_buffer(meta, &buf, options)
    }
}

//! Byte fixture builders shared by the integration tests.
#![allow(dead_code)]

use imeta_reader::ByteOrder;

pub type RawEntry = (u16, u16, u32, [u8; 4]);

pub const TYPE_BYTE: u16 = 1;
pub const TYPE_ASCII: u16 = 2;
pub const TYPE_SHORT: u16 = 3;
pub const TYPE_LONG: u16 = 4;
pub const TYPE_UNDEFINED: u16 = 7;

pub const TAG_ORIENTATION: u16 = 0x0112;
pub const TAG_MAKE: u16 = 0x010F;
pub const TAG_EXIF_POINTER: u16 = 0x8769;
pub const TAG_EXIF_VERSION: u16 = 0x9000;

pub fn u16_bytes(order: ByteOrder, v: u16) -> [u8; 2] {
    match order {
        ByteOrder::Little => v.to_le_bytes(),
        ByteOrder::Big => v.to_be_bytes(),
    }
}

pub fn u32_bytes(order: ByteOrder, v: u32) -> [u8; 4] {
    match order {
        ByteOrder::Little => v.to_le_bytes(),
        ByteOrder::Big => v.to_be_bytes(),
    }
}

/// Inline field holding a single SHORT.
pub fn inline_short(order: ByteOrder, v: u16) -> [u8; 4] {
    let b = u16_bytes(order, v);
    [b[0], b[1], 0, 0]
}

/// Builds a TIFF buffer by appending directories and data blocks.
pub struct TiffBuilder {
    pub order: ByteOrder,
    pub buf: Vec<u8>,
}

impl TiffBuilder {
    pub fn new(order: ByteOrder) -> Self {
        let mut buf = order.mark().to_vec();
        buf.extend_from_slice(&u16_bytes(order, 42));
        buf.extend_from_slice(&u32_bytes(order, 0));
        Self { order, buf }
    }

    pub fn offset(&self) -> u32 {
        self.buf.len() as u32
    }

    pub fn set_first_ifd(&mut self, offset: u32) {
        let b = u32_bytes(self.order, offset);
        self.buf[4..8].copy_from_slice(&b);
    }

    /// Appends a directory and returns its offset.
    pub fn ifd(&mut self, entries: &[RawEntry], next: u32) -> u32 {
        let offset = self.offset();
        self.buf.extend_from_slice(&u16_bytes(self.order, entries.len() as u16));
        for &(tag, type_id, count, value) in entries {
            self.buf.extend_from_slice(&u16_bytes(self.order, tag));
            self.buf.extend_from_slice(&u16_bytes(self.order, type_id));
            self.buf.extend_from_slice(&u32_bytes(self.order, count));
            self.buf.extend_from_slice(&value);
        }
        self.buf.extend_from_slice(&u32_bytes(self.order, next));
        offset
    }

    /// Appends raw bytes and returns their offset.
    pub fn data(&mut self, bytes: &[u8]) -> u32 {
        let offset = self.offset();
        self.buf.extend_from_slice(bytes);
        offset
    }

    /// Overwrites the 4 bytes at `at` with `v`.
    pub fn patch_u32(&mut self, at: u32, v: u32) {
        let b = u32_bytes(self.order, v);
        self.buf[at as usize..at as usize + 4].copy_from_slice(&b);
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// One directory with one SHORT tag: Orientation = 1.
pub fn minimal_tiff(order: ByteOrder) -> Vec<u8> {
    let mut b = TiffBuilder::new(order);
    let ifd = b.ifd(&[(TAG_ORIENTATION, TYPE_SHORT, 1, inline_short(order, 1))], 0);
    b.set_first_ifd(ifd);
    b.build()
}

/// A JPEG segment: marker, big-endian size (including itself), payload.
pub fn segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let size = (payload.len() + 2) as u16;
    let mut out = vec![0xFF, marker];
    out.extend_from_slice(&size.to_be_bytes());
    out.extend_from_slice(payload);
    out
}

/// SOI, the given segments, EOI.
pub fn jpeg(segments: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    for s in segments {
        out.extend_from_slice(s);
    }
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

pub fn with_prefix(prefix: &[u8], body: &[u8]) -> Vec<u8> {
    let mut out = prefix.to_vec();
    out.extend_from_slice(body);
    out
}

/// A legacy caption record with a plain 15-bit length.
pub fn iptc_record(record: u8, dataset: u8, data: &[u8]) -> Vec<u8> {
    let mut out = vec![0x1C, record, dataset];
    out.extend_from_slice(&(data.len() as u16).to_be_bytes());
    out.extend_from_slice(data);
    out
}

/// A resource block, including the even padding of the name field
/// (but no padding after the payload).
pub fn resource_block(id: u8, name: &[u8], data: &[u8]) -> Vec<u8> {
    let mut out = b"8BIM".to_vec();
    out.push(0x04);
    out.push(id);
    out.push(name.len() as u8);
    out.extend_from_slice(name);
    if (name.len() + 1) % 2 == 1 {
        out.push(0);
    }
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(data);
    out
}

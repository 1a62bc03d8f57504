//! Byte order selected at run time from a container's signature.

use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

/// Byte order of a directory container, fixed for the lifetime of one decode.
///
/// The read helpers expect slices of exactly the right length; callers
/// obtain them through the bounds-checked helpers in `utils`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

macro_rules! dispatch {
    ($order:expr, $method:ident($($arg:expr),*)) => {
        match $order {
            ByteOrder::Little => LittleEndian::$method($($arg),*),
            ByteOrder::Big => BigEndian::$method($($arg),*),
        }
    };
}

impl ByteOrder {
    /// `II`: Intel, little-endian.
    pub const LITTLE_MARK: [u8; 2] = *b"II";
    /// `MM`: Motorola, big-endian.
    pub const BIG_MARK: [u8; 2] = *b"MM";

    /// Selects the byte order named by a two-byte signature.
    pub fn from_mark(mark: [u8; 2]) -> Option<Self> {
        match mark {
            Self::LITTLE_MARK => Some(Self::Little),
            Self::BIG_MARK => Some(Self::Big),
            _ => None,
        }
    }

    pub fn mark(self) -> [u8; 2] {
        match self {
            Self::Little => Self::LITTLE_MARK,
            Self::Big => Self::BIG_MARK,
        }
    }

    pub fn read_u16(self, buf: &[u8]) -> u16 {
        dispatch!(self, read_u16(buf))
    }

    pub fn read_u32(self, buf: &[u8]) -> u32 {
        dispatch!(self, read_u32(buf))
    }

    pub fn read_i32(self, buf: &[u8]) -> i32 {
        dispatch!(self, read_i32(buf))
    }

    pub fn read_u16_into(self, src: &[u8], dst: &mut [u16]) {
        dispatch!(self, read_u16_into(src, dst))
    }

    pub fn read_i16_into(self, src: &[u8], dst: &mut [i16]) {
        dispatch!(self, read_i16_into(src, dst))
    }

    pub fn read_u32_into(self, src: &[u8], dst: &mut [u32]) {
        dispatch!(self, read_u32_into(src, dst))
    }

    pub fn read_i32_into(self, src: &[u8], dst: &mut [i32]) {
        dispatch!(self, read_i32_into(src, dst))
    }

    pub fn read_f32_into(self, src: &[u8], dst: &mut [f32]) {
        dispatch!(self, read_f32_into(src, dst))
    }

    pub fn read_f64_into(self, src: &[u8], dst: &mut [f64]) {
        dispatch!(self, read_f64_into(src, dst))
    }
}

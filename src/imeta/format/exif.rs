//! Embedded EXIF blobs.
//!
//! The payload after the `Exif\0\0` prefix is a complete TIFF structure
//! whose offsets are relative to the start of the payload itself.

use log::debug;

use crate::imeta::format::tiff;
use crate::imeta::reader::ReadOptions;
use crate::imeta::types::error::Result;
use crate::imeta::types::models::Metadata;

/// Marker prefix of an EXIF application segment.
pub const EXIF_PREFIX: &[u8] = b"Exif\0\0";

/// Decodes an EXIF blob (prefix already removed) into the `Image` and `Photo` groups.
pub fn add_exif(meta: &mut Metadata, blob: &[u8], options: &ReadOptions) -> Result<()> {
    debug!("Decoding EXIF blob ({} bytes)", blob.len());
    tiff::decode_buffer(meta, blob, options)
}

//! Segment-framed (JPEG) container scanning.
//!
//! # Segment Structure
//! ```text
//! [1 byte]  0xFF
//! [1 byte]  Marker id
//! [2 bytes] Size (big-endian), counting the size bytes themselves
//! [N bytes] Payload of size - 2 bytes
//! ```
//!
//! Scanning stops cleanly at the end-of-image or start-of-scan marker.
//! Table, frame and comment segments are skipped; application segments
//! are read and dispatched by marker and payload prefix. Any other marker
//! aborts the scan, since its framing cannot be assumed.

use std::io::SeekFrom;

use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, info, trace, warn};

use crate::imeta::format::exif::{self, EXIF_PREFIX};
use crate::imeta::format::photoshop::{self, PHOTOSHOP_PREFIXES, PHOTOSHOP_PREFIX_LEN};
use crate::imeta::format::xmp::{self, XMP_PREFIX};
use crate::imeta::reader::ReadOptions;
use crate::imeta::types::error::{ImetaError, Result};
use crate::imeta::types::filetypes::{ImageFile, ReadSeek};
use crate::imeta::types::models::Metadata;

pub const SECTION_START: u8 = 0xFF;
pub const SOI_MARKER: u8 = 0xD8;
pub const EOI_MARKER: u8 = 0xD9;
pub const SOS_MARKER: u8 = 0xDA;
pub const DQT_MARKER: u8 = 0xDB;
pub const DHT_MARKER: u8 = 0xC4;
pub const SOF0_MARKER: u8 = 0xC0;
pub const SOF2_MARKER: u8 = 0xC2;
pub const COM_MARKER: u8 = 0xFE;
pub const APP0_MARKER: u8 = 0xE0;
pub const APP1_MARKER: u8 = 0xE1;
pub const APP13_MARKER: u8 = 0xED;
pub const APP15_MARKER: u8 = 0xEF;

/// A matched segment-framed container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JpegFile;

/// Recognizes the start-of-image signature `FF D8`.
pub fn detect(src: &mut dyn ReadSeek) -> Option<JpegFile> {
    let mut magic = [0u8; 2];
    src.read_exact(&mut magic).ok()?;
    (magic == [SECTION_START, SOI_MARKER]).then_some(JpegFile)
}

impl ImageFile for JpegFile {
    fn format(&self) -> &'static str {
        "JPEG"
    }

    fn read_meta(&self, meta: &mut Metadata, src: &mut dyn ReadSeek, options: &ReadOptions) -> Result<()> {
        info!("Scanning JPEG segments");
        src.seek(SeekFrom::Start(0))?;
        if read_marker(src)? != SOI_MARKER {
            return Err(ImetaError::malformed("missing start of image"));
        }

        loop {
            let marker = read_marker(src)?;
            match marker {
                EOI_MARKER | SOS_MARKER => {
                    debug!("End of metadata at marker {:#04x}", marker);
                    return Ok(());
                }
                SOI_MARKER => return Err(ImetaError::malformed("unexpected start of image")),
                DQT_MARKER | SOF0_MARKER | SOF2_MARKER | DHT_MARKER | COM_MARKER => {
                    let len = read_section_size(src)?;
                    trace!("Skipping section {:#04x} ({} bytes)", marker, len);
                    src.seek(SeekFrom::Current(len as i64))?;
                }
                APP0_MARKER..=APP15_MARKER => {
                    let section = read_section(src)?;
                    trace!("App section {:#04x} ({} bytes)", marker, section.len());
                    if let Err(err) = add_app_section(meta, marker, &section, options) {
                        if !options.recover_sections {
                            return Err(err);
                        }
                        warn!("Skipping bad APP{} section: {}", marker - APP0_MARKER, err);
                        meta.warnings.push(format!("APP{}: {}", marker - APP0_MARKER, err));
                    }
                }
                other => {
                    return Err(ImetaError::malformed(format!("unknown section ({:#04x})", other)));
                }
            }
        }
    }
}

/// Reads `FF xx` and returns the marker id.
fn read_marker(src: &mut dyn ReadSeek) -> Result<u8> {
    let mut marker = [0u8; 2];
    src.read_exact(&mut marker)
        .map_err(|_| ImetaError::malformed("short read on section marker"))?;
    if marker[0] != SECTION_START {
        return Err(ImetaError::malformed(format!(
            "expected section start, found {:#04x}",
            marker[0]
        )));
    }
    Ok(marker[1])
}

/// Reads a section size and returns the payload length it implies.
fn read_section_size(src: &mut dyn ReadSeek) -> Result<usize> {
    let size = src
        .read_u16::<BigEndian>()
        .map_err(|_| ImetaError::malformed("short read on section size"))?;
    // The size includes its own 2 bytes.
    if size < 2 {
        return Err(ImetaError::malformed(format!("illegal section size ({})", size)));
    }
    Ok(size as usize - 2)
}

fn read_section(src: &mut dyn ReadSeek) -> Result<Vec<u8>> {
    let len = read_section_size(src)?;
    let mut section = vec![0u8; len];
    src.read_exact(&mut section)
        .map_err(|_| ImetaError::malformed(format!("short read on {} byte section", len)))?;
    Ok(section)
}

/// Dispatches an application section payload by marker and prefix.
///
/// Payloads that match no known prefix are ignored.
pub fn add_app_section(meta: &mut Metadata, marker: u8, section: &[u8], options: &ReadOptions) -> Result<()> {
    match marker {
        APP1_MARKER if section.starts_with(EXIF_PREFIX) => {
            exif::add_exif(meta, &section[EXIF_PREFIX.len()..], options)
        }
        APP1_MARKER if section.starts_with(XMP_PREFIX) => {
            if options.decode_xmp {
                xmp::add_xmp(meta, &section[XMP_PREFIX.len()..])
            } else {
                debug!("XMP decoding disabled, skipping packet");
                Ok(())
            }
        }
        APP13_MARKER if PHOTOSHOP_PREFIXES.iter().any(|p| section.starts_with(p)) => {
            photoshop::add_resources(meta, &section[PHOTOSHOP_PREFIX_LEN..])
        }
        _ => {
            trace!("Ignoring APP{} section", marker - APP0_MARKER);
            Ok(())
        }
    }
}

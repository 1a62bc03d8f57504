//! Container recognizers and the decode entry points they hand back.

use std::io::{Read, Seek};

use super::error::Result;
use super::models::Metadata;
use crate::imeta::format::{jpeg, tiff};
use crate::imeta::reader::ReadOptions;

/// A seekable byte source. Offsets in image metadata are absolute, so
/// every container needs random access.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek + ?Sized> ReadSeek for T {}

/// A recognizer for one container format.
///
/// `detect` is called with the source positioned at its start and may
/// consume bytes freely; the dispatcher rewinds before the next attempt.
pub trait FileType {
    /// A short name used for debugging and logging.
    fn name(&self) -> &'static str;

    /// Returns the container handle if the stream starts with this format's signature.
    fn detect(&self, src: &mut dyn ReadSeek) -> Option<Box<dyn ImageFile>>;
}

/// A matched container, ready to decode its metadata.
pub trait ImageFile {
    /// Format name recorded in the result.
    fn format(&self) -> &'static str;

    /// Walks the container from the start of `src`, populating `meta`.
    fn read_meta(&self, meta: &mut Metadata, src: &mut dyn ReadSeek, options: &ReadOptions) -> Result<()>;
}

/// Zero-cost marker for segment-framed (JPEG) containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Jpeg;

impl FileType for Jpeg {
    fn name(&self) -> &'static str {
        "JPEG"
    }

    fn detect(&self, src: &mut dyn ReadSeek) -> Option<Box<dyn ImageFile>> {
        jpeg::detect(src).map(|file| Box::new(file) as Box<dyn ImageFile>)
    }
}

/// Zero-cost marker for flat directory (TIFF) containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tiff;

impl FileType for Tiff {
    fn name(&self) -> &'static str {
        "TIFF"
    }

    fn detect(&self, src: &mut dyn ReadSeek) -> Option<Box<dyn ImageFile>> {
        tiff::detect(src).map(|file| Box::new(file) as Box<dyn ImageFile>)
    }
}

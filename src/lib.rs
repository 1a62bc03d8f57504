//! # imeta-reader
//!
//! A read-only decoder for metadata embedded in raster image files.
//!
//! Supports JPEG (EXIF, XMP and Photoshop/IPTC sections) and TIFF
//! containers. Every length and offset taken from the input is bounds
//! checked; malformed input yields an [`ImetaError`], never a panic.
//!
//! ## Example
//!
//! ```no_run
//! use imeta_reader::{read_from_file, TagId, GROUP_IMAGE};
//!
//! let meta = read_from_file("photo.jpg").unwrap();
//! if let Some(orientation) = meta.get(GROUP_IMAGE, &TagId::Numeric(0x0112)) {
//!     println!("Orientation: {}", orientation);
//! }
//! ```
pub mod imeta;

// Re-export the main types for convenience
pub use imeta::{
    ImetaError, ImetaReader, ReadOptions, Registry, Result,
    read, read_from_buf, read_from_file,
    codec::byte_order::ByteOrder,
    types::{
        filetypes::{FileType, ImageFile, Jpeg, ReadSeek, Tiff},
        models::{
            Directory, Elements, Group, IptcRecord, Metadata, Payload, Rational,
            ResourceBlock, ResourceKind, SRational, TagEntry, TagId, Value, ValueType,
            GROUP_IMAGE, GROUP_IPTC, GROUP_PHOTO, GROUP_XMP,
        },
    },
};

//! Container and embedded-section parsing layer.
//!
//! # Module Organization
//!
//! - [`jpeg`]: Scans segment-framed containers and dispatches APP sections
//! - [`tiff`]: Reads offset-linked tag directories and flat TIFF containers
//! - [`exif`]: Decodes EXIF blobs embedded in APP1 sections
//! - [`photoshop`]: Decodes image resource blocks embedded in APP13 sections
//! - [`iptc`]: Decodes legacy caption records found in resource blocks
//! - [`xmp`]: Flattens XMP packets into key/value properties
//!
//! # Nesting
//!
//! ```text
//! JPEG ─┬─ APP1  "Exif\0\0"  → exif → tiff directories
//!       ├─ APP1  XMP URI     → xmp
//!       └─ APP13 Photoshop   → photoshop ─→ iptc
//! TIFF ──────────────────────→ tiff directories
//! ```

pub mod exif;
pub mod iptc;
pub mod jpeg;
pub mod photoshop;
pub mod tiff;
pub mod xmp;

//! Custom error types for the imeta-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum ImetaError {
    /// An error originating from I/O operations on the source.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// No registered container recognizer matched the start of the stream.
    #[error("Unrecognised image file type")]
    UnrecognizedFormat,

    /// Section framing is inconsistent, a marker was unexpected, or a read came up short.
    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    /// A directory container's byte-order mark or version constant is wrong.
    #[error("Bad byte order or version: {0}")]
    BadByteOrderOrVersion(String),

    /// A tag entry declares a type outside the decodable set.
    #[error("Unsupported value type {type_id} (tag {tag:#06x})")]
    UnsupportedType { type_id: u16, tag: u16 },

    /// A declared length or offset points beyond the available bytes.
    #[error("Truncated data in {context}: need {needed} bytes, but only {available} available")]
    TruncatedData {
        context: &'static str,
        needed: u64,
        available: u64,
    },

    /// A declared payload size does not equal the bytes actually available for it.
    #[error("Size mismatch for {context}: expected {expected} bytes, but found {found} bytes")]
    SizeMismatch {
        context: &'static str,
        expected: u64,
        found: u64,
    },

    /// A legacy caption record is structurally invalid.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// A resource block stream does not start with the expected signature.
    #[error("Unknown resource block header")]
    UnknownResourceHeader,

    /// A directory chain revisited an offset or exceeded the directory limit.
    #[error("Directory chain loops or is too long (offset {offset:#010x})")]
    DirectoryLoop { offset: u32 },

    /// The text-document decoder rejected an XMP packet.
    #[error("Invalid XMP packet: {0}")]
    InvalidXmp(String),
}

impl ImetaError {
    /// Create a malformed container error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedContainer(msg.into())
    }
}

/// A convenience `Result` type alias using the crate's `ImetaError` type.
pub type Result<T> = std::result::Result<T, ImetaError>;

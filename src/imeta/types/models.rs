//! Core data structures for decoded image metadata.
//!
//! This module defines the fundamental types used throughout the library:
//! - Value type tags and decoded values
//! - Directory and tag entry records
//! - Legacy caption records and resource blocks
//! - The accumulated result structure

use std::collections::HashMap;
use std::fmt;

/// Namespace for the primary directory chain.
pub const GROUP_IMAGE: &str = "Image";
/// Namespace for the directory chain reached through the Exif pointer tag.
pub const GROUP_PHOTO: &str = "Photo";
/// Namespace for legacy caption records.
pub const GROUP_IPTC: &str = "Iptc";
/// Namespace for text-document (XMP) properties.
pub const GROUP_XMP: &str = "Xmp";

/// Primitive encodings a tag value can be stored in.
///
/// Discriminants follow the numbering used in directory entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    None = 0,
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    SByte = 6,
    Undefined = 7,
    SShort = 8,
    SLong = 9,
    SRational = 10,
    Float = 11,
    Double = 12,
    XmpText = 13,
}

impl ValueType {
    /// Maps a raw type id to its tag, `None` for ids outside the table.
    pub fn from_id(id: u16) -> Option<Self> {
        Some(match id {
            0 => Self::None,
            1 => Self::Byte,
            2 => Self::Ascii,
            3 => Self::Short,
            4 => Self::Long,
            5 => Self::Rational,
            6 => Self::SByte,
            7 => Self::Undefined,
            8 => Self::SShort,
            9 => Self::SLong,
            10 => Self::SRational,
            11 => Self::Float,
            12 => Self::Double,
            13 => Self::XmpText,
            _ => return None,
        })
    }

    /// Size in bytes of one element of this type.
    pub fn width(self) -> usize {
        match self {
            Self::None => 0,
            Self::Byte | Self::Ascii | Self::SByte | Self::Undefined | Self::XmpText => 1,
            Self::Short | Self::SShort => 2,
            Self::Long | Self::SLong | Self::Float => 4,
            Self::Rational | Self::SRational | Self::Double => 8,
        }
    }

    /// Whether this type may appear in a directory tag entry.
    pub fn is_directory_type(self) -> bool {
        !matches!(self, Self::None | Self::XmpText)
    }

    /// Whether values of this type decode to a string.
    pub fn is_text(self) -> bool {
        matches!(self, Self::Ascii | Self::XmpText)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "<nil>",
            Self::Byte => "Byte",
            Self::Ascii => "Ascii",
            Self::Short => "Short",
            Self::Long => "Long",
            Self::Rational => "Rational",
            Self::SByte => "SByte",
            Self::Undefined => "Undefined",
            Self::SShort => "SShort",
            Self::SLong => "SLong",
            Self::SRational => "SRational",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::XmpText => "XmpText",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unsigned 32/32 fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub num: u32,
    pub denom: u32,
}

/// Signed 32/32 fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SRational {
    pub num: i32,
    pub denom: i32,
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

impl fmt::Display for SRational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

/// A single element or an ordered sequence of them.
///
/// Decoders produce `One` exactly when the element count is 1.
#[derive(Debug, Clone, PartialEq)]
pub enum Elements<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Elements<T> {
    pub fn from_vec(mut items: Vec<T>) -> Self {
        if items.len() == 1 {
            if let Some(item) = items.pop() {
                return Self::One(item);
            }
        }
        Self::Many(items)
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(item) => std::slice::from_ref(item),
            Self::Many(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Returns the scalar when exactly one element was decoded.
    pub fn scalar(&self) -> Option<&T> {
        match self {
            Self::One(item) => Some(item),
            Self::Many(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Elements<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::One(item) => write!(f, "{}", item),
            Self::Many(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Native representation of decoded bytes, one variant per element kind.
///
/// `Undefined` values are carried as `Byte`; `Ascii` and `XmpText` as `Text`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    None,
    Text(String),
    Byte(Elements<u8>),
    SByte(Elements<i8>),
    Short(Elements<u16>),
    SShort(Elements<i16>),
    Long(Elements<u32>),
    SLong(Elements<i32>),
    Rational(Elements<Rational>),
    SRational(Elements<SRational>),
    Float(Elements<f32>),
    Double(Elements<f64>),
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Payload::None => f.write_str("<nil>"),
            Payload::Text(s) => write!(f, "{:?}", s),
            Payload::Byte(v) => write!(f, "{}", v),
            Payload::SByte(v) => write!(f, "{}", v),
            Payload::Short(v) => write!(f, "{}", v),
            Payload::SShort(v) => write!(f, "{}", v),
            Payload::Long(v) => write!(f, "{}", v),
            Payload::SLong(v) => write!(f, "{}", v),
            Payload::Rational(v) => write!(f, "{}", v),
            Payload::SRational(v) => write!(f, "{}", v),
            Payload::Float(v) => write!(f, "{}", v),
            Payload::Double(v) => write!(f, "{}", v),
        }
    }
}

/// A decoded tag value: type tag, element count and payload.
///
/// String payloads have their trailing NUL bytes stripped; `count` still
/// reflects the stored length, terminator included.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub value_type: ValueType,
    pub count: u32,
    pub payload: Payload,
}

impl Value {
    /// Builds a text-block value, as produced for XMP properties.
    pub fn xmp_text(text: impl Into<String>) -> Self {
        Self {
            value_type: ValueType::XmpText,
            count: 1,
            payload: Payload::Text(text.into()),
        }
    }

    /// Number of bytes the value occupies when stored.
    pub fn size(&self) -> u64 {
        self.value_type.width() as u64 * self.count as u64
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::Byte(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Widens a scalar unsigned integer payload to `u32`.
    pub fn as_u32(&self) -> Option<u32> {
        match &self.payload {
            Payload::Byte(v) => v.scalar().map(|&b| b as u32),
            Payload::Short(v) => v.scalar().map(|&s| s as u32),
            Payload::Long(v) => v.scalar().copied(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.payload)
    }
}

/// A raw directory entry before its value is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagEntry {
    pub tag: u16,
    pub type_id: u16,
    pub count: u32,
    /// Inline value bytes, or an absolute offset when the value exceeds 4 bytes.
    pub value_offset: [u8; 4],
}

/// One directory of a chain: its entries and the link to the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    pub offset: u32,
    pub entries: Vec<TagEntry>,
    /// Offset of the next directory; 0 terminates the chain.
    pub next: u32,
}

/// A single legacy caption record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IptcRecord {
    pub record: u8,
    pub dataset: u8,
    pub data: Vec<u8>,
}

/// Known resource block ids (the byte after the `0x04` version byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Iptc,
    Thumbnail,
    IccProfile,
    Exif,
    Xmp,
    Other(u8),
}

impl From<u8> for ResourceKind {
    fn from(id: u8) -> Self {
        match id {
            0x04 => Self::Iptc,
            0x0C => Self::Thumbnail,
            0x0F => Self::IccProfile,
            0x22 => Self::Exif,
            0x24 => Self::Xmp,
            other => Self::Other(other),
        }
    }
}

/// A decoded resource block. The payload is kept for external consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceBlock {
    pub id: u8,
    pub name: Vec<u8>,
    pub data: Vec<u8>,
}

impl ResourceBlock {
    pub fn kind(&self) -> ResourceKind {
        ResourceKind::from(self.id)
    }
}

/// Identifier of a tag within a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagId {
    /// Directory tag id.
    Numeric(u16),
    /// Legacy record `(record, dataset)` pair.
    Dataset { record: u8, dataset: u8 },
    /// Namespace-qualified property name.
    Name(String),
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TagId::Numeric(id) => write!(f, "{:#06x}", id),
            TagId::Dataset { record, dataset } => write!(f, "{}:{}", record, dataset),
            TagId::Name(name) => f.write_str(name),
        }
    }
}

/// One namespace of the result: each tag id maps to its occurrences in decode order.
#[derive(Debug, Clone, Default)]
pub struct Group {
    items: HashMap<TagId, Vec<Value>>,
}

impl Group {
    /// Returns the first decoded occurrence of `id`.
    pub fn get(&self, id: &TagId) -> Option<&Value> {
        self.items.get(id).and_then(|values| values.first())
    }

    /// Returns every occurrence of `id` (e.g. the same tag in IFD0 and IFD1).
    pub fn get_all(&self, id: &TagId) -> &[Value] {
        self.items.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn insert(&mut self, id: TagId, value: Value) {
        self.items.entry(id).or_default().push(value);
    }

    /// Number of distinct tag ids.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TagId, &[Value])> {
        self.items.iter().map(|(id, values)| (id, values.as_slice()))
    }
}

/// The result of one decode call.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    /// Name of the container format that matched.
    pub format: String,
    groups: HashMap<String, Group>,
    /// Every resource block seen, decoded or not.
    pub resources: Vec<ResourceBlock>,
    /// Section errors skipped when recovery is enabled.
    pub warnings: Vec<String>,
}

impl Metadata {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Returns the group, creating it on first use.
    pub fn group_mut(&mut self, name: &str) -> &mut Group {
        self.groups.entry(name.to_string()).or_default()
    }

    /// Convenience lookup of the first value of `id` in `group`.
    pub fn get(&self, group: &str, id: &TagId) -> Option<&Value> {
        self.group(group).and_then(|g| g.get(id))
    }

    pub fn insert(&mut self, group: &str, id: TagId, value: Value) {
        self.group_mut(group).insert(id, value);
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &Group)> {
        self.groups.iter().map(|(name, group)| (name.as_str(), group))
    }

    /// True when no group holds any tag.
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Group::is_empty)
    }
}

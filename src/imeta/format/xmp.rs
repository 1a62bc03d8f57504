//! XMP packets, flattened into `prefix.name` properties.
//!
//! Only `rdf:Description` elements are interpreted. Their attributes and
//! child property elements become properties when the property's prefix
//! is bound by an `xmlns:` declaration in scope. Array values (`rdf:li`
//! items) are joined with `", "`.

use std::collections::HashMap;

use log::{debug, trace};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::imeta::types::error::{ImetaError, Result};
use crate::imeta::types::models::{GROUP_XMP, Metadata, TagId, Value};

/// Marker prefix of an XMP application segment.
pub const XMP_PREFIX: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";

/// Prefixes that describe the packet structure rather than properties.
const STRUCTURAL_PREFIXES: [&str; 3] = ["rdf", "xml", "xmlns"];

/// An open element.
struct Frame {
    declared: Vec<String>,
    is_description: bool,
}

/// A property element whose text is being collected.
struct Property {
    key: String,
    depth: usize,
    items: Vec<String>,
}

fn qualified_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Splits `prefix:local` and maps it to a `prefix.local` key when the
/// prefix is bound and is not structural.
fn property_key(qname: &str, stack: &[Frame], declared_here: &[String]) -> Option<String> {
    let (prefix, local) = qname.split_once(':')?;
    if STRUCTURAL_PREFIXES.contains(&prefix) {
        return None;
    }
    let bound = declared_here.iter().any(|p| p == prefix)
        || stack.iter().any(|f| f.declared.iter().any(|p| p == prefix));
    bound.then(|| format!("{}.{}", prefix, local))
}

/// Reads the element's attributes, returning the prefixes it declares and
/// its remaining `(qualified name, value)` pairs.
fn split_attributes(e: &BytesStart) -> Result<(Vec<String>, Vec<(String, String)>)> {
    let mut declared = Vec::new();
    let mut attrs = Vec::new();
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| ImetaError::InvalidXmp(format!("Failed to parse XML attribute: {}", e)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if let Some(prefix) = key.strip_prefix("xmlns:") {
            declared.push(prefix.to_string());
            continue;
        }
        let value = attr
            .unescape_value()
            .map_err(|e| ImetaError::InvalidXmp(format!("Failed to decode XML value: {}", e)))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok((declared, attrs))
}

/// Parses an XMP packet into a flat `prefix.name → value` mapping.
pub fn parse(packet: &[u8]) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_reader(packet);
    let mut buf = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut property: Option<Property> = None;
    let mut props = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let frame = open_element(&e, &stack, &mut property, &mut props)?;
                stack.push(frame);
            }
            Ok(Event::Empty(e)) => {
                open_element(&e, &stack, &mut property, &mut props)?;
                // An empty property element has no value to collect.
                if property.as_ref().is_some_and(|p| p.depth == stack.len()) {
                    property = None;
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(prop) = property.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| ImetaError::InvalidXmp(format!("Failed to decode XML text: {}", e)))?;
                    let text = text.trim();
                    if !text.is_empty() {
                        prop.items.push(text.to_string());
                    }
                }
            }
            Ok(Event::End(_)) => {
                stack.pop();
                if property.as_ref().is_some_and(|p| p.depth == stack.len()) {
                    if let Some(prop) = property.take() {
                        if !prop.items.is_empty() {
                            trace!("XMP {} = {:?}", prop.key, prop.items);
                            props.insert(prop.key, prop.items.join(", "));
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ImetaError::InvalidXmp(format!("Failed to read XMP packet: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    debug!("XMP packet: {} properties", props.len());
    Ok(props)
}

/// Handles a start or empty element and returns its frame.
fn open_element(
    e: &BytesStart,
    stack: &[Frame],
    property: &mut Option<Property>,
    props: &mut HashMap<String, String>,
) -> Result<Frame> {
    let qname = qualified_name(e);
    let (declared, attrs) = split_attributes(e)?;
    let is_description = qname.rsplit(':').next() == Some("Description");

    if is_description {
        for (key, value) in attrs {
            if let Some(prop_key) = property_key(&key, stack, &declared) {
                props.insert(prop_key, value);
            }
        }
    } else if property.is_none() && stack.last().is_some_and(|f| f.is_description) {
        if let Some(key) = property_key(&qname, stack, &declared) {
            *property = Some(Property {
                key,
                depth: stack.len(),
                items: Vec::new(),
            });
        }
    }

    Ok(Frame {
        declared,
        is_description,
    })
}

/// Parses an XMP packet and stores its properties in the `Xmp` group.
pub fn add_xmp(meta: &mut Metadata, packet: &[u8]) -> Result<()> {
    for (key, value) in parse(packet)? {
        meta.insert(GROUP_XMP, TagId::Name(key), Value::xmp_text(value));
    }
    Ok(())
}

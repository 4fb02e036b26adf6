//! XML to [`Node`] normalization.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::Node;
use crate::error::{Error, Result};
use crate::util::{decode_text, extract_xml_encoding};

/// Parse raw export bytes into a normalized tree.
///
/// The bytes are decoded first (UTF-8, then the encoding named in the XML
/// declaration, then Windows-1252), so exports written in legacy Japanese
/// encodings are handled transparently.
pub fn parse_document(bytes: &[u8]) -> Result<Node> {
    let content = decode_text(bytes, extract_xml_encoding(bytes));
    parse_str(&content)
}

/// Parse an XML document held in a string into a normalized tree.
///
/// Only the first top-level element is returned. Comments, processing
/// instructions and the doctype are dropped; CDATA sections contribute text.
pub fn parse_str(content: &str) -> Result<Node> {
    let content = normalize_line_endings(content);
    let mut reader = Reader::from_str(&content);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Node> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(element(&e)?),
            Event::Empty(e) => {
                let node = element(&e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Ok(node),
                }
            }
            Event::End(_) => {
                let Some(node) = stack.pop() else {
                    continue;
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Ok(node),
                }
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    current.push_content(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    current.push_content(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::GeneralRef(e) => {
                if let Some(current) = stack.last_mut() {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    let resolved =
                        resolve_entity(&entity).ok_or_else(|| Error::UnknownEntity(entity.to_string()))?;
                    current.push_content(&resolved);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match stack.into_iter().next() {
        Some(unclosed) => Err(Error::UnclosedElement(unclosed.tag)),
        None => Err(Error::EmptyDocument),
    }
}

/// Build a childless node from a start (or empty) tag.
fn element(e: &BytesStart<'_>) -> Result<Node> {
    let mut node = Node::new(String::from_utf8_lossy(e.name().as_ref()));
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = unescape_attr(&String::from_utf8_lossy(&attr.value))?;
        node.attributes.push((key, value));
    }
    Ok(node)
}

/// XML end-of-line handling: `\r\n` and lone `\r` both become `\n`.
fn normalize_line_endings(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

/// Normalize and unescape a raw attribute value.
///
/// Literal whitespace characters become spaces before references are
/// resolved, so `&#10;` still yields a newline.
fn unescape_attr(raw: &str) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        push_normalized(&mut out, &rest[..amp]);
        let after = &rest[amp + 1..];
        match after.find(';') {
            Some(semi) => {
                let entity = &after[..semi];
                let resolved =
                    resolve_entity(entity).ok_or_else(|| Error::UnknownEntity(entity.to_string()))?;
                out.push_str(&resolved);
                rest = &after[semi + 1..];
            }
            None => {
                push_normalized(&mut out, &rest[amp..]);
                rest = "";
            }
        }
    }
    push_normalized(&mut out, rest);

    Ok(out)
}

fn push_normalized(out: &mut String, s: &str) {
    out.extend(s.chars().map(|c| match c {
        '\t' | '\n' | '\r' => ' ',
        other => other,
    }));
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()?
    } else {
        return None;
    };

    char::from_u32(code).map(|c| c.to_string())
}

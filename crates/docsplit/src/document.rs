// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Adapt an XML element tree into the [`Node`] model.
//!
//! The conventions follow the dictionary shape commonly used for such
//! documents:
//! - an element without attributes and element children is a scalar
//!   holding its trimmed text
//! - attributes become `@name` scalars, in document order
//! - child elements are grouped by name in order of first appearance;
//!   a name seen more than once becomes a record list
//! - mixed text content becomes a trailing `#text` scalar
//! - element and attribute names keep their `prefix:` as written, and
//!   namespace declarations are kept as `@xmlns` / `@xmlns:prefix`

use crate::error::{Error, IoContext, Result};
use crate::node::{Node, Value};
use diagnostics::*;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::HashMap;
use std::path::Path;

pub const TEXT_FIELD: &str = "#text";
pub const ATTRIBUTE_PREFIX: char = '@';

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error("bad attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("element <{0}> is not closed")]
    Unclosed(String),

    #[error("document has no root element")]
    NoRoot,

    #[error("content after the root element")]
    TrailingContent,
}

/// One parsed element, before adaptation.
#[derive(Debug, Default)]
struct Element {
    name: String,
    /// Qualified names and unescaped values, in document order
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> std::result::Result<Self, ParseError> {
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((name, value));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            ..Self::default()
        })
    }
}

/// Parse XML text into a root node holding a single field named after the
/// document element.
pub fn parse_str(text: &str) -> std::result::Result<Node, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let root = parse_element_tree(text)?;
    Ok(Node::new().with(root.name.clone(), element_value(&root)))
}

fn parse_element_tree(text: &str) -> std::result::Result<Element, ParseError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event()?;
        if root.is_some() && stack.is_empty() {
            match &event {
                Event::Eof => break,
                Event::Text(t) if t.iter().all(u8::is_ascii_whitespace) => continue,
                Event::Comment(_) | Event::PI(_) => continue,
                _ => return Err(ParseError::TrailingContent),
            }
        }
        match event {
            Event::Start(start) => stack.push(Element::open(&start)?),
            Event::Empty(start) => {
                let element = Element::open(&start)?;
                close(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                // The reader has already checked that the end tag matches.
                if let Some(element) = stack.pop() {
                    close(element, &mut stack, &mut root);
                }
            }
            Event::Text(t) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::Eof => {
                return match stack.pop() {
                    Some(open) => Err(ParseError::Unclosed(open.name)),
                    None => Err(ParseError::NoRoot),
                };
            }
            _ => {}
        }
    }

    root.ok_or(ParseError::NoRoot)
}

fn close(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

/// Read and parse a whole document. Nothing is written on failure.
pub fn load(path: &Path) -> Result<Node> {
    let text = std::fs::read_to_string(path).at_path(path)?;
    let node = parse_str(&text).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let source = path.display().to_string();
    debug!("Parsed source document {source}");
    Ok(node)
}

fn element_text(element: &Element) -> String {
    element.text.trim().to_string()
}

fn is_leaf(element: &Element) -> bool {
    element.attributes.is_empty() && element.children.is_empty()
}

fn element_value(element: &Element) -> Value {
    if is_leaf(element) {
        Value::Scalar(element_text(element))
    } else {
        Value::Record(element_record(element))
    }
}

/// List elements are always records; a text-only element keeps its text
/// under `#text`.
fn list_item(element: &Element) -> Node {
    if is_leaf(element) {
        Node::new().with(TEXT_FIELD, element_text(element))
    } else {
        element_record(element)
    }
}

fn element_record(element: &Element) -> Node {
    let mut node = Node::new();
    for (name, value) in &element.attributes {
        node.insert(format!("{ATTRIBUTE_PREFIX}{name}"), value.as_str());
    }

    let mut groups: Vec<(&str, Vec<&Element>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for child in &element.children {
        let name = child.name.as_str();
        match index.get(name) {
            Some(&i) => groups[i].1.push(child),
            None => {
                index.insert(name, groups.len());
                groups.push((name, vec![child]));
            }
        }
    }

    for (name, elements) in groups {
        let value = match elements.as_slice() {
            [single] => element_value(single),
            many => Value::RecordList(many.iter().map(|e| list_item(e)).collect()),
        };
        node.insert(name, value);
    }

    let text = element_text(element);
    if !text.is_empty() {
        node.insert(TEXT_FIELD, text);
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_wrapped_in_named_field() {
        let node = parse_str("<classData><Name>A</Name></classData>").unwrap();
        let root = node.get("classData").and_then(Value::as_record).unwrap();
        assert_eq!(root.scalar("Name"), Some("A"));
    }

    #[test]
    fn test_text_only_element_is_scalar() {
        let node = parse_str("<r><a>  padded  </a><b/></r>").unwrap();
        let root = node.get("r").and_then(Value::as_record).unwrap();
        assert_eq!(root.scalar("a"), Some("padded"));
        assert_eq!(root.scalar("b"), Some(""));
    }

    #[test]
    fn test_attributes_precede_children() {
        let node = parse_str(r#"<r><item id="7" kind="x"><v>1</v></item></r>"#).unwrap();
        let root = node.get("r").and_then(Value::as_record).unwrap();
        let item = root.get("item").and_then(Value::as_record).unwrap();
        let names: Vec<&str> = item.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["@id", "@kind", "v"]);
    }

    #[test]
    fn test_repeated_children_become_list_at_first_position() {
        let xml = "<r><row><n>1</n></row><other>o</other><row><n>2</n></row></r>";
        let node = parse_str(xml).unwrap();
        let root = node.get("r").and_then(Value::as_record).unwrap();
        let names: Vec<&str> = root.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["row", "other"]);
        let rows = root.get("row").and_then(Value::as_list).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].scalar("n"), Some("2"));
    }

    #[test]
    fn test_repeated_text_elements_become_text_records() {
        let node = parse_str("<r><v>a</v><v>b</v></r>").unwrap();
        let root = node.get("r").and_then(Value::as_record).unwrap();
        let values = root.get("v").and_then(Value::as_list).unwrap();
        assert_eq!(values[0].scalar(TEXT_FIELD), Some("a"));
        assert_eq!(values[1].scalar(TEXT_FIELD), Some("b"));
    }

    #[test]
    fn test_mixed_content_keeps_text() {
        let node = parse_str(r#"<r lang="ru">hello<b>x</b></r>"#).unwrap();
        let root = node.get("r").and_then(Value::as_record).unwrap();
        let names: Vec<&str> = root.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["@lang", "b", "#text"]);
        assert_eq!(root.scalar(TEXT_FIELD), Some("hello"));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let node = parse_str("\u{feff}<r><a>1</a></r>").unwrap();
        assert!(node.get("r").is_some());
    }

    #[test]
    fn test_malformed_document_fails() {
        assert!(parse_str("<r><a></r>").is_err());
        assert!(parse_str("<r><a>").is_err());
        assert!(matches!(parse_str("  "), Err(ParseError::NoRoot)));
        assert!(matches!(
            parse_str("<r/><s/>"),
            Err(ParseError::TrailingContent)
        ));
    }

    #[test]
    fn test_prefixed_attributes_keep_prefix_and_declarations() {
        let xml = r#"<r><v xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" type="local" xsi:type="xs:string">x</v></r>"#;
        let node = parse_str(xml).unwrap();
        let root = node.get("r").and_then(Value::as_record).unwrap();
        let v = root.get("v").and_then(Value::as_record).unwrap();
        let fields: Vec<(&str, &str)> = v.scalars().collect();
        assert_eq!(
            fields,
            vec![
                ("@xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
                ("@type", "local"),
                ("@xsi:type", "xs:string"),
                ("#text", "x"),
            ]
        );
    }

    #[test]
    fn test_default_namespace_and_prefixed_elements() {
        let xml = r#"<d:doc xmlns="urn:a" xmlns:d="urn:d"><d:item>1</d:item></d:doc>"#;
        let node = parse_str(xml).unwrap();
        let root = node.get("d:doc").and_then(Value::as_record).unwrap();
        assert_eq!(root.scalar("@xmlns"), Some("urn:a"));
        assert_eq!(root.scalar("@xmlns:d"), Some("urn:d"));
        assert_eq!(root.scalar("d:item"), Some("1"));
    }

    #[test]
    fn test_entities_and_cdata_are_text() {
        let node = parse_str("<r><a>x &amp; y</a><b><![CDATA[<raw>]]></b></r>").unwrap();
        let root = node.get("r").and_then(Value::as_record).unwrap();
        assert_eq!(root.scalar("a"), Some("x & y"));
        assert_eq!(root.scalar("b"), Some("<raw>"));
    }
}

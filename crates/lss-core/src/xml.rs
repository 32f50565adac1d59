//! Generic XML element tree: parsing and canonical serialization.
//!
//! The tree keeps attribute and child order exactly as read. Comments and
//! processing instructions are dropped, as is whitespace-only text between
//! child elements. Text of leaf elements is kept verbatim.

use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// A node in an element's child list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// A tagged element with ordered attributes and ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Create an element holding a single text node (or nothing for `""`).
    #[must_use]
    pub fn with_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(tag);
        element.push_text(text);
        element
    }

    pub fn push_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((name.into(), value.into()));
    }

    pub fn push_child(&mut self, child: Self) {
        self.children.push(Node::Element(child));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.children.push(Node::Text(text));
        }
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Self> {
        self.child_elements().filter(move |child| child.tag == tag)
    }

    /// Concatenated text children, or `None` when the element has no text.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let mut texts = self.children.iter().filter_map(|node| match node {
            Node::Text(text) => Some(text.as_str()),
            Node::Element(_) => None,
        });
        let first = texts.next()?;
        Some(texts.fold(first.to_string(), |mut joined, text| {
            joined.push_str(text);
            joined
        }))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }
}

/// Parse raw file bytes into an element tree.
///
/// Accepts UTF-8 with or without a byte order mark. Invalid encodings and
/// malformed documents fail with [`Error::Parse`]; no partial tree is
/// returned.
pub fn parse(bytes: &[u8]) -> Result<Element> {
    let bytes = bytes.strip_prefix(BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes)
        .map_err(|error| Error::Parse(format!("invalid UTF-8: {error}")))?;
    let document =
        roxmltree::Document::parse(text).map_err(|error| Error::Parse(error.to_string()))?;

    let root = convert(document.root_element());
    tracing::debug!("Parsed <{}> with {} children", root.tag, root.children.len());
    Ok(root)
}

fn convert(node: roxmltree::Node<'_, '_>) -> Element {
    let mut element = Element::new(node.tag_name().name());
    for attribute in node.attributes() {
        element.push_attribute(attribute.name(), attribute.value());
    }

    let mut children: Vec<Node> = Vec::new();
    for child in node.children() {
        if child.is_element() {
            children.push(Node::Element(convert(child)));
        } else if child.is_text() {
            let text = child.text().unwrap_or_default();
            // CDATA sections arrive as separate text nodes
            if let Some(Node::Text(previous)) = children.last_mut() {
                previous.push_str(text);
            } else if !text.is_empty() {
                children.push(Node::Text(text.to_string()));
            }
        }
    }

    let has_elements = children.iter().any(|child| matches!(child, Node::Element(_)));
    if has_elements {
        children.retain(|child| match child {
            Node::Text(text) => !text.trim().is_empty(),
            Node::Element(_) => true,
        });
    }

    element.children = children;
    element
}

/// Serialize a tree as canonical text: declaration, no indentation.
///
/// Identical trees always produce identical output.
pub fn serialize(root: &Element) -> Result<String> {
    write_document(root, None)
}

/// Serialize a tree with two-space indentation, for writing files to disk.
pub fn serialize_pretty(root: &Element) -> Result<String> {
    let mut output = write_document(root, Some(2))?;
    output.push('\n');
    Ok(output)
}

/// Canonical form of a document: `serialize(parse(bytes))`.
pub fn canonicalize(bytes: &[u8]) -> Result<String> {
    serialize(&parse(bytes)?)
}

type XmlWriter = Writer<Vec<u8>>;

fn write_document(root: &Element, indent: Option<usize>) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write_event(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    if indent.is_some() {
        write_break(&mut writer, 0)?;
    }
    write_element(&mut writer, root, indent, 0)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn write_element(
    writer: &mut XmlWriter,
    element: &Element,
    indent: Option<usize>,
    depth: usize,
) -> Result<()> {
    let mut start = BytesStart::new(element.tag.as_str());
    for (name, value) in &element.attributes {
        let value = escape_attribute(value);
        start.push_attribute((name.as_bytes(), value.as_bytes()));
    }

    if element.children.is_empty() {
        // LiveSplit writes a space before `/>`
        let content = format!("{} ", String::from_utf8_lossy(&start));
        return write_event(
            writer,
            Event::Empty(BytesStart::from_content(content, element.tag.len())),
        );
    }
    write_event(writer, Event::Start(start))?;

    // Mixed content is written inline so indentation never alters text.
    let indent = indent.filter(|_| {
        element
            .children
            .iter()
            .all(|child| matches!(child, Node::Element(_)))
    });

    for child in &element.children {
        if let Some(width) = indent {
            write_break(writer, width * (depth + 1))?;
        }
        match child {
            Node::Element(child) => write_element(writer, child, indent, depth + 1)?,
            Node::Text(text) => write_event(
                writer,
                Event::Text(BytesText::from_escaped(escape_text(text))),
            )?,
        }
    }

    if let Some(width) = indent {
        write_break(writer, width * depth)?;
    }
    write_event(writer, Event::End(BytesEnd::new(element.tag.as_str())))
}

fn write_break(writer: &mut XmlWriter, width: usize) -> Result<()> {
    let layout = format!("\n{}", " ".repeat(width));
    write_event(writer, Event::Text(BytesText::from_escaped(layout)))
}

fn write_event(writer: &mut XmlWriter, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|error| Error::Write(error.to_string()))
}

fn escape_text(text: &str) -> String {
    partial_escape(text).replace('\r', "&#xD;")
}

/// Attribute values also keep their line breaks and tabs, which a reader
/// would otherwise normalize to spaces.
fn escape_attribute(value: &str) -> String {
    escape(value)
        .replace('\n', "&#xA;")
        .replace('\r', "&#xD;")
        .replace('\t', "&#x9;")
}

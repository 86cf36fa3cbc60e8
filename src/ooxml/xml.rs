//! Owned XML tree for OOXML parts.
//!
//! Parts the fill engine rewrites (the main document, headers, footers) are
//! parsed into an [`XmlPart`], mutated through the typed document model, and
//! serialized back. Everything the model does not understand stays in the tree
//! as-is, so unknown markup survives a round trip.
//!
//! Text content is kept exactly as written: no trimming, no whitespace
//! normalization. Entity references are decoded on read and re-escaped on write.

use crate::common::xml::{escape_attr, escape_text, resolve_entity, unescape_xml};
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// A node in an XML element's child list.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// Nested element
    Element(XmlElement),
    /// Character data, unescaped
    Text(String),
    /// CDATA section content
    CData(String),
    /// Comment content (between `<!--` and `-->`)
    Comment(String),
    /// Processing instruction content (between `<?` and `?>`)
    ProcessingInstruction(String),
}

impl XmlNode {
    /// Get the element if this node is one.
    #[inline]
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get the element mutably if this node is one.
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Check whether this node is text made only of whitespace.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, XmlNode::Text(t) if t.chars().all(char::is_whitespace))
    }

    fn write_xml(&self, output: &mut String) {
        match self {
            XmlNode::Element(e) => e.write_xml(output),
            XmlNode::Text(t) => output.push_str(&escape_text(t)),
            XmlNode::CData(t) => {
                output.push_str("<![CDATA[");
                output.push_str(t);
                output.push_str("]]>");
            },
            XmlNode::Comment(t) => {
                output.push_str("<!--");
                output.push_str(t);
                output.push_str("-->");
            },
            XmlNode::ProcessingInstruction(t) => {
                output.push_str("<?");
                output.push_str(t);
                output.push_str("?>");
            },
        }
    }
}

/// An XML element with its qualified name, ordered attributes, and children.
///
/// Names are kept exactly as they appear in the source, prefix included
/// (`w:p`, `w:tbl`). Attribute order is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create a new element with no attributes or children.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_string();
        let mut element = Self::new(name);

        for attr in start.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?.into_owned();
            element.attributes.push((key, value));
        }

        Ok(element)
    }

    /// Get the qualified name (e.g. `w:p`).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the local name, without namespace prefix.
    pub fn local_name(&self) -> &str {
        match self.name.rfind(':') {
            Some(pos) => &self.name[pos + 1..],
            None => &self.name,
        }
    }

    /// Check the qualified name.
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Get an attribute value by qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attribute<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Get all attributes in source order.
    #[inline]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Get the child nodes.
    #[inline]
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Get the child nodes mutably.
    #[inline]
    pub fn children_mut(&mut self) -> &mut Vec<XmlNode> {
        &mut self.children
    }

    /// Take the child nodes, leaving the element empty.
    pub fn take_children(&mut self) -> Vec<XmlNode> {
        std::mem::take(&mut self.children)
    }

    /// Append a child node.
    pub fn push(&mut self, node: XmlNode) {
        self.children.push(node);
    }

    /// Append a child element, builder style.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Append a text node, builder style.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Iterate over child elements, skipping text and other nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// Find the first child element with the given qualified name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|e| e.is(name))
    }

    /// Concatenated text of all descendant text and CDATA nodes.
    pub fn text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Element(e) => e.collect_text(out),
                XmlNode::Text(t) | XmlNode::CData(t) => out.push_str(t),
                _ => {},
            }
        }
    }

    /// Append text, merging with a trailing text node.
    fn push_text(&mut self, text: &str) {
        if let Some(XmlNode::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(XmlNode::Text(text.to_string()));
        }
    }

    /// Serialize this element and its subtree.
    pub fn to_xml_string(&self) -> String {
        let mut xml = String::new();
        self.write_xml(&mut xml);
        xml
    }

    fn write_xml(&self, output: &mut String) {
        output.push('<');
        output.push_str(&self.name);

        for (key, value) in &self.attributes {
            output.push(' ');
            output.push_str(key);
            output.push_str("=\"");
            output.push_str(&escape_attr(value));
            output.push('"');
        }

        if self.children.is_empty() {
            output.push_str("/>");
            return;
        }

        output.push('>');
        for child in &self.children {
            child.write_xml(output);
        }
        output.push_str("</");
        output.push_str(&self.name);
        output.push('>');
    }
}

/// A parsed XML part: everything before the root element, and the root.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlPart {
    /// Raw markup preceding the root (declaration, whitespace, comments)
    prolog: String,
    root: XmlElement,
}

impl XmlPart {
    /// Create a part around a root element with the standard OOXML declaration.
    pub fn new(root: XmlElement) -> Self {
        Self {
            prolog: "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n".to_string(),
            root,
        }
    }

    /// Parse an XML part from bytes.
    ///
    /// The input must be UTF-8 encoded, which OOXML producers always use.
    pub fn from_bytes(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut prolog = String::new();
        let mut root = None;

        loop {
            let event = match reader.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(e) => {
                    return Err(OoxmlError::Xml(format!(
                        "Error at position {}: {}",
                        reader.error_position(),
                        e
                    )));
                },
            };

            match event {
                Event::Start(ref e) => {
                    stack.push(XmlElement::from_start(e)?);
                },
                Event::Empty(ref e) => {
                    let element = XmlElement::from_start(e)?;
                    Self::attach(&mut stack, &mut root, element);
                },
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| OoxmlError::Xml("Unbalanced end tag".to_string()))?;
                    Self::attach(&mut stack, &mut root, element);
                },
                Event::Text(ref t) => {
                    let raw = std::str::from_utf8(t)?;
                    match stack.last_mut() {
                        Some(current) => current.push_text(&unescape_xml(raw)),
                        None if root.is_none() => prolog.push_str(raw),
                        None => {},
                    }
                },
                Event::GeneralRef(ref r) => {
                    let name = std::str::from_utf8(r)?;
                    let resolved =
                        resolve_entity(name).unwrap_or_else(|| format!("&{};", name));
                    if let Some(current) = stack.last_mut() {
                        current.push_text(&resolved);
                    }
                },
                Event::CData(ref t) => {
                    if let Some(current) = stack.last_mut() {
                        current.push(XmlNode::CData(std::str::from_utf8(t)?.to_string()));
                    }
                },
                Event::Comment(ref t) => {
                    let text = std::str::from_utf8(t)?;
                    match stack.last_mut() {
                        Some(current) => current.push(XmlNode::Comment(text.to_string())),
                        None if root.is_none() => {
                            prolog.push_str("<!--");
                            prolog.push_str(text);
                            prolog.push_str("-->");
                        },
                        None => {},
                    }
                },
                Event::PI(ref t) => {
                    let text = std::str::from_utf8(t)?;
                    match stack.last_mut() {
                        Some(current) => {
                            current.push(XmlNode::ProcessingInstruction(text.to_string()))
                        },
                        None if root.is_none() => {
                            prolog.push_str("<?");
                            prolog.push_str(text);
                            prolog.push_str("?>");
                        },
                        None => {},
                    }
                },
                Event::Decl(ref d) => {
                    prolog.push_str("<?");
                    prolog.push_str(std::str::from_utf8(d)?);
                    prolog.push_str("?>");
                },
                Event::DocType(ref d) => {
                    prolog.push_str("<!DOCTYPE ");
                    prolog.push_str(std::str::from_utf8(d)?);
                    prolog.push('>');
                },
                Event::Eof => break,
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(OoxmlError::Xml(format!(
                "Unclosed element <{}>",
                stack[stack.len() - 1].name()
            )));
        }

        let root = root.ok_or_else(|| OoxmlError::Xml("No root element found".to_string()))?;
        Ok(Self { prolog, root })
    }

    fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
        match stack.last_mut() {
            Some(parent) => parent.push(XmlNode::Element(element)),
            None => *root = Some(element),
        }
    }

    /// Get the root element.
    #[inline]
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Get the root element mutably.
    #[inline]
    pub fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.root
    }

    /// Serialize the part back to UTF-8 bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut xml = String::with_capacity(self.prolog.len() + 4096);
        xml.push_str(&self.prolog);
        self.root.write_xml(&mut xml);
        xml.into_bytes()
    }
}

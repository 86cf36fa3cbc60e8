/// Block-level content shared by the document body, headers, footers, and cells.
///
/// A story is an ordered list of blocks stored in one XML part: the body of
/// `/word/document.xml`, or the root of a header/footer part. Paragraphs and
/// tables are parsed into typed values; everything else (section properties,
/// content controls, bookmarks) is kept as opaque XML in its original position.
use crate::ooxml::docx::paragraph::Paragraph;
use crate::ooxml::docx::table::Table;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::xml::{XmlElement, XmlNode, XmlPart};

const PARAGRAPH: &str = "w:p";

/// One block of a story or table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockItem {
    /// A `<w:p>` paragraph
    Paragraph(Paragraph),
    /// A `<w:tbl>` table
    Table(Table),
    /// Anything else, kept verbatim
    Other(XmlNode),
}

impl BlockItem {
    /// Get the paragraph if this block is one.
    #[inline]
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            BlockItem::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    /// Get the table if this block is one.
    #[inline]
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            BlockItem::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Visit every paragraph in this block, descending into tables.
    pub fn for_each_paragraph_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Paragraph),
    {
        match self {
            BlockItem::Paragraph(p) => f(p),
            BlockItem::Table(t) => t.for_each_paragraph_mut(f),
            BlockItem::Other(_) => {},
        }
    }

    fn to_node(&self) -> XmlNode {
        match self {
            BlockItem::Paragraph(p) => XmlNode::Element(p.to_element()),
            BlockItem::Table(t) => XmlNode::Element(t.to_element()),
            BlockItem::Other(node) => node.clone(),
        }
    }
}

/// Parse child nodes of a block container into blocks.
///
/// Whitespace-only text between blocks is dropped.
pub(crate) fn blocks_from_nodes(nodes: Vec<XmlNode>) -> Vec<BlockItem> {
    nodes
        .into_iter()
        .filter(|node| !node.is_blank_text())
        .map(|node| match node {
            XmlNode::Element(e) if e.is(PARAGRAPH) => BlockItem::Paragraph(Paragraph::from_element(e)),
            XmlNode::Element(e) if Table::is_table(&e) => BlockItem::Table(Table::from_element(e)),
            other => BlockItem::Other(other),
        })
        .collect()
}

/// Serialize blocks back into child nodes.
pub(crate) fn blocks_to_nodes(blocks: &[BlockItem]) -> Vec<XmlNode> {
    blocks.iter().map(BlockItem::to_node).collect()
}

/// Where the block container sits inside the part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    /// The root element holds the blocks (`<w:hdr>`, `<w:ftr>`)
    Root,
    /// A direct child of the root holds the blocks (`<w:body>` in `<w:document>`)
    Child(usize),
}

/// An ordered list of blocks backed by one XML part.
#[derive(Debug, Clone)]
pub struct Story {
    /// The part with the container's children moved into `blocks`
    part: XmlPart,
    container: Container,
    blocks: Vec<BlockItem>,
}

impl Story {
    /// Parse a story whose blocks live directly under the root element.
    ///
    /// `root_name` is the expected root (e.g. `w:hdr`).
    pub fn from_root(xml: &[u8], root_name: &str) -> Result<Self> {
        let mut part = XmlPart::from_bytes(xml)?;
        if !part.root().is(root_name) {
            return Err(OoxmlError::InvalidFormat(format!(
                "Expected <{}> root, found <{}>",
                root_name,
                part.root().name()
            )));
        }

        let blocks = blocks_from_nodes(part.root_mut().take_children());
        Ok(Self {
            part,
            container: Container::Root,
            blocks,
        })
    }

    /// Parse a story whose blocks live in a child of the root element.
    ///
    /// For the main document this is `<w:body>` inside `<w:document>`.
    pub fn from_child(xml: &[u8], root_name: &str, container_name: &str) -> Result<Self> {
        let mut part = XmlPart::from_bytes(xml)?;
        if !part.root().is(root_name) {
            return Err(OoxmlError::InvalidFormat(format!(
                "Expected <{}> root, found <{}>",
                root_name,
                part.root().name()
            )));
        }

        let index = part
            .root()
            .children()
            .iter()
            .position(|node| node.as_element().is_some_and(|e| e.is(container_name)))
            .ok_or_else(|| {
                OoxmlError::InvalidFormat(format!("<{}> has no <{}>", root_name, container_name))
            })?;

        let blocks = match part.root_mut().children_mut()[index].as_element_mut() {
            Some(container) => blocks_from_nodes(container.take_children()),
            None => Vec::new(),
        };

        Ok(Self {
            part,
            container: Container::Child(index),
            blocks,
        })
    }

    /// Get the blocks in document order.
    #[inline]
    pub fn blocks(&self) -> &[BlockItem] {
        &self.blocks
    }

    /// Get the blocks mutably.
    #[inline]
    pub fn blocks_mut(&mut self) -> &mut Vec<BlockItem> {
        &mut self.blocks
    }

    /// Get the top-level paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(BlockItem::as_paragraph)
    }

    /// Get the top-level tables.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(BlockItem::as_table)
    }

    /// Get the top-level tables mutably.
    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.blocks.iter_mut().filter_map(|block| match block {
            BlockItem::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Visit every paragraph of the story, including those inside tables.
    pub fn for_each_paragraph_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Paragraph),
    {
        for block in &mut self.blocks {
            block.for_each_paragraph_mut(f);
        }
    }

    /// Get all text of the story.
    ///
    /// Top-level paragraphs and table cells, one line per paragraph.
    pub fn text(&self) -> String {
        let mut lines = Vec::new();
        for block in &self.blocks {
            match block {
                BlockItem::Paragraph(p) => lines.push(p.text()),
                BlockItem::Table(t) => {
                    for row in t.rows() {
                        for cell in row.cells() {
                            lines.extend(cell.paragraphs().map(Paragraph::text));
                        }
                    }
                },
                BlockItem::Other(_) => {},
            }
        }
        lines.join("\n")
    }

    /// Find all `<w:sectPr>` elements of the story, in document order.
    ///
    /// Covers the body-level section properties and those carried in the
    /// paragraph properties of section-break paragraphs.
    pub fn section_properties(&self) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        for block in &self.blocks {
            match block {
                BlockItem::Paragraph(p) => {
                    if let Some(sect_pr) = p.properties().and_then(|ppr| ppr.child("w:sectPr")) {
                        found.push(sect_pr);
                    }
                },
                BlockItem::Other(XmlNode::Element(e)) if e.is("w:sectPr") => found.push(e),
                _ => {},
            }
        }
        found
    }

    /// Serialize the story back into its part's XML.
    pub fn to_xml_bytes(&self) -> Vec<u8> {
        let mut part = self.part.clone();
        let nodes = blocks_to_nodes(&self.blocks);
        match self.container {
            Container::Root => part.root_mut().children_mut().extend(nodes),
            Container::Child(index) => {
                if let Some(container) = part.root_mut().children_mut()[index].as_element_mut() {
                    container.children_mut().extend(nodes);
                }
            },
        }
        part.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT_XML: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        "\r\n",
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        r#"<w:body><w:p><w:r><w:t>Invoice {{invoice_no}}</w:t></w:r></w:p>"#,
        r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>{{customer}}</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        r#"<w:sectPr><w:headerReference w:type="default" r:id="rId7"/></w:sectPr></w:body></w:document>"#,
    );

    #[test]
    fn test_body_blocks() {
        let story = Story::from_child(DOCUMENT_XML.as_bytes(), "w:document", "w:body").unwrap();
        assert_eq!(story.blocks().len(), 3);
        assert_eq!(story.paragraphs().count(), 1);
        assert_eq!(story.tables().count(), 1);
        assert_eq!(story.text(), "Invoice {{invoice_no}}\n{{customer}}");
    }

    #[test]
    fn test_untouched_story_round_trip() {
        let story = Story::from_child(DOCUMENT_XML.as_bytes(), "w:document", "w:body").unwrap();
        assert_eq!(String::from_utf8(story.to_xml_bytes()).unwrap(), DOCUMENT_XML);
    }

    #[test]
    fn test_section_properties() {
        let story = Story::from_child(DOCUMENT_XML.as_bytes(), "w:document", "w:body").unwrap();
        let sections = story.section_properties();
        assert_eq!(sections.len(), 1);
        assert!(sections[0].child("w:headerReference").is_some());
    }

    #[test]
    fn test_header_root_story() {
        let xml = r#"<w:hdr xmlns:w="x"><w:p><w:r><w:t>{{company}}</w:t></w:r></w:p></w:hdr>"#;
        let mut story = Story::from_root(xml.as_bytes(), "w:hdr").unwrap();
        story.for_each_paragraph_mut(&mut |p: &mut Paragraph| p.collapse_runs("ACME"));

        let out = String::from_utf8(story.to_xml_bytes()).unwrap();
        assert_eq!(out, r#"<w:hdr xmlns:w="x"><w:p><w:r><w:t>ACME</w:t></w:r></w:p></w:hdr>"#);
    }

    #[test]
    fn test_wrong_root() {
        let xml = r#"<w:ftr xmlns:w="x"/>"#;
        assert!(Story::from_root(xml.as_bytes(), "w:hdr").is_err());
        assert!(Story::from_child(xml.as_bytes(), "w:ftr", "w:body").is_err());
    }
}

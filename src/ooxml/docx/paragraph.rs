/// Paragraph and Run structures for Word documents.
use crate::common::xml::is_xml_char;
use crate::ooxml::xml::{XmlElement, XmlNode};
use smallvec::SmallVec;

const PARAGRAPH: &str = "w:p";
const PARAGRAPH_PROPERTIES: &str = "w:pPr";
const RUN: &str = "w:r";
const RUN_PROPERTIES: &str = "w:rPr";
const TEXT: &str = "w:t";

/// A run of text inside a paragraph.
///
/// Represents a `<w:r>` element. The element is kept whole, so formatting,
/// drawings, field characters, and anything else inside the run survive
/// untouched unless the owning paragraph is rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    element: XmlElement,
}

impl Run {
    /// Wrap an existing `<w:r>` element.
    pub fn from_element(element: XmlElement) -> Self {
        Self { element }
    }

    /// Build a plain run (no run properties) holding `text`.
    ///
    /// Tabs become `<w:tab/>`. Line feeds, carriage returns (`\r\n` counts
    /// once), vertical tabs, and form feeds become `<w:br/>`. Other characters
    /// XML cannot carry are dropped. Everything else goes into `<w:t>`
    /// elements, marked `xml:space="preserve"` when they start or end with
    /// whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use docfill::ooxml::docx::Run;
    ///
    /// let run = Run::from_text("Total:\t42");
    /// assert_eq!(run.text(), "Total:\t42");
    ///
    /// let run = Run::from_text("1 Main St\u{b}London\r\nUK");
    /// assert_eq!(run.text(), "1 Main St\nLondon\nUK");
    /// ```
    pub fn from_text(text: &str) -> Self {
        let mut element = XmlElement::new(RUN);
        let mut segment = String::new();
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '\t' => {
                    Self::push_text_element(&mut element, &mut segment);
                    element.push(XmlNode::Element(XmlElement::new("w:tab")));
                },
                '\n' | '\r' | '\u{b}' | '\u{c}' => {
                    if ch == '\r' {
                        chars.next_if_eq(&'\n');
                    }
                    Self::push_text_element(&mut element, &mut segment);
                    element.push(XmlNode::Element(XmlElement::new("w:br")));
                },
                c if is_xml_char(c) => segment.push(c),
                _ => {},
            }
        }
        Self::push_text_element(&mut element, &mut segment);

        Self { element }
    }

    fn push_text_element(run: &mut XmlElement, segment: &mut String) {
        if segment.is_empty() {
            return;
        }

        let mut t = XmlElement::new(TEXT);
        if segment.starts_with(char::is_whitespace) || segment.ends_with(char::is_whitespace) {
            t.set_attribute("xml:space", "preserve");
        }
        run.push(XmlNode::Element(t.with_text(std::mem::take(segment))));
    }

    /// Get the text of this run.
    ///
    /// `<w:t>` content is taken verbatim, `<w:tab/>` reads as `\t`,
    /// `<w:br/>` and `<w:cr/>` read as `\n`, `<w:noBreakHyphen/>` as `-`.
    /// Field instructions, drawings, and other content contribute nothing.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for child in self.element.child_elements() {
            match child.name() {
                TEXT => text.push_str(&child.text()),
                "w:tab" => text.push('\t'),
                "w:br" | "w:cr" => text.push('\n'),
                "w:noBreakHyphen" => text.push('-'),
                _ => {},
            }
        }
        text
    }

    /// Get the run properties (`<w:rPr>`), if any.
    pub fn properties(&self) -> Option<&XmlElement> {
        self.element.child(RUN_PROPERTIES)
    }

    /// Get the underlying `<w:r>` element.
    #[inline]
    pub fn element(&self) -> &XmlElement {
        &self.element
    }

    /// Consume the run and return its element.
    #[inline]
    pub fn into_element(self) -> XmlElement {
        self.element
    }
}

/// Content of a paragraph: direct runs, or anything else kept verbatim
/// (paragraph properties, hyperlinks, bookmarks, content controls, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// A direct `<w:r>` child
    Run(Run),
    /// Any other child node
    Other(XmlNode),
}

/// A paragraph in a Word document.
///
/// Represents a `<w:p>` element. The paragraph's text is the concatenated text
/// of its direct runs.
///
/// # Example
///
/// ```
/// use docfill::ooxml::docx::Paragraph;
///
/// let mut para = Paragraph::with_text("Hello {{name}}");
/// assert_eq!(para.text(), "Hello {{name}}");
///
/// para.collapse_runs("Hello Ada");
/// assert_eq!(para.text(), "Hello Ada");
/// assert_eq!(para.run_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    /// The `<w:p>` element with its children moved into `content`
    shell: XmlElement,
    content: Vec<Inline>,
}

impl Paragraph {
    /// Create an empty paragraph.
    pub fn new() -> Self {
        Self {
            shell: XmlElement::new(PARAGRAPH),
            content: Vec::new(),
        }
    }

    /// Create a paragraph holding a single plain run.
    pub fn with_text(text: &str) -> Self {
        let mut para = Self::new();
        para.content.push(Inline::Run(Run::from_text(text)));
        para
    }

    /// Build a paragraph from a `<w:p>` element.
    ///
    /// Whitespace-only text nodes between children are dropped.
    pub fn from_element(mut element: XmlElement) -> Self {
        let content = element
            .take_children()
            .into_iter()
            .filter(|node| !node.is_blank_text())
            .map(|node| match node {
                XmlNode::Element(e) if e.is(RUN) => Inline::Run(Run::from_element(e)),
                other => Inline::Other(other),
            })
            .collect();

        Self {
            shell: element,
            content,
        }
    }

    /// Get the text content of this paragraph.
    ///
    /// Concatenates the text of all direct runs in order.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for run in self.runs() {
            text.push_str(&run.text());
        }
        text
    }

    /// Get the direct runs of this paragraph.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().filter_map(|inline| match inline {
            Inline::Run(run) => Some(run),
            Inline::Other(_) => None,
        })
    }

    /// Get the number of direct runs.
    pub fn run_count(&self) -> usize {
        self.runs().count()
    }

    /// Get the paragraph content in document order.
    #[inline]
    pub fn content(&self) -> &[Inline] {
        &self.content
    }

    /// Get the paragraph properties (`<w:pPr>`), if any.
    pub fn properties(&self) -> Option<&XmlElement> {
        self.content.iter().find_map(|inline| match inline {
            Inline::Other(XmlNode::Element(e)) if e.is(PARAGRAPH_PROPERTIES) => Some(e),
            _ => None,
        })
    }

    /// Replace every run with one plain run holding `text`.
    ///
    /// The new run takes the position of the first existing run (or goes at the
    /// end if there were none) and carries no run properties. Non-run content
    /// keeps its place.
    pub fn collapse_runs(&mut self, text: &str) {
        let position = self
            .content
            .iter()
            .position(|inline| matches!(inline, Inline::Run(_)))
            .unwrap_or(self.content.len());

        // Non-run items before the first run keep their indices
        self.content.retain(|inline| !matches!(inline, Inline::Run(_)));
        self.content
            .insert(position, Inline::Run(Run::from_text(text)));
    }

    /// Serialize back to a `<w:p>` element.
    pub fn to_element(&self) -> XmlElement {
        let mut element = self.shell.clone();
        let children: SmallVec<[XmlNode; 8]> = self
            .content
            .iter()
            .map(|inline| match inline {
                Inline::Run(run) => XmlNode::Element(run.element().clone()),
                Inline::Other(node) => node.clone(),
            })
            .collect();
        element.children_mut().extend(children);
        element
    }
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::xml::XmlPart;

    fn parse_paragraph(xml: &str) -> Paragraph {
        let part = XmlPart::from_bytes(xml.as_bytes()).unwrap();
        Paragraph::from_element(part.root().clone())
    }

    #[test]
    fn test_text_spans_runs() {
        let para = parse_paragraph(
            r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>{{cust</w:t></w:r><w:r><w:t>omer}}</w:t></w:r></w:p>"#,
        );

        assert_eq!(para.run_count(), 2);
        assert_eq!(para.text(), "{{customer}}");
        assert!(para.properties().is_some());
    }

    #[test]
    fn test_run_text_special_elements() {
        let para = parse_paragraph(
            r#"<w:p><w:r><w:t xml:space="preserve">a </w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t><w:instrText> PAGE </w:instrText></w:r></w:p>"#,
        );
        assert_eq!(para.text(), "a \tb\nc");
    }

    #[test]
    fn test_hyperlink_runs_are_not_direct() {
        let para = parse_paragraph(
            r#"<w:p><w:r><w:t>See </w:t></w:r><w:hyperlink r:id="rId5"><w:r><w:t>link</w:t></w:r></w:hyperlink></w:p>"#,
        );
        assert_eq!(para.run_count(), 1);
        assert_eq!(para.text(), "See ");
    }

    #[test]
    fn test_collapse_runs_position() {
        let mut para = parse_paragraph(
            r#"<w:p><w:pPr/><w:bookmarkStart w:id="0"/><w:r><w:rPr><w:i/></w:rPr><w:t>x</w:t></w:r><w:bookmarkEnd w:id="0"/><w:r><w:t>y</w:t></w:r></w:p>"#,
        );
        para.collapse_runs("z");

        assert_eq!(
            para.to_element().to_xml_string(),
            r#"<w:p><w:pPr/><w:bookmarkStart w:id="0"/><w:r><w:t>z</w:t></w:r><w:bookmarkEnd w:id="0"/></w:p>"#
        );
        assert!(para.runs().all(|run| run.properties().is_none()));
    }

    #[test]
    fn test_run_from_text_line_breaks_and_controls() {
        let run = Run::from_text("a\rb\r\nc\u{b}d\u{c}e");
        assert_eq!(
            run.element().to_xml_string(),
            "<w:r><w:t>a</w:t><w:br/><w:t>b</w:t><w:br/><w:t>c</w:t><w:br/><w:t>d</w:t><w:br/><w:t>e</w:t></w:r>"
        );

        let run = Run::from_text("x\u{1}y\u{1f}\u{fffe}");
        assert_eq!(run.element().to_xml_string(), "<w:r><w:t>xy</w:t></w:r>");
    }

    #[test]
    fn test_run_from_text_markup() {
        let run = Run::from_text(" lead\tmid\nend");
        assert_eq!(
            run.element().to_xml_string(),
            r#"<w:r><w:t xml:space="preserve"> lead</w:t><w:tab/><w:t>mid</w:t><w:br/><w:t>end</w:t></w:r>"#
        );
        assert_eq!(run.text(), " lead\tmid\nend");
    }

    #[test]
    fn test_untouched_paragraph_round_trip() {
        let xml = r#"<w:p w:rsidR="00AB"><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Invoice</w:t></w:r></w:p>"#;
        let para = parse_paragraph(xml);
        assert_eq!(para.to_element().to_xml_string(), xml);
    }
}

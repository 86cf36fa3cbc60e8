/// Section - document section and its header/footer references.
use crate::ooxml::docx::enums::{HeaderFooterKind, WdHeaderFooter};
use crate::ooxml::xml::XmlElement;

/// A reference from a section to a header or footer part.
///
/// Corresponds to `<w:headerReference w:type="..." r:id="..."/>` or
/// `<w:footerReference .../>` inside `<w:sectPr>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFooterRef {
    kind: HeaderFooterKind,
    variant: WdHeaderFooter,
    r_id: String,
}

impl HeaderFooterRef {
    /// Header or footer.
    #[inline]
    pub fn kind(&self) -> HeaderFooterKind {
        self.kind
    }

    /// Default, first page, or even page.
    #[inline]
    pub fn variant(&self) -> WdHeaderFooter {
        self.variant
    }

    /// Relationship ID of the referenced part.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }
}

/// A document section.
///
/// Built from a `<w:sectPr>` element. Only the header/footer references are
/// interpreted; page setup and other properties stay in the XML untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    references: Vec<HeaderFooterRef>,
}

impl Section {
    /// Read the header/footer references of a `<w:sectPr>` element.
    ///
    /// References without an `r:id` are skipped. A missing or unknown
    /// `w:type` is treated as `default`.
    pub fn from_sect_pr(sect_pr: &XmlElement) -> Self {
        let mut references = Vec::new();

        for child in sect_pr.child_elements() {
            let kind = match child.name() {
                "w:headerReference" => HeaderFooterKind::Header,
                "w:footerReference" => HeaderFooterKind::Footer,
                _ => continue,
            };

            let Some(r_id) = child.attribute("r:id") else {
                continue;
            };
            let variant = child
                .attribute("w:type")
                .and_then(WdHeaderFooter::from_xml)
                .unwrap_or_default();

            references.push(HeaderFooterRef {
                kind,
                variant,
                r_id: r_id.to_string(),
            });
        }

        Self { references }
    }

    /// Get all header and footer references in source order.
    #[inline]
    pub fn references(&self) -> &[HeaderFooterRef] {
        &self.references
    }

    /// Get the header references.
    pub fn header_references(&self) -> impl Iterator<Item = &HeaderFooterRef> {
        self.references
            .iter()
            .filter(|r| r.kind == HeaderFooterKind::Header)
    }

    /// Get the footer references.
    pub fn footer_references(&self) -> impl Iterator<Item = &HeaderFooterRef> {
        self.references
            .iter()
            .filter(|r| r.kind == HeaderFooterKind::Footer)
    }
}

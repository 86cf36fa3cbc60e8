/// Header and footer support for Word documents.
///
/// Headers and footers are stored in separate XML parts (`/word/header*.xml`
/// and `/word/footer*.xml`) referenced from the section properties. Their
/// content is a story of paragraphs and tables, just like the body.
use crate::ooxml::docx::enums::{HeaderFooterKind, WdHeaderFooter};
use crate::ooxml::docx::story::Story;
use crate::ooxml::error::Result;
use crate::ooxml::opc::PackURI;

/// A header or footer part in a Word document.
#[derive(Debug, Clone)]
pub struct HeaderFooter {
    partname: PackURI,
    kind: HeaderFooterKind,
    variant: WdHeaderFooter,
    story: Story,
}

impl HeaderFooter {
    /// Parse a header or footer part.
    ///
    /// # Arguments
    ///
    /// * `partname` - Name of the part in the package
    /// * `kind` - Header or footer
    /// * `variant` - The first section reference that named this part
    /// * `blob` - The part's XML
    pub fn from_blob(
        partname: PackURI,
        kind: HeaderFooterKind,
        variant: WdHeaderFooter,
        blob: &[u8],
    ) -> Result<Self> {
        let story = Story::from_root(blob, kind.root_element())?;
        Ok(Self {
            partname,
            kind,
            variant,
            story,
        })
    }

    /// Get the partname (e.g. `/word/header1.xml`).
    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

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

    /// Get the content of this part.
    #[inline]
    pub fn story(&self) -> &Story {
        &self.story
    }

    /// Get the content of this part mutably.
    #[inline]
    pub fn story_mut(&mut self) -> &mut Story {
        &mut self.story
    }

    /// Get all text of this header/footer.
    pub fn text(&self) -> String {
        self.story.text()
    }
}

/// Document - the main API for loading, editing, and saving Word document content.
use crate::ooxml::docx::header_footer::HeaderFooter;
use crate::ooxml::docx::paragraph::Paragraph;
use crate::ooxml::docx::section::Section;
use crate::ooxml::docx::story::Story;
use crate::ooxml::docx::table::Table;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::{OpcPackage, PackURI};
use std::collections::{HashMap, HashSet};
use std::io::{Read, Seek};
use std::path::Path;

/// A Word document loaded for editing.
///
/// Holds the package in memory together with the parsed body and every header
/// and footer part the sections reference. Only those parts are rewritten on
/// save; all other parts (styles, numbering, media, ...) are copied unchanged.
///
/// # Examples
///
/// ```rust,no_run
/// use docfill::ooxml::docx::Document;
///
/// let mut doc = Document::open("template.docx")?;
/// println!("Document text: {}", doc.text());
///
/// for table in doc.tables_mut() {
///     println!("Table with {} rows", table.row_count());
/// }
///
/// doc.save("out.docx")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Document {
    package: OpcPackage,
    main_partname: PackURI,
    body: Story,
    sections: Vec<Section>,
    headers_footers: Vec<HeaderFooter>,
}

impl Document {
    /// Open a `.docx` file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_package(OpcPackage::open(path)?)
    }

    /// Load a document from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_package(OpcPackage::from_reader(reader)?)
    }

    /// Load a document from an in-memory `.docx` archive.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_package(OpcPackage::from_bytes(data)?)
    }

    /// Build a document from an opened package.
    ///
    /// The main part must be a WordprocessingML document or template
    /// (macro-enabled variants included).
    pub fn from_package(package: OpcPackage) -> Result<Self> {
        let main_partname = package.main_document_partname()?;
        let content_type = package.content_type(&main_partname)?;
        if !ct::WML_MAIN_PARTS.contains(&content_type) {
            return Err(OoxmlError::InvalidContentType {
                expected: ct::WML_DOCUMENT_MAIN.to_string(),
                got: content_type.to_string(),
            });
        }

        let body = Story::from_child(package.blob(&main_partname)?, "w:document", "w:body")?;
        let sections: Vec<Section> = body
            .section_properties()
            .into_iter()
            .map(Section::from_sect_pr)
            .collect();

        let rels = package.part_rels(&main_partname)?;
        let mut headers_footers = Vec::new();
        let mut seen = HashSet::new();

        for reference in sections.iter().flat_map(Section::references) {
            let rel = rels.get(reference.r_id()).ok_or_else(|| {
                OoxmlError::InvalidRelationship(format!(
                    "No relationship '{}' for {} reference",
                    reference.r_id(),
                    reference.kind()
                ))
            })?;
            let partname = rel.target_partname()?;

            // Parts shared between sections are loaded once
            if !seen.insert(partname.clone()) {
                continue;
            }

            let blob = package.blob(&partname)?;
            log::debug!("loading {} part {}", reference.kind(), partname);
            headers_footers.push(HeaderFooter::from_blob(
                partname,
                reference.kind(),
                reference.variant(),
                blob,
            )?);
        }

        log::debug!(
            "loaded {}: {} blocks, {} sections, {} header/footer parts",
            main_partname,
            body.blocks().len(),
            sections.len(),
            headers_footers.len()
        );

        Ok(Self {
            package,
            main_partname,
            body,
            sections,
            headers_footers,
        })
    }

    /// Get the partname of the main document part.
    #[inline]
    pub fn main_partname(&self) -> &PackURI {
        &self.main_partname
    }

    /// Get the underlying package.
    #[inline]
    pub fn package(&self) -> &OpcPackage {
        &self.package
    }

    /// Get the document body.
    #[inline]
    pub fn body(&self) -> &Story {
        &self.body
    }

    /// Get the document body mutably.
    #[inline]
    pub fn body_mut(&mut self) -> &mut Story {
        &mut self.body
    }

    /// Get the sections, in document order.
    #[inline]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Get every header and footer part referenced by a section.
    #[inline]
    pub fn headers_footers(&self) -> &[HeaderFooter] {
        &self.headers_footers
    }

    /// Get every referenced header and footer part mutably.
    #[inline]
    pub fn headers_footers_mut(&mut self) -> &mut [HeaderFooter] {
        &mut self.headers_footers
    }

    /// Get the top-level body paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.paragraphs()
    }

    /// Get the top-level body tables.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.tables()
    }

    /// Get the top-level body tables mutably.
    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.body.tables_mut()
    }

    /// Get all body text: top-level paragraphs and table cells, one line each.
    pub fn text(&self) -> String {
        self.body.text()
    }

    /// Serialize the document to `.docx` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut replacements = HashMap::with_capacity(self.headers_footers.len() + 1);
        replacements.insert(self.main_partname.clone(), self.body.to_xml_bytes());
        for hf in &self.headers_footers {
            replacements.insert(hf.partname().clone(), hf.story().to_xml_bytes());
        }

        Ok(self.package.to_bytes_replacing(&replacements)?)
    }

    /// Save the document to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::enums::{HeaderFooterKind, WdHeaderFooter};
    use crate::testing::{DocxBuilder, para, table};

    #[test]
    fn test_open_body() {
        let bytes = DocxBuilder::new()
            .body(&para("Hello"))
            .body(&table(&[&["a", "b"], &["c", "d"]]))
            .build();
        let doc = Document::from_bytes(bytes).unwrap();

        assert_eq!(doc.main_partname().as_str(), "/word/document.xml");
        assert_eq!(doc.paragraphs().count(), 1);
        assert_eq!(doc.tables().count(), 1);
        assert_eq!(doc.text(), "Hello\na\nb\nc\nd");
        assert_eq!(doc.sections().len(), 1);
    }

    #[test]
    fn test_headers_and_footers_loaded() {
        let bytes = DocxBuilder::new()
            .body(&para("body"))
            .header("default", &para("Head {{company}}"))
            .header("first", &para("First page"))
            .footer("default", &para("Page footer"))
            .build();
        let doc = Document::from_bytes(bytes).unwrap();

        let parts = doc.headers_footers();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].kind(), HeaderFooterKind::Header);
        assert_eq!(parts[0].text(), "Head {{company}}");
        assert_eq!(parts[1].variant(), WdHeaderFooter::FirstPage);
        assert_eq!(parts[2].kind(), HeaderFooterKind::Footer);
        assert_eq!(parts[2].partname().as_str(), "/word/footer1.xml");
    }

    #[test]
    fn test_template_content_type_accepted() {
        let bytes = DocxBuilder::new()
            .main_content_type(ct::WML_TEMPLATE_MAIN)
            .body(&para("x"))
            .build();
        assert!(Document::from_bytes(bytes).is_ok());
    }

    #[test]
    fn test_wrong_content_type_rejected() {
        let bytes = DocxBuilder::new()
            .main_content_type("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml")
            .body(&para("x"))
            .build();
        assert!(matches!(
            Document::from_bytes(bytes),
            Err(OoxmlError::InvalidContentType { .. })
        ));
    }

    #[test]
    fn test_save_round_trip_keeps_other_parts() {
        let bytes = DocxBuilder::new()
            .body(&para("keep me"))
            .footer("default", &para("foot"))
            .build();
        let original = OpcPackage::from_bytes(bytes.clone()).unwrap();
        let doc = Document::from_bytes(bytes).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        doc.save(&path).unwrap();

        let reopened = Document::open(&path).unwrap();
        assert_eq!(reopened.text(), "keep me");
        assert_eq!(reopened.headers_footers()[0].text(), "foot");

        let styles = PackURI::new("/word/styles.xml").unwrap();
        assert_eq!(
            reopened.package().blob(&styles).unwrap(),
            original.blob(&styles).unwrap()
        );
        assert_eq!(reopened.package().part_count(), original.part_count());
    }

    #[test]
    fn test_edit_is_saved() {
        let bytes = DocxBuilder::new().body(&para("old")).build();
        let mut doc = Document::from_bytes(bytes).unwrap();
        doc.body_mut()
            .for_each_paragraph_mut(&mut |p: &mut Paragraph| p.collapse_runs("new"));

        let reopened = Document::from_bytes(doc.to_bytes().unwrap()).unwrap();
        assert_eq!(reopened.text(), "new");
    }

    #[test]
    fn test_not_a_package() {
        assert!(Document::from_bytes(b"not a zip".to_vec()).is_err());
    }
}

//! In-memory `.docx` fixtures for unit tests.

use crate::common::xml::escape_text;
use crate::ooxml::docx::enums::HeaderFooterKind;
use crate::ooxml::opc::constants::{content_type as ct, namespace as ns, relationship_type as rt};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const STYLES_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style></w:styles>"#;

/// A paragraph with one run.
pub(crate) fn para(text: &str) -> String {
    split_para(&[text])
}

/// A paragraph with one bold run per piece, so placeholders can straddle runs.
pub(crate) fn split_para(pieces: &[&str]) -> String {
    let runs: String = pieces
        .iter()
        .map(|piece| {
            format!(
                r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r>"#,
                escape_text(piece)
            )
        })
        .collect();
    format!("<w:p>{}</w:p>", runs)
}

/// A table whose cells each hold one single-run paragraph.
pub(crate) fn table(rows: &[&[&str]]) -> String {
    let mut xml = String::from(r#"<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/></w:tblPr>"#);
    for row in rows {
        xml.push_str("<w:tr>");
        for cell in row.iter() {
            xml.push_str("<w:tc><w:tcPr><w:tcW w:w=\"2000\" w:type=\"dxa\"/></w:tcPr>");
            xml.push_str(&para(cell));
            xml.push_str("</w:tc>");
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    xml
}

struct HeaderFooterFixture {
    kind: HeaderFooterKind,
    variant: String,
    content: String,
}

/// Builds a minimal but complete WordprocessingML package.
pub(crate) struct DocxBuilder {
    main_content_type: String,
    body: String,
    headers_footers: Vec<HeaderFooterFixture>,
}

impl DocxBuilder {
    pub(crate) fn new() -> Self {
        Self {
            main_content_type: ct::WML_DOCUMENT_MAIN.to_string(),
            body: String::new(),
            headers_footers: Vec::new(),
        }
    }

    pub(crate) fn main_content_type(mut self, content_type: &str) -> Self {
        self.main_content_type = content_type.to_string();
        self
    }

    /// Append block XML to the body.
    pub(crate) fn body(mut self, xml: &str) -> Self {
        self.body.push_str(xml);
        self
    }

    pub(crate) fn header(self, variant: &str, content: &str) -> Self {
        self.header_footer(HeaderFooterKind::Header, variant, content)
    }

    pub(crate) fn footer(self, variant: &str, content: &str) -> Self {
        self.header_footer(HeaderFooterKind::Footer, variant, content)
    }

    fn header_footer(mut self, kind: HeaderFooterKind, variant: &str, content: &str) -> Self {
        self.headers_footers.push(HeaderFooterFixture {
            kind,
            variant: variant.to_string(),
            content: content.to_string(),
        });
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let decl = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

        let mut overrides = format!(
            r#"<Override PartName="/word/document.xml" ContentType="{}"/><Override PartName="/word/styles.xml" ContentType="{}"/>"#,
            self.main_content_type, STYLES_CONTENT_TYPE
        );
        let mut doc_rels = format!(
            r#"<Relationship Id="rId1" Type="{}" Target="styles.xml"/>"#,
            rt::STYLES
        );
        let mut references = String::new();
        let mut parts = Vec::new();
        let (mut headers, mut footers) = (0, 0);

        for (i, fixture) in self.headers_footers.iter().enumerate() {
            let (number, reltype, content_type) = match fixture.kind {
                HeaderFooterKind::Header => {
                    headers += 1;
                    (headers, rt::HEADER, ct::WML_HEADER)
                },
                HeaderFooterKind::Footer => {
                    footers += 1;
                    (footers, rt::FOOTER, ct::WML_FOOTER)
                },
            };
            let filename = format!("{}{}.xml", fixture.kind, number);
            let r_id = format!("rId{}", 10 + i);

            overrides.push_str(&format!(
                r#"<Override PartName="/word/{}" ContentType="{}"/>"#,
                filename, content_type
            ));
            doc_rels.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                r_id, reltype, filename
            ));
            references.push_str(&format!(
                r#"<{} w:type="{}" r:id="{}"/>"#,
                fixture.kind.reference_element(),
                fixture.variant,
                r_id
            ));
            let root = fixture.kind.root_element();
            parts.push((
                format!("word/{}", filename),
                format!(
                    r#"{}<{} xmlns:w="{}" xmlns:r="{}">{}</{}>"#,
                    decl,
                    root,
                    ns::WML_MAIN,
                    ns::OFC_RELATIONSHIPS,
                    fixture.content,
                    root
                ),
            ));
        }

        let content_types = format!(
            r#"{}<Types xmlns="{}"><Default Extension="rels" ContentType="{}"/><Default Extension="xml" ContentType="{}"/>{}</Types>"#,
            decl,
            ns::OPC_CONTENT_TYPES,
            ct::OPC_RELATIONSHIPS,
            ct::XML,
            overrides
        );
        let package_rels = format!(
            r#"{}<Relationships xmlns="{}"><Relationship Id="rId1" Type="{}" Target="word/document.xml"/></Relationships>"#,
            decl,
            ns::OPC_RELATIONSHIPS,
            rt::OFFICE_DOCUMENT
        );
        let document = format!(
            r#"{}<w:document xmlns:w="{}" xmlns:r="{}"><w:body>{}<w:sectPr>{}<w:pgSz w:w="11906" w:h="16838"/></w:sectPr></w:body></w:document>"#,
            decl,
            ns::WML_MAIN,
            ns::OFC_RELATIONSHIPS,
            self.body,
            references
        );
        let document_rels = format!(
            r#"{}<Relationships xmlns="{}">{}</Relationships>"#,
            decl,
            ns::OPC_RELATIONSHIPS,
            doc_rels
        );

        let mut members = vec![
            ("[Content_Types].xml".to_string(), content_types),
            ("_rels/.rels".to_string(), package_rels),
            ("word/document.xml".to_string(), document),
            ("word/_rels/document.xml.rels".to_string(), document_rels),
            ("word/styles.xml".to_string(), STYLES_XML.to_string()),
        ];
        members.extend(parts);

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, content) in members {
            zip.start_file(name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }
}

//! Fill a loaded document from a context.

use crate::common::Result;
use crate::ooxml::docx::{Document, Paragraph};
use crate::template::context::Context;
use crate::template::report::FillReport;
use crate::template::repeater::expand_sections;
use crate::template::substitute::substitute;
use std::io::{Read, Seek};
use std::path::Path;

/// Fill `document` in place.
///
/// Runs in three passes:
///
/// 1. every top-level body table: expand its repeating sections, then
///    substitute placeholders in all of its cell paragraphs;
/// 2. every header and footer part;
/// 3. every body paragraph, tables included.
///
/// On error the document may be partly filled and should not be saved.
///
/// # Examples
///
/// ```rust,no_run
/// use docfill::{Context, Document, fill};
///
/// let mut doc = Document::open("invoice_template.docx")?;
/// let ctx = Context::from_json(serde_json::json!({
///     "invoice_no": "1001",
///     "items": [{"description": "Widget", "qty": 2}]
/// }))
/// .unwrap_or_default();
///
/// let report = fill(&mut doc, &ctx)?;
/// println!("{} rows emitted", report.rows_emitted());
/// doc.save("invoice_1001.docx")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn fill(document: &mut Document, context: &Context) -> Result<FillReport> {
    let mut report = FillReport::default();
    let mut rewritten = 0;

    {
        let mut count = |p: &mut Paragraph| {
            if substitute(p, context) {
                rewritten += 1;
            }
        };

        for (index, table) in document.tables_mut().enumerate() {
            expand_sections(table, context, index, &mut report)?;
            table.for_each_paragraph_mut(&mut count);
        }

        for part in document.headers_footers_mut() {
            log::debug!("substituting {} {}", part.kind(), part.partname());
            part.story_mut().for_each_paragraph_mut(&mut count);
        }

        document.body_mut().for_each_paragraph_mut(&mut count);
    }

    report.paragraphs_rewritten += rewritten;
    log::debug!(
        "fill done: {} sections expanded, {} unterminated, {} paragraphs rewritten",
        report.expanded.len(),
        report.unterminated.len(),
        report.paragraphs_rewritten
    );
    Ok(report)
}

/// A template document paired with the fill operation.
///
/// Convenience wrapper for the load, fill, save sequence.
///
/// # Examples
///
/// ```rust,no_run
/// use docfill::{Context, TemplateFiller};
///
/// let mut ctx = Context::new();
/// ctx.insert("invoice_no", "1001");
///
/// let mut filler = TemplateFiller::open("template.docx")?;
/// filler.fill(&ctx)?;
/// filler.save("out.docx")?;
/// # Ok::<(), docfill::Error>(())
/// ```
pub struct TemplateFiller {
    document: Document,
}

impl TemplateFiller {
    /// Load a template from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading template {}", path.display());
        Ok(Self {
            document: Document::open(path)?,
        })
    }

    /// Load a template from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Ok(Self {
            document: Document::from_reader(reader)?,
        })
    }

    /// Load a template from in-memory `.docx` bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Ok(Self {
            document: Document::from_bytes(data)?,
        })
    }

    /// Fill the template. See [`fill`].
    pub fn fill(&mut self, context: &Context) -> Result<FillReport> {
        fill(&mut self.document, context)
    }

    /// Save the document to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.document.save(path)?;
        log::debug!("saved {}", path.display());
        Ok(())
    }

    /// Serialize the document to `.docx` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.document.to_bytes()?)
    }

    /// Get the underlying document.
    #[inline]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Take the underlying document.
    pub fn into_document(self) -> Document {
        self.document
    }
}

/// Word (.docx) document support.
///
/// This module provides an editable model of Microsoft Word documents in the
/// Office Open XML (OOXML) format (.docx and .dotx files).
///
/// # Architecture
///
/// The module is organized around these key types:
/// - `Document`: the loaded package, its body, and its header/footer parts
/// - `Story`: an ordered list of blocks (the body, or one header/footer)
/// - `Paragraph`: a paragraph with runs
/// - `Run`: a text run
/// - `Table`: a table with rows and cells
/// - `Section`: header/footer references of a `<w:sectPr>`
///
/// # Example
///
/// ```rust,no_run
/// use docfill::ooxml::docx::Document;
///
/// let doc = Document::open("document.docx")?;
///
/// for para in doc.paragraphs() {
///     println!("Paragraph: {}", para.text());
/// }
///
/// for table in doc.tables() {
///     for row in table.rows() {
///         for cell in row.cells() {
///             println!("Cell: {}", cell.text());
///         }
///     }
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub mod document;
pub mod enums;
pub mod header_footer;
pub mod paragraph;
pub mod section;
pub mod story;
pub mod table;

pub use document::Document;
pub use header_footer::HeaderFooter;
pub use paragraph::{Inline, Paragraph, Run};
pub use section::{HeaderFooterRef, Section};
pub use story::{BlockItem, Story};
pub use table::{Cell, Row, RowContent, Table, TableContent};

//! docfill - fill Word (.docx) templates from structured data
//!
//! This library loads a WordprocessingML package, replaces `{{ placeholder }}`
//! tags in the body, tables, headers, and footers with values from a
//! [`Context`], repeats table rows between `{{#name}}` / `{{/name}}` markers
//! once per record of a list, and saves the result. Everything it does not
//! touch (styles, numbering, images, section layout) is written back as is.
//!
//! # Features
//!
//! - **Placeholders**: dotted paths into nested maps (`{{ customer.name }}`)
//! - **Repeating rows**: `N` records x `R` template rows become `N * R` rows
//! - **Headers and footers**: every variant referenced by the document
//! - **Invoices**: prompted answers, line amounts, taxed totals, output naming
//!
//! # Example - Filling a template
//!
//! ```no_run
//! use docfill::{Context, Document, fill};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx: Context = serde_json::from_str(r#"{
//!     "invoice_no": "1001",
//!     "customer": {"name": "Ada Ltd"},
//!     "items": [
//!         {"description": "Widget A", "qty": 2, "rate": 50, "amount": 100},
//!         {"description": "Widget B", "qty": 1, "rate": 80, "amount": 80}
//!     ],
//!     "total": "180.00"
//! }"#)?;
//!
//! let mut doc = Document::open("invoice_template.docx")?;
//! let report = fill(&mut doc, &ctx)?;
//! println!("{} rows emitted", report.rows_emitted());
//! doc.save("invoice_1001.docx")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Reading a DOCX file
//!
//! ```no_run
//! use docfill::ooxml::docx::Document;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = Document::open("document.docx")?;
//! println!("Document text: {}", doc.text());
//!
//! for part in doc.headers_footers() {
//!     println!("{} {}: {}", part.kind(), part.variant(), part.text());
//! }
//! # Ok(())
//! # }
//! ```

/// Shared error type and XML text helpers
pub mod common;

/// OOXML (Office Open XML) package and WordprocessingML model
///
/// This module loads .docx packages into an editable tree and writes them back.
pub mod ooxml;

/// Placeholder resolution, repeating sections, and the fill engine
pub mod template;

/// Invoice field configuration, prompting, and totals
pub mod billing;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use ooxml::docx::Document;
pub use template::{Context, FillReport, TemplateFiller, Value, fill};

//! Template filling for Word documents.
//!
//! Templates are ordinary `.docx` files with two kinds of tags in their text:
//!
//! - `{{ path }}` placeholders, replaced by the value at the dotted `path`
//!   of the [`Context`] (empty when absent);
//! - `{{#name}}` ... `{{/name}}` section markers in table rows, which repeat
//!   the rows between them once per record of the list `name`.
//!
//! # Example
//!
//! ```rust,no_run
//! use docfill::template::{Context, TemplateFiller};
//!
//! let ctx: Context = serde_json::from_str(r#"{
//!     "invoice_no": "1001",
//!     "items": [
//!         {"description": "Widget A", "qty": 2, "amount": "100.00"},
//!         {"description": "Widget B", "qty": 1, "amount": "80.00"}
//!     ],
//!     "total": "180.00"
//! }"#)?;
//!
//! let mut filler = TemplateFiller::open("invoice_template.docx")?;
//! let report = filler.fill(&ctx)?;
//! for orphan in &report.unterminated {
//!     eprintln!("warning: {}", orphan);
//! }
//! filler.save("invoice_1001.docx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod context;
pub mod engine;
pub mod repeater;
pub mod report;
pub mod substitute;
pub mod token;

pub use context::{Context, Value, resolve};
pub use engine::{TemplateFiller, fill};
pub use report::{ExpandedSection, FillReport, UnterminatedSection};
pub use substitute::{render, strip_markers, substitute};
pub use token::{Token, tokenize};

//! Office Open XML (OOXML) format implementation.
//!
//! This module loads WordprocessingML packages (.docx, .dotx) into an editable
//! in-memory model and writes them back.
//!
//! # Architecture
//!
//! The module is organized into three layers:
//!
//! 1. **OPC Layer** (`opc`): package handling (ZIP, parts, content types, relationships)
//! 2. **XML Layer** (`xml`): an owned element tree for the parts that get rewritten
//! 3. **Word Layer** (`docx`): body, sections, headers/footers, paragraphs, tables
//!
//! # Example: Working with Word Documents
//!
//! ```rust,no_run
//! use docfill::ooxml::docx::Document;
//!
//! let doc = Document::open("document.docx")?;
//! println!("Document contains {} paragraphs", doc.paragraphs().count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod docx;
pub mod error;
pub mod opc;
pub mod xml;

// Re-export commonly used types from OPC layer
pub use opc::{OpcPackage, PackURI};

// Re-export error types
pub use error::{OoxmlError, Result};

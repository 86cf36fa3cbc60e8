//! Interactive invoice generation.
//!
//! Produces the fill context for an invoice template by asking questions
//! described in a [`FieldsConfig`], then fills the template and saves it
//! under a name built from the answers.
//!
//! # Example
//!
//! ```rust,no_run
//! use docfill::billing::{FieldsConfig, StdioPrompter, generate_invoice};
//!
//! let config = FieldsConfig::load("fields.json")?;
//! let today = chrono::Local::now().date_naive();
//! let invoice = generate_invoice("template.docx", &config, None, &mut StdioPrompter::stdio(), today)?;
//! println!("Wrote {}", invoice.path.display());
//! # Ok::<(), docfill::Error>(())
//! ```

pub mod answers;
pub mod config;
pub mod format;
pub mod prompt;

pub use answers::collect_answers;
pub use config::{FieldDef, FieldsConfig, ItemsConfig, TotalsConfig, write_sample_config};
pub use format::{NumberFormat, format_date, output_file_name};
pub use prompt::{Prompter, ScriptedPrompter, StdioPrompter};

use crate::common::Result;
use crate::template::{Context, FillReport, TemplateFiller};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// A generated invoice.
#[derive(Debug, Clone)]
pub struct Invoice {
    /// Where the document was written
    pub path: PathBuf,
    /// The answers it was filled with
    pub context: Context,
    /// What the fill changed
    pub report: FillReport,
}

/// Ask for answers, fill `template`, and save the result.
///
/// The output goes to `out` when given, otherwise to the configuration's
/// output name template filled with the answers. The template is loaded
/// before any question is asked.
pub fn generate_invoice<T, P>(
    template: T,
    config: &FieldsConfig,
    out: Option<&Path>,
    prompter: &mut P,
    today: NaiveDate,
) -> Result<Invoice>
where
    T: AsRef<Path>,
    P: Prompter + ?Sized,
{
    let mut filler = TemplateFiller::open(template)?;
    let context = collect_answers(config, prompter, today)?;

    let path = match out {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(output_file_name(config.output_name_template(), &context)?),
    };

    let report = filler.fill(&context)?;
    filler.save(&path)?;

    Ok(Invoice {
        path,
        context,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::Document;
    use crate::testing::{DocxBuilder, para, table};

    #[test]
    fn test_generate_invoice_end_to_end() {
        let template = DocxBuilder::new()
            .body(&para("Invoice {{invoice_no}} dated {{invoice_date}}"))
            .body(&para("Bill to: {{bill_to_name}}"))
            .body(&table(&[
                &["Item", "Qty", "Rate", "Amount"],
                &["{{#items}}", "", "", ""],
                &["{{description}}", "{{qty}}", "{{rate}}", "{{amount}}"],
                &["{{/items}}", "", "", ""],
                &["Total", "", "", "{{total}}"],
            ]))
            .footer("default", &para("GSTIN {{gstin}}"))
            .build();

        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("template.docx");
        std::fs::write(&template_path, template).unwrap();
        let out = dir.path().join("invoice_42.docx");

        // Scalar fields, then one line per item, then the empty description
        #[rustfmt::skip]
        let mut prompter = ScriptedPrompter::new([
            "42", "", "Ada Ltd", "", "X1",
            "Widget", "2", "10",
            "",
        ]);
        let today = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let invoice = generate_invoice(
            &template_path,
            &FieldsConfig::sample(),
            Some(out.as_path()),
            &mut prompter,
            today,
        )
        .unwrap();
        assert_eq!(invoice.path, out);
        assert_eq!(invoice.report.rows_emitted(), 1);

        let doc = Document::open(&out).unwrap();
        let lines: Vec<String> = doc.text().lines().map(str::to_string).collect();
        assert_eq!(lines[0], "Invoice 42 dated 05-01-2025");
        assert_eq!(lines[1], "Bill to: Ada Ltd");
        assert!(doc.text().contains("Widget\n2\n10\n20.0"));
        assert!(doc.text().contains("Total\n\n\n23.60"));
        assert_eq!(doc.headers_footers()[0].text(), "GSTIN X1");
    }

    #[test]
    fn test_missing_template_asks_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut prompter = ScriptedPrompter::default();
        let result = generate_invoice(
            dir.path().join("nope.docx"),
            &FieldsConfig::sample(),
            None,
            &mut prompter,
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
        );

        assert!(result.is_err());
        assert!(prompter.prompts().is_empty());
    }
}

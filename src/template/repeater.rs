//! Repeating table sections.
//!
//! A section is a block of table rows opened by a row containing
//! `{{#name}}` and closed by a later row containing `{{/name}}`. The rows
//! strictly between the two markers are the template; when there are none,
//! the start row itself is the template. For every record in the context
//! list `name`, the template rows are cloned, filled with the record merged
//! over the outer context, and inserted after the end row. The marker block
//! is then removed.
//!
//! ```text
//! before                      after (2 items)
//! +-----------------+         +-----------------+
//! | {{#items}}      |         | Widget A | 2    |
//! | {{description}} |  ---->  | Widget B | 1    |
//! | {{/items}}      |         +-----------------+
//! +-----------------+
//! ```
//!
//! Rows are scanned once, top to bottom. Nested tables are not scanned and
//! sections do not nest.

use crate::common::{Error, Result};
use crate::ooxml::docx::{Paragraph, Row, Table};
use crate::template::context::{Context, Value};
use crate::template::report::{ExpandedSection, FillReport, UnterminatedSection};
use crate::template::substitute::{strip_paragraph_markers, substitute};
use crate::template::token::{first_section_end_is, first_section_start};

/// Expand every repeating section of `table`.
///
/// `table_index` only labels report entries.
///
/// # Errors
///
/// Returns [`Error::InvalidContext`] when a matched section names a context
/// value that is not a list of maps. The table may already hold sections
/// expanded earlier in the scan.
pub fn expand_sections(
    table: &mut Table,
    context: &Context,
    table_index: usize,
    report: &mut FillReport,
) -> Result<()> {
    let mut i = 0;
    while i < table.row_count() {
        let Some(name) = table
            .row(i)
            .and_then(|row| first_section_start(&row.text()).map(str::to_owned))
        else {
            i += 1;
            continue;
        };

        let Some(j) = find_end_row(table, i + 1, &name) else {
            log::warn!(
                "table {}: section '{}' opened at row {} has no end marker; leaving it as is",
                table_index,
                name,
                i
            );
            report.unterminated.push(UnterminatedSection {
                table_index,
                row_index: i,
                name,
            });
            i += 1;
            continue;
        };

        let items = section_items(&name, context)?;
        let templates = template_rows(table, i, j);
        let emitted = items.len() * templates.len();

        let mut insert_at = j + 1;
        for item in &items {
            let merged = context.merged(item);
            for template in &templates {
                let mut row = template.clone();
                row.for_each_paragraph_mut(&mut |p: &mut Paragraph| {
                    if substitute(p, &merged) {
                        report.paragraphs_rewritten += 1;
                    }
                });
                table.insert_row(insert_at, row);
                insert_at += 1;
            }
        }
        table.remove_rows(i..j + 1);

        log::debug!(
            "table {}: expanded section '{}' rows {}..={} into {} rows ({} items)",
            table_index,
            name,
            i,
            j,
            emitted,
            items.len()
        );
        report.expanded.push(ExpandedSection {
            table_index,
            name,
            items: items.len(),
            template_rows: templates.len(),
            rows_emitted: emitted,
        });

        i += emitted;
    }
    Ok(())
}

/// First row at or after `from` whose first end marker closes `name`.
fn find_end_row(table: &Table, from: usize, name: &str) -> Option<usize> {
    table
        .rows()
        .enumerate()
        .skip(from)
        .find(|(_, row)| first_section_end_is(&row.text(), name))
        .map(|(j, _)| j)
}

/// Marker-free copies of the template rows for the block `[start, end]`.
fn template_rows(table: &Table, start: usize, end: usize) -> Vec<Row> {
    let range = if end > start + 1 {
        start + 1..end
    } else {
        start..start + 1
    };

    table
        .rows()
        .skip(range.start)
        .take(range.len())
        .map(|row| {
            let mut row = row.clone();
            for p in row.cell_paragraphs_mut() {
                strip_paragraph_markers(p);
            }
            row
        })
        .collect()
}

/// The records a section repeats over.
///
/// A missing key means no records.
fn section_items<'c>(name: &str, context: &'c Context) -> Result<Vec<&'c Context>> {
    let invalid = |found: String| Error::InvalidContext {
        section: name.to_string(),
        found,
    };

    match context.get(name) {
        None => Ok(Vec::new()),
        Some(Value::List(values)) => values
            .iter()
            .map(|value| {
                value
                    .as_map()
                    .ok_or_else(|| invalid(format!("a list containing {}", value.kind())))
            })
            .collect(),
        Some(other) => Err(invalid(other.kind().to_string())),
    }
}

//! Summary of what a fill changed.

use std::fmt;

/// A repeating section that was expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedSection {
    /// Index of the body table holding the section
    pub table_index: usize,
    /// Section name from the markers
    pub name: String,
    /// Number of items in the context list
    pub items: usize,
    /// Number of template rows stamped per item
    pub template_rows: usize,
    /// Rows inserted in place of the marker block (`items * template_rows`)
    pub rows_emitted: usize,
}

/// A start marker with no matching end marker further down its table.
///
/// The marker row is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnterminatedSection {
    /// Index of the body table holding the marker
    pub table_index: usize,
    /// Row of the start marker at the time it was scanned
    pub row_index: usize,
    /// Section name from the start marker
    pub name: String,
}

impl fmt::Display for UnterminatedSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "section '{}' opened in table {} row {} is never closed",
            self.name, self.table_index, self.row_index
        )
    }
}

/// Outcome of filling a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Sections expanded, in the order they were processed
    pub expanded: Vec<ExpandedSection>,
    /// Start markers left in place because no end marker matched
    pub unterminated: Vec<UnterminatedSection>,
    /// Paragraphs whose runs were collapsed by substitution
    pub paragraphs_rewritten: usize,
}

impl FillReport {
    /// Check whether the fill ran without diagnostics.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.unterminated.is_empty()
    }

    /// Total rows emitted by all expanded sections.
    pub fn rows_emitted(&self) -> usize {
        self.expanded.iter().map(|s| s.rows_emitted).sum()
    }
}

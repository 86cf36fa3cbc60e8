/// Table, Row, and Cell structures for Word documents.
use crate::ooxml::docx::paragraph::Paragraph;
use crate::ooxml::docx::story::{BlockItem, blocks_from_nodes, blocks_to_nodes};
use crate::ooxml::xml::{XmlElement, XmlNode};
use std::ops::Range;

const TABLE: &str = "w:tbl";
const ROW: &str = "w:tr";
const CELL: &str = "w:tc";

/// Content of a table: rows, or anything else kept verbatim in place
/// (`<w:tblPr>`, `<w:tblGrid>`, bookmarks, content controls, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum TableContent {
    /// A `<w:tr>` row
    Row(Row),
    /// Any other child node
    Other(XmlNode),
}

/// A table in a Word document.
///
/// Represents a `<w:tbl>` element. Children are held in document order;
/// rows are addressed by their index among the `<w:tr>` children, so they
/// can be cloned, inserted, and removed by position while everything else
/// stays where it was. Rows wrapped in content controls (`<w:sdt>`) are
/// not direct rows and are kept as opaque content.
///
/// # Example
///
/// ```rust,ignore
/// for table in document.body().tables() {
///     println!("Table with {} rows", table.row_count());
///     for (row_idx, row) in table.rows().enumerate() {
///         println!("Row {}: {}", row_idx, row.text());
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    shell: XmlElement,
    content: Vec<TableContent>,
}

impl Table {
    /// Build a table from a `<w:tbl>` element.
    pub fn from_element(mut element: XmlElement) -> Self {
        let content = element
            .take_children()
            .into_iter()
            .filter(|node| !node.is_blank_text())
            .map(|node| match node {
                XmlNode::Element(e) if e.is(ROW) => TableContent::Row(Row::from_element(e)),
                other => TableContent::Other(other),
            })
            .collect();

        Self {
            shell: element,
            content,
        }
    }

    /// Check whether an element is a table.
    #[inline]
    pub fn is_table(element: &XmlElement) -> bool {
        element.is(TABLE)
    }

    /// Get the children of this table in document order.
    #[inline]
    pub fn content(&self) -> &[TableContent] {
        &self.content
    }

    /// Get the rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.content.iter().filter_map(|c| match c {
            TableContent::Row(row) => Some(row),
            TableContent::Other(_) => None,
        })
    }

    /// Get the rows mutably, in order.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.content.iter_mut().filter_map(|c| match c {
            TableContent::Row(row) => Some(row),
            TableContent::Other(_) => None,
        })
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows().count()
    }

    /// Get a row by index.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows().nth(index)
    }

    /// Get a row mutably by index.
    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows_mut().nth(index)
    }

    /// Position in `content` of the row at `index`.
    fn slot(&self, index: usize) -> Option<usize> {
        self.content
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, TableContent::Row(_)))
            .map(|(slot, _)| slot)
            .nth(index)
    }

    /// Insert a row so that it ends up at `index`.
    ///
    /// The row goes directly after the row at `index - 1`, ahead of any
    /// non-row content that follows it. Index 0 places it before the first
    /// row, or after all other content when the table has no rows.
    ///
    /// # Panics
    ///
    /// Panics if `index > row_count()`.
    pub fn insert_row(&mut self, index: usize, row: Row) {
        let slot = match index.checked_sub(1) {
            None => self.slot(0).unwrap_or(self.content.len()),
            Some(previous) => match self.slot(previous) {
                Some(slot) => slot + 1,
                None => panic!(
                    "row index {} out of bounds for a table of {} rows",
                    index,
                    self.row_count()
                ),
            },
        };
        self.content.insert(slot, TableContent::Row(row));
    }

    /// Remove the rows whose indices fall in `range` and return them.
    ///
    /// Non-row content between the removed rows stays in place. Indices past
    /// the last row are ignored.
    pub fn remove_rows(&mut self, range: Range<usize>) -> Vec<Row> {
        let mut removed = Vec::new();
        let mut index = 0;
        for item in std::mem::take(&mut self.content) {
            match item {
                TableContent::Row(row) => {
                    if range.contains(&index) {
                        removed.push(row);
                    } else {
                        self.content.push(TableContent::Row(row));
                    }
                    index += 1;
                },
                other => self.content.push(other),
            }
        }
        removed
    }

    /// Visit every paragraph in every cell, descending into nested tables.
    pub fn for_each_paragraph_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Paragraph),
    {
        for row in self.rows_mut() {
            row.for_each_paragraph_mut(f);
        }
    }

    /// Serialize back to a `<w:tbl>` element.
    pub fn to_element(&self) -> XmlElement {
        let mut element = self.shell.clone();
        element
            .children_mut()
            .extend(self.content.iter().map(|c| match c {
                TableContent::Row(row) => XmlNode::Element(row.to_element()),
                TableContent::Other(node) => node.clone(),
            }));
        element
    }
}

/// Content of a row: cells, or anything else kept verbatim
/// (`<w:trPr>`, `<w:tblPrEx>`, bookmarks, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum RowContent {
    /// A `<w:tc>` cell
    Cell(Cell),
    /// Any other child node
    Other(XmlNode),
}

/// A row in a table.
///
/// Represents a `<w:tr>` element. `Clone` is a deep copy: the clone owns its
/// own cells and paragraphs and can be edited without affecting the original.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    shell: XmlElement,
    content: Vec<RowContent>,
}

impl Row {
    /// Build a row from a `<w:tr>` element.
    pub fn from_element(mut element: XmlElement) -> Self {
        let content = element
            .take_children()
            .into_iter()
            .filter(|node| !node.is_blank_text())
            .map(|node| match node {
                XmlNode::Element(e) if e.is(CELL) => RowContent::Cell(Cell::from_element(e)),
                other => RowContent::Other(other),
            })
            .collect();

        Self {
            shell: element,
            content,
        }
    }

    /// Get the cells in this row.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.content.iter().filter_map(|c| match c {
            RowContent::Cell(cell) => Some(cell),
            RowContent::Other(_) => None,
        })
    }

    /// Get the cells in this row mutably.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.content.iter_mut().filter_map(|c| match c {
            RowContent::Cell(cell) => Some(cell),
            RowContent::Other(_) => None,
        })
    }

    /// Flattened text of the row.
    ///
    /// The text of every paragraph directly inside each cell, in order,
    /// joined with `\n`.
    pub fn text(&self) -> String {
        let mut parts = Vec::new();
        for cell in self.cells() {
            for para in cell.paragraphs() {
                parts.push(para.text());
            }
        }
        parts.join("\n")
    }

    /// Get the paragraphs directly inside each cell, in order, mutably.
    ///
    /// Paragraphs of nested tables are not included.
    pub fn cell_paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.cells_mut().flat_map(|cell| cell.paragraphs_mut())
    }

    /// Visit every paragraph in the row, descending into nested tables.
    pub fn for_each_paragraph_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Paragraph),
    {
        for cell in self.cells_mut() {
            cell.for_each_paragraph_mut(f);
        }
    }

    /// Serialize back to a `<w:tr>` element.
    pub fn to_element(&self) -> XmlElement {
        let mut element = self.shell.clone();
        element
            .children_mut()
            .extend(self.content.iter().map(|c| match c {
                RowContent::Cell(cell) => XmlNode::Element(cell.to_element()),
                RowContent::Other(node) => node.clone(),
            }));
        element
    }
}

/// A cell in a table row.
///
/// Represents a `<w:tc>` element holding blocks: paragraphs, nested tables,
/// and the cell properties (`<w:tcPr>`) kept as an opaque block.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    shell: XmlElement,
    blocks: Vec<BlockItem>,
}

impl Cell {
    /// Build a cell from a `<w:tc>` element.
    pub fn from_element(mut element: XmlElement) -> Self {
        let blocks = blocks_from_nodes(element.take_children());
        Self {
            shell: element,
            blocks,
        }
    }

    /// Get the blocks of this cell in order.
    #[inline]
    pub fn blocks(&self) -> &[BlockItem] {
        &self.blocks
    }

    /// Get the paragraphs directly inside this cell.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(BlockItem::as_paragraph)
    }

    /// Get the paragraphs directly inside this cell mutably.
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.blocks.iter_mut().filter_map(|block| match block {
            BlockItem::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Get the text of this cell: its direct paragraphs joined with `\n`.
    pub fn text(&self) -> String {
        self.paragraphs()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Visit every paragraph in the cell, descending into nested tables.
    pub fn for_each_paragraph_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Paragraph),
    {
        for block in &mut self.blocks {
            block.for_each_paragraph_mut(f);
        }
    }

    /// Serialize back to a `<w:tc>` element.
    pub fn to_element(&self) -> XmlElement {
        let mut element = self.shell.clone();
        element
            .children_mut()
            .extend(blocks_to_nodes(&self.blocks));
        element
    }
}

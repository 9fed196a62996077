//! Table model structures.

use super::Paragraph;
use serde::Serialize;

/// Vertical merge state of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalMerge {
    /// First cell of a vertically merged region
    Restart,
    /// Covered by the cell above
    Continue,
}

/// A cell in a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// Paragraphs directly inside the cell (nested tables excluded)
    pub paragraphs: Vec<Paragraph>,

    /// Number of grid columns this cell covers
    #[serde(skip_serializing_if = "is_default_span")]
    pub grid_span: u32,

    /// Vertical merge state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_merge: Option<VerticalMerge>,
}

fn is_default_span(n: &u32) -> bool {
    *n == 1
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

impl Cell {
    /// Create a new empty cell.
    pub fn new() -> Self {
        Self {
            paragraphs: Vec::new(),
            grid_span: 1,
            v_merge: None,
        }
    }

    /// Create a cell with a single paragraph of text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            paragraphs: vec![Paragraph::with_text(text)],
            ..Self::new()
        }
    }

    /// Set the horizontal span.
    pub fn spanning(mut self, grid_span: u32) -> Self {
        self.grid_span = grid_span;
        self
    }

    /// Set the vertical merge state.
    pub fn merged(mut self, v_merge: VerticalMerge) -> Self {
        self.v_merge = Some(v_merge);
        self
    }

    /// Text of the cell's paragraphs, one per line.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Grid columns covered, never less than one.
    pub fn span(&self) -> usize {
        self.grid_span.max(1) as usize
    }

    /// Check if this cell continues a vertical merge.
    pub fn is_merge_continuation(&self) -> bool {
        self.v_merge == Some(VerticalMerge::Continue)
    }
}

/// A row in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Cells in this row
    pub cells: Vec<Cell>,

    /// Grid columns skipped before the first cell
    #[serde(skip_serializing_if = "is_zero")]
    pub grid_before: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl Row {
    /// Create a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row from cells.
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            grid_before: 0,
        }
    }

    /// Add a cell to this row.
    pub fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Number of grid columns covered by this row's cells.
    pub fn grid_width(&self) -> usize {
        self.cells.iter().map(Cell::span).sum()
    }
}

/// A table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Rows in this table
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row to this table.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row in grid columns, including skipped leading columns.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.grid_before as usize + r.grid_width())
            .max()
            .unwrap_or(0)
    }

    /// Iterate rows as layout-grid cells.
    ///
    /// A cell spanning several grid columns appears once per column. A
    /// vertical merge continuation is replaced by the cell that starts the
    /// merge, repeated across that cell's span.
    pub fn grid_rows(&self) -> GridRows<'_> {
        GridRows {
            rows: self.rows.iter(),
            above: Vec::new(),
        }
    }
}

/// Iterator returned by [`Table::grid_rows`].
#[derive(Debug)]
pub struct GridRows<'a> {
    rows: std::slice::Iter<'a, Row>,
    /// Resolved cell per grid column of the previous row
    above: Vec<Option<&'a Cell>>,
}

impl<'a> Iterator for GridRows<'a> {
    type Item = Vec<&'a Cell>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;

        let mut layout: Vec<Option<&'a Cell>> = vec![None; row.grid_before as usize];
        let mut cells = Vec::with_capacity(row.grid_width());

        for cell in &row.cells {
            let col = layout.len();
            let origin = if cell.is_merge_continuation() {
                self.above.get(col).copied().flatten().unwrap_or(cell)
            } else {
                cell
            };
            for _ in 0..origin.span() {
                cells.push(origin);
                layout.push(Some(origin));
            }
        }

        self.above = layout;
        Some(cells)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

//! Plain-text export of paragraphs and tables.
//!
//! The output layout is fixed:
//!
//! ```text
//! <paragraph 1>
//! ...
//! <paragraph N>
//!
//! === TABLES (if any) ===
//!
//! <cell> | <cell> | <cell>
//! ---
//! ```
//!
//! Each table prints one line per row followed by a `---` line. Text is
//! written exactly as parsed; newlines or `|` inside a cell are not escaped.

use crate::docx::DocxParser;
use crate::error::{Error, Result};
use crate::model::{Cell, Document, Table};
use std::io::Write;
use std::path::Path;

/// Heading line between the paragraphs and the tables.
pub const TABLES_HEADING: &str = "=== TABLES (if any) ===";

/// Separator placed between the cells of a row.
pub const CELL_SEPARATOR: &str = " | ";

/// Line written after the last row of every table.
pub const TABLE_TERMINATOR: &str = "---";

/// Open the document at `path` and export it to `out`.
///
/// # Example
///
/// ```no_run
/// let stdout = std::io::stdout();
/// docxtext::export::export_file("report.docx", &mut stdout.lock())?;
/// # Ok::<(), docxtext::Error>(())
/// ```
pub fn export_file<W: Write>(path: impl AsRef<Path>, out: &mut W) -> Result<()> {
    let path = path.as_ref();
    log::debug!("exporting {}", path.display());
    let doc = DocxParser::open(path)?.parse()?;
    write_document(&doc, out)
}

/// Write the paragraphs, the separator block and the tables of `doc`.
///
/// Lines are written as they are produced, so a write failure leaves the
/// lines before it in `out`.
pub fn write_document<W: Write>(doc: &Document, out: &mut W) -> Result<()> {
    for para in doc.paragraphs() {
        writeln!(out, "{}", para.text())?;
    }

    writeln!(out)?;
    writeln!(out, "{}", TABLES_HEADING)?;
    writeln!(out)?;

    for (index, table) in doc.tables().enumerate() {
        log::trace!("writing table {} ({} rows)", index, table.row_count());
        write_table(table, out)?;
    }

    Ok(())
}

/// Write one line per row, then the table terminator.
pub fn write_table<W: Write>(table: &Table, out: &mut W) -> Result<()> {
    for cells in table.grid_rows() {
        writeln!(out, "{}", row_line(&cells))?;
    }
    writeln!(out, "{}", TABLE_TERMINATOR)?;
    Ok(())
}

/// Join the text of a row's layout-grid cells with [`CELL_SEPARATOR`].
pub fn row_line(cells: &[&Cell]) -> String {
    cells
        .iter()
        .map(|cell| cell.text())
        .collect::<Vec<_>>()
        .join(CELL_SEPARATOR)
}

/// Export `doc` to a string.
pub fn to_text(doc: &Document) -> Result<String> {
    let mut buf = Vec::new();
    write_document(doc, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::InvalidData(e.to_string()))
}

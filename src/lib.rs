//! # docxtext
//!
//! Plain-text export of the paragraphs and tables of a Word document.
//!
//! The library opens a WordprocessingML package (`.docx`, `.docm`, `.dotx`,
//! `.dotm`), reads the body of its main document part into a small read-only
//! model, and writes that model as text: every body paragraph on its own
//! line, a fixed separator block, then every table row with its cells joined
//! by `" | "`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docxtext::parse_file;
//!
//! // Stream the export to stdout
//! let stdout = std::io::stdout();
//! docxtext::export_file("report.docx", &mut stdout.lock())?;
//!
//! // Or walk the model yourself
//! let doc = parse_file("report.docx")?;
//! for para in doc.paragraphs() {
//!     println!("{}", para.text());
//! }
//! println!("Tables: {}", doc.tables().count());
//! # Ok::<(), docxtext::Error>(())
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`] facade; the library never initialises
//! a logger itself.

pub mod container;
pub mod detect;
pub mod docx;
pub mod error;
pub mod export;
pub mod model;

// Re-exports
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use detect::{detect_kind_from_path, DocumentKind};
pub use error::{Error, Result};
pub use export::{export_file, to_text, write_document};
pub use model::{Block, Cell, Document, GridRows, Paragraph, Row, Table, VerticalMerge};

use std::path::Path;

/// Parse a Word document file and return its Document model.
///
/// # Example
///
/// ```no_run
/// use docxtext::parse_file;
///
/// let doc = parse_file("report.docx")?;
/// println!("Paragraphs: {}", doc.paragraphs().count());
/// # Ok::<(), docxtext::Error>(())
/// ```
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document> {
    docx::DocxParser::open(path)?.parse()
}

/// Parse a Word document from bytes.
///
/// # Example
///
/// ```no_run
/// use docxtext::parse_bytes;
///
/// let data = std::fs::read("report.docx")?;
/// let doc = parse_bytes(&data)?;
/// # Ok::<(), docxtext::Error>(())
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    docx::DocxParser::from_bytes(data.to_vec())?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file("does-not-exist/missing.docx");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_parse_bytes_not_a_package() {
        let result = parse_bytes(b"just some text");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }
}

//! DOCX (Word) document parser.
//!
//! This module reads the main document part of a WordprocessingML package
//! into the read-only [`Document`](crate::model::Document) model.

mod parser;

pub use parser::{parse_document_xml, DocxParser};

//! Read-only document model.
//!
//! The parser turns WordprocessingML into these structures and the exporter
//! reads them back in document order. A `Document` can also be built in
//! memory, which is how the exporter is tested without a package on disk.

mod document;
mod paragraph;
mod table;

pub use document::*;
pub use paragraph::*;
pub use table::*;

//! Paragraph model.

use serde::Serialize;

/// A block-level text unit, outside of or inside a table cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    /// Plain text of the paragraph's runs and hyperlinks, in order
    pub text: String,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with text content.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Get the plain text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Append run text to this paragraph.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Check if the paragraph has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

//! Package signature and content-type checks for Word documents.

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE compound file magic bytes, used by legacy .doc and encrypted packages.
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

const DOCUMENT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const MACRO_DOCUMENT_CONTENT_TYPE: &str = "application/vnd.ms-word.document.macroEnabled.main+xml";
const TEMPLATE_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml";
const MACRO_TEMPLATE_CONTENT_TYPE: &str = "application/vnd.ms-word.template.macroEnabledTemplate.main+xml";

/// Kind of WordprocessingML package, from its main part content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Word document (.docx)
    Document,
    /// Macro-enabled Word document (.docm)
    MacroEnabledDocument,
    /// Word template (.dotx)
    Template,
    /// Macro-enabled Word template (.dotm)
    MacroEnabledTemplate,
}

impl DocumentKind {
    /// Map a main part content type to a document kind.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type.trim() {
            DOCUMENT_CONTENT_TYPE => Some(DocumentKind::Document),
            MACRO_DOCUMENT_CONTENT_TYPE => Some(DocumentKind::MacroEnabledDocument),
            TEMPLATE_CONTENT_TYPE => Some(DocumentKind::Template),
            MACRO_TEMPLATE_CONTENT_TYPE => Some(DocumentKind::MacroEnabledTemplate),
            _ => None,
        }
    }

    /// Main part content type of this kind.
    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentKind::Document => DOCUMENT_CONTENT_TYPE,
            DocumentKind::MacroEnabledDocument => MACRO_DOCUMENT_CONTENT_TYPE,
            DocumentKind::Template => TEMPLATE_CONTENT_TYPE,
            DocumentKind::MacroEnabledTemplate => MACRO_TEMPLATE_CONTENT_TYPE,
        }
    }

    /// Whether text can be exported from this kind. Only plain documents are.
    pub fn is_supported(&self) -> bool {
        matches!(self, DocumentKind::Document)
    }

    /// Returns the usual file extension for this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Document => "docx",
            DocumentKind::MacroEnabledDocument => "docm",
            DocumentKind::Template => "dotx",
            DocumentKind::MacroEnabledTemplate => "dotm",
        }
    }

    /// Returns a human-readable name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            DocumentKind::Document => "Word Document",
            DocumentKind::MacroEnabledDocument => "Word Macro-Enabled Document",
            DocumentKind::Template => "Word Template",
            DocumentKind::MacroEnabledTemplate => "Word Macro-Enabled Template",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parsed `[Content_Types].xml`.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    /// Extension (lowercase, no dot) to content type
    defaults: HashMap<String, String>,
    /// Part name (lowercase, with leading slash) to content type
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    /// Parse the XML of a `[Content_Types].xml` part.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut types = ContentTypes::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event() {
                Ok(quick_xml::events::Event::Empty(e) | quick_xml::events::Event::Start(e)) => {
                    let mut key = None;
                    let mut content_type = None;
                    let kind = e.local_name();
                    for attr in e.attributes().flatten() {
                        let value = attr.unescape_value().unwrap_or_default().to_string();
                        match attr.key.as_ref() {
                            b"Extension" | b"PartName" => key = Some(value),
                            b"ContentType" => content_type = Some(value),
                            _ => {}
                        }
                    }
                    let (Some(key), Some(content_type)) = (key, content_type) else {
                        continue;
                    };
                    match kind.as_ref() {
                        b"Default" => {
                            types.defaults.insert(key.to_ascii_lowercase(), content_type);
                        }
                        b"Override" => {
                            types.overrides.insert(key.to_ascii_lowercase(), content_type);
                        }
                        _ => {}
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(format!("[Content_Types].xml: {}", e))),
                _ => {}
            }
        }

        Ok(types)
    }

    /// Content type of a part (archive path without leading slash).
    ///
    /// An `Override` for the part name wins over the `Default` for its
    /// extension. Part names compare case-insensitively.
    pub fn get(&self, part_path: &str) -> Option<&str> {
        let part_name = format!("/{}", part_path.trim_start_matches('/')).to_ascii_lowercase();
        if let Some(ct) = self.overrides.get(&part_name) {
            return Some(ct);
        }
        let extension = Path::new(&part_name).extension()?.to_str()?;
        self.defaults.get(extension).map(String::as_str)
    }
}

/// Reject data that cannot be a WordprocessingML package.
pub fn check_signature(data: &[u8]) -> Result<()> {
    if data.starts_with(&OLE_MAGIC) {
        return Err(Error::UnsupportedFormat(
            "OLE compound file (legacy .doc or encrypted document)".to_string(),
        ));
    }
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }
    Ok(())
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

/// Determine the document kind of an opened package's main part.
///
/// Fails with `MissingComponent` when the package has no
/// `[Content_Types].xml`, and with `UnsupportedFormat` when the main part is
/// not a WordprocessingML part.
pub fn detect_document_kind(container: &OoxmlContainer, main_part: &str) -> Result<DocumentKind> {
    let content_types = container.read_content_types()?;

    let content_type = content_types.get(main_part).ok_or_else(|| {
        Error::UnsupportedFormat(format!("no content type declared for /{}", main_part))
    })?;
    log::debug!("main part /{} has content type {}", main_part, content_type);

    DocumentKind::from_content_type(content_type).ok_or_else(|| {
        Error::UnsupportedFormat(format!(
            "not a Word document, main part content type is '{}'",
            content_type
        ))
    })
}

/// Detect the document kind of a file.
///
/// # Example
///
/// ```no_run
/// use docxtext::detect::detect_kind_from_path;
///
/// let kind = detect_kind_from_path("report.docx")?;
/// println!("Detected: {}", kind);
/// # Ok::<(), docxtext::Error>(())
/// ```
pub fn detect_kind_from_path(path: impl AsRef<Path>) -> Result<DocumentKind> {
    let container = OoxmlContainer::open(path)?;
    let main_part = container.main_document_path()?;
    detect_document_kind(&container, &main_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::tests::zip_parts;

    const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="XML" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

    #[test]
    fn test_document_kind_display() {
        assert_eq!(DocumentKind::Document.to_string(), "Word Document");
        assert_eq!(DocumentKind::Template.extension(), "dotx");
        assert_eq!(DocumentKind::MacroEnabledDocument.extension(), "docm");
    }

    #[test]
    fn test_only_plain_documents_supported() {
        assert!(DocumentKind::Document.is_supported());
        assert!(!DocumentKind::MacroEnabledDocument.is_supported());
        assert!(!DocumentKind::Template.is_supported());
        assert!(!DocumentKind::MacroEnabledTemplate.is_supported());
        assert_eq!(
            DocumentKind::Template.content_type(),
            TEMPLATE_CONTENT_TYPE
        );
    }

    #[test]
    fn test_document_kind_from_content_type() {
        assert_eq!(
            DocumentKind::from_content_type(DOCUMENT_CONTENT_TYPE),
            Some(DocumentKind::Document)
        );
        assert_eq!(
            DocumentKind::from_content_type(MACRO_TEMPLATE_CONTENT_TYPE),
            Some(DocumentKind::MacroEnabledTemplate)
        );
        assert_eq!(
            DocumentKind::from_content_type(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"
            ),
            None
        );
    }

    #[test]
    fn test_content_types_lookup() {
        let types = ContentTypes::parse(CONTENT_TYPES).unwrap();
        assert_eq!(types.get("word/document.xml"), Some(DOCUMENT_CONTENT_TYPE));
        assert_eq!(types.get("/WORD/Document.xml"), Some(DOCUMENT_CONTENT_TYPE));
        assert_eq!(types.get("word/styles.xml"), Some("application/xml"));
        assert_eq!(types.get("media/image1.png"), None);
    }

    #[test]
    fn test_is_zip_file() {
        assert!(is_zip_file(&[0x50, 0x4B, 0x03, 0x04, 0x00]));
        assert!(!is_zip_file(&[0x00, 0x00, 0x00, 0x00]));
        assert!(!is_zip_file(&[0x50, 0x4B]));
    }

    #[test]
    fn test_check_signature() {
        assert!(matches!(
            check_signature(b"plain text, not a package"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            check_signature(&OLE_MAGIC),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(check_signature(&ZIP_MAGIC).is_ok());
    }

    #[test]
    fn test_detect_document_kind() {
        let data = zip_parts(&[
            ("[Content_Types].xml", CONTENT_TYPES),
            ("word/document.xml", "<w:document/>"),
        ]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        let kind = detect_document_kind(&container, "word/document.xml").unwrap();
        assert_eq!(kind, DocumentKind::Document);
    }

    #[test]
    fn test_detect_rejects_spreadsheet() {
        let types = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
</Types>"#;
        let data = zip_parts(&[
            ("[Content_Types].xml", types),
            ("xl/workbook.xml", "<workbook/>"),
        ]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        let err = detect_document_kind(&container, "xl/workbook.xml").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_detect_without_content_types() {
        let data = zip_parts(&[("word/document.xml", "<w:document/>")]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        assert!(matches!(
            detect_document_kind(&container, "word/document.xml"),
            Err(Error::MissingComponent(ref p)) if p == "[Content_Types].xml"
        ));
    }
}

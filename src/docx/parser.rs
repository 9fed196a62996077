//! DOCX parser implementation.

use crate::container::OoxmlContainer;
use crate::detect::detect_document_kind;
use crate::error::{Error, Result};
use crate::model::{Cell, Document, Paragraph, Row, Table, VerticalMerge};

use quick_xml::events::{BytesStart, Event};

type XmlReader<'a> = quick_xml::Reader<&'a [u8]>;

/// Widest table grid Word can produce.
const MAX_GRID_COLUMNS: u32 = 63;

/// Parser for DOCX (Word) documents.
#[derive(Debug)]
pub struct DocxParser {
    container: OoxmlContainer,
    main_part: String,
}

impl DocxParser {
    /// Open a DOCX file for parsing.
    ///
    /// Fails when the file cannot be read, is not a ZIP package, or its main
    /// part is not a plain WordprocessingML document. Macro-enabled documents
    /// and templates are rejected.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let container = OoxmlContainer::open(path)?;
        Self::from_container(container)
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    fn from_container(container: OoxmlContainer) -> Result<Self> {
        let main_part = container.main_document_path()?;
        let kind = detect_document_kind(&container, &main_part)?;
        if !kind.is_supported() {
            return Err(Error::UnsupportedFormat(format!(
                "{} (.{}) is not supported, main part content type is '{}'",
                kind,
                kind.extension(),
                kind.content_type()
            )));
        }
        log::debug!("opened {} with main part {}", kind, main_part);

        Ok(Self {
            container,
            main_part,
        })
    }

    /// Parse the main document part into a Document model.
    pub fn parse(&self) -> Result<Document> {
        let xml = self.container.read_xml(&self.main_part)?;
        let doc = parse_document_xml(&xml)?;
        log::debug!(
            "parsed {} paragraphs and {} tables from {}",
            doc.paragraphs().count(),
            doc.tables().count(),
            self.main_part
        );
        Ok(doc)
    }
}

/// Parse the XML of a main document part.
///
/// Only direct children of `w:body` become blocks: `w:p` as paragraphs and
/// `w:tbl` as tables. Everything else in the body is skipped.
pub fn parse_document_xml(xml: &str) -> Result<Document> {
    let mut reader = quick_xml::Reader::from_str(xml);
    // Keep whitespace: it is significant inside w:t
    reader.config_mut().trim_text(false);

    let mut doc = Document::new();
    let mut found_body = false;

    loop {
        match next_event(&mut reader)? {
            Event::Start(e) if e.name().as_ref() == b"w:body" => {
                parse_body(&mut reader, &mut doc)?;
                found_body = true;
            }
            Event::Empty(e) if e.name().as_ref() == b"w:body" => found_body = true,
            Event::Eof => break,
            _ => {}
        }
    }

    if !found_body {
        return Err(Error::InvalidData("document has no w:body element".to_string()));
    }

    Ok(doc)
}

fn parse_body(reader: &mut XmlReader<'_>, doc: &mut Document) -> Result<()> {
    loop {
        match next_event(reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => doc.add_paragraph(parse_paragraph(reader)?),
                b"w:tbl" => doc.add_table(parse_table(reader)?),
                _ => skip_element(reader, &e)?,
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => doc.add_paragraph(Paragraph::new()),
                b"w:tbl" => doc.add_table(Table::new()),
                _ => {}
            },
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(unexpected_eof("w:body")),
            _ => {}
        }
    }
}

/// Parse a `w:p` whose start tag was just read.
///
/// The text is that of the paragraph's direct runs and of the runs of its
/// direct hyperlinks, in order.
fn parse_paragraph(reader: &mut XmlReader<'_>) -> Result<Paragraph> {
    let mut para = Paragraph::new();
    loop {
        match next_event(reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:r" => parse_run(reader, &mut para)?,
                b"w:hyperlink" => parse_hyperlink(reader, &mut para)?,
                _ => skip_element(reader, &e)?,
            },
            Event::End(_) => return Ok(para),
            Event::Eof => return Err(unexpected_eof("w:p")),
            _ => {}
        }
    }
}

fn parse_hyperlink(reader: &mut XmlReader<'_>, para: &mut Paragraph) -> Result<()> {
    loop {
        match next_event(reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:r" => parse_run(reader, para)?,
                _ => skip_element(reader, &e)?,
            },
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(unexpected_eof("w:hyperlink")),
            _ => {}
        }
    }
}

/// Append the text of a `w:r` to `para`.
///
/// Field codes (`w:instrText`), deleted text and drawings add nothing.
fn parse_run(reader: &mut XmlReader<'_>, para: &mut Paragraph) -> Result<()> {
    loop {
        match next_event(reader)? {
            Event::Start(e) => {
                if e.name().as_ref() == b"w:t" {
                    let text = read_text(reader)?;
                    para.push_str(&text);
                } else {
                    if let Some(ch) = run_char(&e) {
                        para.push_str(ch);
                    }
                    skip_element(reader, &e)?;
                }
            }
            Event::Empty(e) => {
                if let Some(ch) = run_char(&e) {
                    para.push_str(ch);
                }
            }
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(unexpected_eof("w:r")),
            _ => {}
        }
    }
}

/// Text contributed by a run child other than `w:t`.
fn run_char(e: &BytesStart<'_>) -> Option<&'static str> {
    match e.name().as_ref() {
        b"w:tab" | b"w:ptab" => Some("\t"),
        b"w:cr" => Some("\n"),
        b"w:noBreakHyphen" => Some("-"),
        // Page and column breaks are not line breaks
        b"w:br" => match attr_value(e, b"w:type").as_deref() {
            None | Some("textWrapping") => Some("\n"),
            Some(_) => Some(""),
        },
        _ => None,
    }
}

/// Read the character content of a `w:t` up to its end tag.
fn read_text(reader: &mut XmlReader<'_>) -> Result<String> {
    let mut text = String::new();
    loop {
        match next_event(reader)? {
            Event::Text(t) => {
                let unescaped = t.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
            Event::Start(e) => skip_element(reader, &e)?,
            Event::End(_) => return Ok(text),
            Event::Eof => return Err(unexpected_eof("w:t")),
            _ => {}
        }
    }
}

/// Parse a `w:tbl` whose start tag was just read.
fn parse_table(reader: &mut XmlReader<'_>) -> Result<Table> {
    let mut table = Table::new();
    loop {
        match next_event(reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tr" => table.add_row(parse_row(reader)?),
                _ => skip_element(reader, &e)?,
            },
            Event::Empty(e) if e.name().as_ref() == b"w:tr" => table.add_row(Row::new()),
            Event::End(_) => {
                log::trace!("parsed table with {} rows", table.row_count());
                return Ok(table);
            }
            Event::Eof => return Err(unexpected_eof("w:tbl")),
            _ => {}
        }
    }
}

fn parse_row(reader: &mut XmlReader<'_>) -> Result<Row> {
    let mut row = Row::new();
    loop {
        match next_event(reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tc" => row.add_cell(parse_cell(reader)?),
                b"w:trPr" => parse_row_properties(reader, &mut row)?,
                _ => skip_element(reader, &e)?,
            },
            Event::Empty(e) if e.name().as_ref() == b"w:tc" => row.add_cell(Cell::new()),
            Event::End(_) => return Ok(row),
            Event::Eof => return Err(unexpected_eof("w:tr")),
            _ => {}
        }
    }
}

fn parse_row_properties(reader: &mut XmlReader<'_>, row: &mut Row) -> Result<()> {
    loop {
        match next_event(reader)? {
            Event::Empty(e) if e.name().as_ref() == b"w:gridBefore" => {
                row.grid_before = parse_grid_count(&e, 0);
            }
            Event::Start(e) => {
                if e.name().as_ref() == b"w:gridBefore" {
                    row.grid_before = parse_grid_count(&e, 0);
                }
                skip_element(reader, &e)?;
            }
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(unexpected_eof("w:trPr")),
            _ => {}
        }
    }
}

/// Parse a `w:tc`: its direct paragraphs and merge properties.
///
/// Nested tables are skipped and contribute no text to the cell.
fn parse_cell(reader: &mut XmlReader<'_>) -> Result<Cell> {
    let mut cell = Cell::new();
    loop {
        match next_event(reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => cell.paragraphs.push(parse_paragraph(reader)?),
                b"w:tcPr" => parse_cell_properties(reader, &mut cell)?,
                _ => skip_element(reader, &e)?,
            },
            Event::Empty(e) if e.name().as_ref() == b"w:p" => cell.paragraphs.push(Paragraph::new()),
            Event::End(_) => return Ok(cell),
            Event::Eof => return Err(unexpected_eof("w:tc")),
            _ => {}
        }
    }
}

fn parse_cell_properties(reader: &mut XmlReader<'_>, cell: &mut Cell) -> Result<()> {
    loop {
        match next_event(reader)? {
            Event::Empty(e) => apply_cell_property(&e, cell),
            Event::Start(e) => {
                apply_cell_property(&e, cell);
                skip_element(reader, &e)?;
            }
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(unexpected_eof("w:tcPr")),
            _ => {}
        }
    }
}

fn apply_cell_property(e: &BytesStart<'_>, cell: &mut Cell) {
    match e.name().as_ref() {
        b"w:gridSpan" => {
            cell.grid_span = parse_grid_count(e, 1).max(1);
        }
        b"w:vMerge" => {
            cell.v_merge = match attr_value(e, b"w:val").as_deref() {
                Some("restart") => Some(VerticalMerge::Restart),
                _ => Some(VerticalMerge::Continue),
            };
        }
        _ => {}
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return Some(String::from_utf8_lossy(&attr.value).into_owned());
        }
    }
    None
}

/// Column count from a `w:val` attribute, capped at the widest grid.
fn parse_grid_count(e: &BytesStart<'_>, default: u32) -> u32 {
    attr_value(e, b"w:val")
        .and_then(|v| v.trim().parse::<u32>().ok())
        .map_or(default, |n| n.min(MAX_GRID_COLUMNS))
}

/// Consume everything up to and including the end tag matching `start`.
fn skip_element(reader: &mut XmlReader<'_>, start: &BytesStart<'_>) -> Result<()> {
    reader
        .read_to_end(start.name())
        .map(|_| ())
        .map_err(|e| xml_error(reader, e))
}

fn next_event<'a>(reader: &mut XmlReader<'a>) -> Result<Event<'a>> {
    reader.read_event().map_err(|e| xml_error(reader, e))
}

fn xml_error(reader: &XmlReader<'_>, err: quick_xml::Error) -> Error {
    Error::XmlParse(format!("{} (at byte {})", err, reader.buffer_position()))
}

fn unexpected_eof(element: &str) -> Error {
    Error::XmlParse(format!("unexpected end of document inside {}", element))
}

//! Minimal Office Open XML reader: first worksheet, cell texts only.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;
use zip::result::ZipError;

use super::{MAX_PART_BYTES, SheetRow};
use crate::error::IngestError;

const WORKBOOK: &str = "xl/workbook.xml";
const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS: &str = "xl/sharedStrings.xml";
const DEFAULT_SHEET: &str = "xl/worksheets/sheet1.xml";

type Archive<'a> = ZipArchive<Cursor<&'a [u8]>>;

pub(super) fn read_rows(bytes: &[u8]) -> Result<Vec<SheetRow>, IngestError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let shared = match read_entry(&mut archive, SHARED_STRINGS)? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };
    let sheet_path = first_sheet_path(&mut archive)?;
    let xml = read_entry(&mut archive, &sheet_path)?
        .ok_or_else(|| IngestError::malformed(format!("workbook has no worksheet at {sheet_path}")))?;
    parse_worksheet(&xml, &shared)
}

fn read_entry(archive: &mut Archive<'_>, name: &str) -> Result<Option<String>, IngestError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let too_large = || IngestError::malformed(format!("{name} exceeds {MAX_PART_BYTES} bytes"));
    if file.size() > MAX_PART_BYTES {
        return Err(too_large());
    }
    // The declared size can lie; cap the actual read as well.
    let mut content = Vec::new();
    file.by_ref()
        .take(MAX_PART_BYTES + 1)
        .read_to_end(&mut content)
        .map_err(|e| IngestError::malformed(format!("cannot read {name}: {e}")))?;
    if content.len() as u64 > MAX_PART_BYTES {
        return Err(too_large());
    }
    String::from_utf8(content)
        .map(Some)
        .map_err(|_| IngestError::malformed(format!("{name} is not UTF-8")))
}

/// Resolve the first `<sheet>` of the workbook through its relationship id.
/// Falls back to the conventional path when either part is missing.
fn first_sheet_path(archive: &mut Archive<'_>) -> Result<String, IngestError> {
    let Some(workbook) = read_entry(archive, WORKBOOK)? else {
        return Ok(DEFAULT_SHEET.to_string());
    };
    let Some(rel_id) = first_sheet_rel_id(&workbook)? else {
        return Ok(DEFAULT_SHEET.to_string());
    };
    let Some(rels) = read_entry(archive, WORKBOOK_RELS)? else {
        return Ok(DEFAULT_SHEET.to_string());
    };
    Ok(relationship_target(&rels, &rel_id)?
        .map(|target| match target.strip_prefix('/') {
            Some(absolute) => absolute.to_string(),
            None => format!("xl/{target}"),
        })
        .unwrap_or_else(|| DEFAULT_SHEET.to_string()))
}

fn first_sheet_rel_id(xml: &str) -> Result<Option<String>, IngestError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                return attribute(&e, b"id");
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn relationship_target(xml: &str, rel_id: &str) -> Result<Option<String>, IngestError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if attribute(&e, b"Id")?.as_deref() == Some(rel_id) {
                    return attribute(&e, b"Target");
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Attribute value by local name, so `r:id` matches `id`.
fn attribute(e: &BytesStart<'_>, local: &[u8]) -> Result<Option<String>, IngestError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == local {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Shared string table. Rich-text runs are concatenated; phonetic hints are
/// skipped.
fn parse_shared_strings(xml: &str) -> Result<Vec<String>, IngestError> {
    let mut reader = Reader::from_str(xml);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_item = false;
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_item = true;
                    current.clear();
                }
                b"t" => in_text = true,
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::Text(t) if in_item && in_text && !in_phonetic => {
                current.push_str(&t.unescape()?);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_item = false;
                    strings.push(std::mem::take(&mut current));
                }
                b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(strings)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellType {
    Number,
    Shared,
    Inline,
    FormulaString,
    Boolean,
    Error,
    Date,
}

impl CellType {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("s") => Self::Shared,
            Some("inlineStr") => Self::Inline,
            Some("str") => Self::FormulaString,
            Some("b") => Self::Boolean,
            Some("e") => Self::Error,
            Some("d") => Self::Date,
            _ => Self::Number,
        }
    }
}

struct PendingCell {
    col: usize,
    kind: CellType,
    text: String,
}

fn parse_worksheet(xml: &str, shared: &[String]) -> Result<Vec<SheetRow>, IngestError> {
    let mut reader = Reader::from_str(xml);
    let mut rows: Vec<SheetRow> = Vec::new();
    let mut row: Option<SheetRow> = None;
    let mut cell: Option<PendingCell> = None;
    let mut next_col = 0usize;
    let mut in_value = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"row" => {
                    let number = match attribute(&e, b"r")? {
                        Some(r) => r.parse().map_err(|_| {
                            IngestError::malformed(format!("invalid row number '{r}'"))
                        })?,
                        None => rows.last().map(|r| r.number + 1).unwrap_or(1),
                    };
                    row = Some(SheetRow {
                        number,
                        cells: Vec::new(),
                    });
                    next_col = 0;
                }
                b"c" => {
                    let pending = start_cell(&e, next_col)?;
                    next_col = pending.col + 1;
                    cell = Some(pending);
                }
                b"v" | b"t" => in_value = cell.is_some(),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => {
                    next_col = 0;
                }
                b"c" => {
                    let pending = start_cell(&e, next_col)?;
                    next_col = pending.col + 1;
                }
                _ => {}
            },
            Event::Text(t) if in_value => {
                if let Some(pending) = cell.as_mut() {
                    pending.text.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    if let (Some(pending), Some(current)) = (cell.take(), row.as_mut()) {
                        let value = cell_text(&pending, shared);
                        if current.cells.len() <= pending.col {
                            current.cells.resize(pending.col + 1, String::new());
                        }
                        current.cells[pending.col] = value;
                    }
                }
                b"row" => {
                    if let Some(done) = row.take() {
                        rows.push(done);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(rows)
}

fn start_cell(e: &BytesStart<'_>, next_col: usize) -> Result<PendingCell, IngestError> {
    let col = match attribute(e, b"r")? {
        Some(reference) => column_index(&reference)
            .ok_or_else(|| IngestError::malformed(format!("invalid cell reference '{reference}'")))?,
        None => next_col,
    };
    let kind = CellType::from_attr(attribute(e, b"t")?.as_deref());
    Ok(PendingCell {
        col,
        kind,
        text: String::new(),
    })
}

fn cell_text(cell: &PendingCell, shared: &[String]) -> String {
    let raw = cell.text.trim();
    match cell.kind {
        CellType::Shared => raw
            .parse::<usize>()
            .ok()
            .and_then(|idx| shared.get(idx))
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        CellType::Boolean => match raw {
            "1" => "TRUE".to_string(),
            _ => "FALSE".to_string(),
        },
        CellType::Error => String::new(),
        CellType::Number | CellType::Inline | CellType::FormulaString | CellType::Date => {
            raw.to_string()
        }
    }
}

/// Zero-based column of an `A1`-style reference (`B7` → 1).
fn column_index(reference: &str) -> Option<usize> {
    let letters: Vec<u8> = reference
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let mut col = 0usize;
    for b in letters {
        col = col * 26 + (b.to_ascii_uppercase() - b'A' + 1) as usize;
    }
    Some(col - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_map_to_indices() {
        assert_eq!(column_index("A1"), Some(0));
        assert_eq!(column_index("b7"), Some(1));
        assert_eq!(column_index("Z3"), Some(25));
        assert_eq!(column_index("AA10"), Some(26));
        assert_eq!(column_index("XFD1"), Some(16383));
        assert_eq!(column_index("12"), None);
    }

    #[test]
    fn rich_text_runs_concatenate_and_phonetics_are_skipped() {
        let xml = r#"<sst><si><t>Glucose</t></si><si><r><t>Uric </t></r><r><t>acid</t></r><rPh><t>x</t></rPh></si><si/></sst>"#;
        assert_eq!(
            parse_shared_strings(xml).unwrap(),
            vec!["Glucose".to_string(), "Uric acid".to_string(), String::new()]
        );
    }
}

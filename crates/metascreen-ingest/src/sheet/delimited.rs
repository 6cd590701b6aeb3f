use csv::{ReaderBuilder, StringRecord};

use metascreen_core::models::diagnostic::{Diagnostic, DiagnosticKind};

use super::SheetRow;
use crate::error::IngestError;

const CANDIDATES: [u8; 3] = [b'\t', b';', b','];
const SNIFF_LINES: usize = 20;
const BOM: char = '\u{feff}';

/// Each physical line is one row, so a quoted field never spans lines. A
/// line with an unbalanced quote is re-read with quoting off and reported.
pub(super) fn read_rows(bytes: &[u8]) -> Result<(Vec<SheetRow>, Vec<Diagnostic>), IngestError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| IngestError::malformed("not a workbook and not UTF-8 text"))?;
    let text = text.strip_prefix(BOM).unwrap_or(text);
    if text.contains('\0') {
        return Err(IngestError::malformed("binary content in text file"));
    }

    let delimiter = detect_delimiter(text);
    let mut rows = Vec::new();
    let mut diagnostics = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let number = idx + 1;
        let balanced = line.bytes().filter(|&b| b == b'"').count() % 2 == 0;
        let cells = if balanced {
            split_line(line, delimiter, true)?
        } else {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::MalformedRow,
                Some(number),
                Some(line.trim().to_string()),
                format!("row {number}: unbalanced quote; quotes ignored"),
            ));
            split_line(line, delimiter, false)?
                .into_iter()
                .map(|c| c.trim_matches('"').trim().to_string())
                .collect()
        };
        rows.push(SheetRow { number, cells });
    }
    Ok((rows, diagnostics))
}

fn split_line(line: &str, delimiter: u8, quoting: bool) -> Result<Vec<String>, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(quoting)
        .delimiter(delimiter)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    reader.read_record(&mut record)?;
    Ok(record.iter().map(|c| c.trim().to_string()).collect())
}

/// Pick the candidate occurring most often on the first lines. Ties go to
/// the earlier candidate, so `Glucose;5,9` splits on the semicolon.
fn detect_delimiter(text: &str) -> u8 {
    let sample: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();
    let mut best = (b',', 0usize);
    for &candidate in CANDIDATES.iter().rev() {
        let count: usize = sample
            .iter()
            .map(|l| l.bytes().filter(|&b| b == candidate).count())
            .sum();
        if count >= best.1 && count > 0 {
            best = (candidate, count);
        }
    }
    best.0
}

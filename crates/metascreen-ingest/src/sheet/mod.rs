//! Container formats. Both readers produce the same sparse grid of trimmed
//! cell texts, so layout detection never knows where a file came from.

mod delimited;
mod xlsx;

use metascreen_core::models::diagnostic::Diagnostic;

use crate::error::IngestError;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Largest decompressed workbook part that is read into memory.
pub const MAX_PART_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Delimited,
}

impl SheetFormat {
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(ZIP_MAGIC) {
            Self::Xlsx
        } else {
            Self::Delimited
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Delimited => "delimited",
        }
    }
}

/// One non-empty sheet row. `number` is 1-based as shown by spreadsheet
/// software.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub number: usize,
    pub cells: Vec<String>,
}

impl SheetRow {
    pub fn cell(&self, col: usize) -> &str {
        self.cells.get(col).map(String::as_str).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct Sheet {
    pub format: SheetFormat,
    /// Sorted by row number; blank rows omitted.
    pub rows: Vec<SheetRow>,
    /// Rows the container reader could only partly recover.
    pub diagnostics: Vec<Diagnostic>,
}

pub fn read_sheet(bytes: &[u8]) -> Result<Sheet, IngestError> {
    if bytes.is_empty() {
        return Err(IngestError::malformed("empty payload"));
    }
    let format = SheetFormat::detect(bytes);
    let (mut rows, diagnostics) = match format {
        SheetFormat::Xlsx => (xlsx::read_rows(bytes)?, Vec::new()),
        SheetFormat::Delimited => delimited::read_rows(bytes)?,
    };
    rows.retain(|r| !r.is_blank());
    rows.sort_by_key(|r| r.number);
    if rows.is_empty() {
        return Err(IngestError::malformed("sheet contains no data"));
    }
    Ok(Sheet {
        format,
        rows,
        diagnostics,
    })
}

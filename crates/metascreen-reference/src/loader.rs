use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::Deserialize;

use metascreen_core::models::reference::ReferenceEntry;

use crate::error::ReferenceError;

pub const BUILTIN_VERSION: &str = "v1";

const BUILTIN_V1: &str = include_str!("../assets/reference_v1.tsv");

const ALIAS_SEPARATOR: char = '|';

#[derive(Debug, Deserialize)]
struct ReferenceRow {
    id: String,
    display_name: String,
    unit: String,
    lower: Option<f64>,
    upper: Option<f64>,
    panel: String,
    panel_order: u32,
    position: u32,
    #[serde(default)]
    aliases: Option<String>,
}

impl From<ReferenceRow> for ReferenceEntry {
    fn from(row: ReferenceRow) -> Self {
        let aliases = row
            .aliases
            .unwrap_or_default()
            .split(ALIAS_SEPARATOR)
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect();
        ReferenceEntry {
            id: row.id,
            display_name: row.display_name,
            unit: row.unit,
            lower: row.lower,
            upper: row.upper,
            panel: row.panel,
            panel_order: row.panel_order,
            position: row.position,
            aliases,
        }
    }
}

pub fn load_builtin_v1() -> Result<Vec<ReferenceEntry>, ReferenceError> {
    parse_reference_tsv(BUILTIN_V1, "built-in v1")
}

pub fn load_reference_tsv(path: &Path) -> Result<Vec<ReferenceEntry>, ReferenceError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReferenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_reference_tsv(&content, &path.display().to_string())
}

/// Parse a tab-separated reference table with a header row. Lines starting
/// with `#` are comments.
pub fn parse_reference_tsv(
    content: &str,
    source_name: &str,
) -> Result<Vec<ReferenceEntry>, ReferenceError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let mut entries = Vec::new();
    for record in reader.deserialize::<ReferenceRow>() {
        let row = record.map_err(|e| ReferenceError::Malformed {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;
        if row.id.is_empty() || row.panel.is_empty() {
            return Err(ReferenceError::Malformed {
                source_name: source_name.to_string(),
                message: format!("row '{}' has an empty id or panel", row.display_name),
            });
        }
        entries.push(ReferenceEntry::from(row));
    }
    Ok(entries)
}

/// Serialize entries back to the TSV layout `parse_reference_tsv` reads.
pub fn write_reference_tsv(entries: &[ReferenceEntry]) -> Result<String, ReferenceError> {
    let mut writer = WriterBuilder::new().delimiter(b'\t').from_writer(Vec::new());
    writer.write_record([
        "id",
        "display_name",
        "unit",
        "lower",
        "upper",
        "panel",
        "panel_order",
        "position",
        "aliases",
    ])?;
    for e in entries {
        writer.write_record([
            e.id.clone(),
            e.display_name.clone(),
            e.unit.clone(),
            e.lower.map(|v| v.to_string()).unwrap_or_default(),
            e.upper.map(|v| v.to_string()).unwrap_or_default(),
            e.panel.clone(),
            e.panel_order.to_string(),
            e.position.to_string(),
            e.aliases.join(&ALIAS_SEPARATOR.to_string()),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|e| ReferenceError::Malformed {
        source_name: "writer".to_string(),
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| ReferenceError::Malformed {
        source_name: "writer".to_string(),
        message: e.to_string(),
    })
}

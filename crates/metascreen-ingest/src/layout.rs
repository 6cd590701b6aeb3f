//! Locates the header block (patient fields) and body block (metabolite
//! rows) inside a sheet.

use metascreen_core::models::diagnostic::{Diagnostic, DiagnosticKind};
use metascreen_core::models::patient::{PatientField, PatientInfo};
use metascreen_core::normalize::normalize_name;

use crate::error::IngestError;
use crate::sheet::{Sheet, SheetRow};

/// Body header labels, normalized.
const NAME_HEADERS: &[&str] = &[
    "metabolite",
    "metabolites",
    "analyte",
    "compound",
    "name",
    "метаболит",
    "метаболиты",
    "показатель",
];
const VALUE_HEADERS: &[&str] = &[
    "result",
    "value",
    "concentration",
    "результат",
    "значение",
];
const UNIT_HEADERS: &[&str] = &["unit", "units", "ед. изм.", "ед.изм.", "единицы"];

/// One metabolite row of the body block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyRow {
    pub row: usize,
    pub name: String,
    pub value: String,
    pub unit: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub patient: PatientInfo,
    pub rows: Vec<BodyRow>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy)]
struct BodyColumns {
    name: usize,
    value: usize,
    unit: Option<usize>,
}

pub fn locate(sheet: &Sheet) -> Result<Layout, IngestError> {
    let (header_idx, columns) = sheet
        .rows
        .iter()
        .enumerate()
        .find_map(|(idx, row)| body_columns(row).map(|cols| (idx, cols)))
        .ok_or_else(|| {
            IngestError::malformed("no metabolite table header (metabolite/result columns) found")
        })?;

    let patient = PatientInfo::new(
        sheet.rows[..header_idx]
            .iter()
            .filter_map(patient_field)
            .collect(),
    );

    let mut rows = Vec::new();
    let mut diagnostics = sheet.diagnostics.clone();
    for row in &sheet.rows[header_idx + 1..] {
        let name = row.cell(columns.name);
        let value = row.cell(columns.value);
        if name.is_empty() {
            if !value.is_empty() {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MalformedRow,
                    Some(row.number),
                    Some(value.to_string()),
                    format!("row {}: value '{value}' has no metabolite name", row.number),
                ));
            }
            continue;
        }
        rows.push(BodyRow {
            row: row.number,
            name: name.to_string(),
            value: value.to_string(),
            unit: columns.unit.map(|col| row.cell(col).to_string()),
        });
    }

    Ok(Layout {
        patient,
        rows,
        diagnostics,
    })
}

fn body_columns(row: &SheetRow) -> Option<BodyColumns> {
    let labels: Vec<String> = row.cells.iter().map(|c| normalize_name(c)).collect();
    let find = |wanted: &[&str], skip: Option<usize>| {
        labels
            .iter()
            .enumerate()
            .find(|(idx, label)| Some(*idx) != skip && wanted.contains(&label.as_str()))
            .map(|(idx, _)| idx)
    };
    let name = find(NAME_HEADERS, None)?;
    let value = find(VALUE_HEADERS, Some(name))?;
    let unit = find(UNIT_HEADERS, Some(name)).filter(|&u| u != value);
    Some(BodyColumns { name, value, unit })
}

/// First non-empty cell is the field name, the next non-empty cell its value.
fn patient_field(row: &SheetRow) -> Option<PatientField> {
    let mut cells = row.cells.iter().filter(|c| !c.is_empty());
    let name = cells.next()?.trim_end_matches(':').trim().to_string();
    let value = cells.next().cloned().unwrap_or_default();
    Some(PatientField { name, value })
}

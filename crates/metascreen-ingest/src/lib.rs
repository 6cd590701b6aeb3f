//! metascreen-ingest
//!
//! Turns an uploaded laboratory file into patient info and reference-resolved
//! measurements. Row-level problems become diagnostics; only a file whose
//! header/body structure cannot be found is an error.

pub mod error;
pub mod layout;
pub mod numeric;
pub mod sheet;
pub mod units;

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use metascreen_core::models::diagnostic::{Diagnostic, DiagnosticKind};
use metascreen_core::models::measurement::MetaboliteMeasurement;
use metascreen_core::models::patient::PatientInfo;
use metascreen_reference::ReferenceTable;

pub use error::IngestError;

use numeric::NumericCell;

/// Output of [`ingest`].
#[derive(Debug, Clone, Serialize)]
pub struct Ingested {
    pub patient: PatientInfo,
    pub measurements: Vec<MetaboliteMeasurement>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a workbook or delimited-text export and resolve every metabolite
/// row against `reference`.
pub fn ingest(bytes: &[u8], reference: &ReferenceTable) -> Result<Ingested, IngestError> {
    let sheet = sheet::read_sheet(bytes)?;
    let layout = layout::locate(&sheet)?;

    let mut diagnostics = layout.diagnostics;
    if layout.patient.is_empty() {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::MissingPatientInfo,
            None,
            None,
            "file has no patient information block",
        ));
    }

    let row_count = layout.rows.len();
    let mut seen: HashSet<String> = HashSet::new();
    let mut measurements = Vec::with_capacity(row_count);

    for row in layout.rows {
        let Some(entry) = reference.resolve(&row.name) else {
            debug!(row = row.row, name = %row.name, "unresolved metabolite");
            let err = IngestError::UnresolvedMetabolite {
                row: row.row,
                name: row.name.clone(),
            };
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnresolvedMetabolite,
                Some(row.row),
                Some(row.name),
                err.to_string(),
            ));
            continue;
        };

        if !seen.insert(entry.id.clone()) {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::DuplicateMetabolite,
                Some(row.row),
                Some(row.name.clone()),
                format!(
                    "row {}: '{}' repeats {}; first occurrence kept",
                    row.row, row.name, entry.id
                ),
            ));
            continue;
        }

        let mut value = match numeric::parse_numeric(&row.value) {
            NumericCell::Number(v) => Some(v),
            NumericCell::Blank | NumericCell::Placeholder => None,
            NumericCell::Invalid => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnparseableValue,
                    Some(row.row),
                    Some(row.value.clone()),
                    format!(
                        "row {}: value '{}' for {} is not a number",
                        row.row, row.value, entry.id
                    ),
                ));
                None
            }
        };

        if let Some(unit) = row.unit.as_deref().filter(|u| !u.trim().is_empty())
            && !units::same_unit(unit, &entry.unit)
        {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnitMismatch,
                Some(row.row),
                Some(unit.to_string()),
                format!(
                    "row {}: {} reported in '{}', reference unit is '{}'; value ignored",
                    row.row, entry.id, unit, entry.unit
                ),
            ));
            value = None;
        }

        debug!(row = row.row, name = %row.name, id = %entry.id, ?value, "resolved metabolite");
        measurements.push(MetaboliteMeasurement {
            id: entry.id.clone(),
            source_name: row.name,
            source_row: row.row,
            raw_value: row.value,
            value,
            reference: entry.clone(),
        });
    }

    info!(
        format = sheet.format.as_str(),
        rows = row_count,
        measurements = measurements.len(),
        diagnostics = diagnostics.len(),
        "file ingested"
    );

    Ok(Ingested {
        patient: layout.patient,
        measurements,
        diagnostics,
    })
}

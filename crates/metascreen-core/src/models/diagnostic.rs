use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DiagnosticKind {
    /// Row name matches nothing in the reference table.
    UnresolvedMetabolite,
    /// Non-blank cell that is not a number.
    UnparseableValue,
    /// Second row resolving to an already seen metabolite.
    DuplicateMetabolite,
    /// Unit column disagrees with the reference unit.
    UnitMismatch,
    /// Value without a metabolite name, or a row read only in part.
    MalformedRow,
    /// File has no header block.
    MissingPatientInfo,
}

/// Non-fatal ingestion finding, reported to the caller next to the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// 1-based source row, when the finding belongs to one row.
    pub row: Option<usize>,
    /// Metabolite name or cell text the finding is about.
    pub subject: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        row: Option<usize>,
        subject: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            row,
            subject,
            message: message.into(),
        }
    }
}

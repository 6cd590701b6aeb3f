use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::diagnostic::Diagnostic;
use super::panel::Panel;
use super::patient::PatientInfo;
use super::probability::ProbabilityMap;

/// Everything the engine produces for one ingested file. Owned by the
/// caller once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EngineResult {
    /// Correlates this result with the engine's log lines.
    pub request_id: Uuid,
    /// Original file name, when the caller supplied one.
    pub source: Option<String>,
    pub patient: PatientInfo,
    pub panels: Vec<Panel>,
    pub cardio: ProbabilityMap,
    pub oncology: ProbabilityMap,
    pub diagnostics: Vec<Diagnostic>,
}

impl EngineResult {
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_source(mut self, source: Option<String>) -> Self {
        self.source = source;
        self
    }

    /// Append diagnostics collected by earlier stages.
    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics.extend(diagnostics);
        self
    }

    pub fn panel(&self, name: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.name == name)
    }
}

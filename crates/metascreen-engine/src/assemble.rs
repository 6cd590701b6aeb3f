use uuid::Uuid;

use metascreen_core::models::panel::Panel;
use metascreen_core::models::patient::PatientInfo;
use metascreen_core::models::probability::ProbabilityMap;
use metascreen_core::models::result::EngineResult;
use metascreen_models::ScoringError;

use crate::error::EngineError;

/// Combine finished stage outputs into one result.
///
/// Values pass through unchanged. The first failed scoring stage is
/// returned as the error and nothing is assembled. The request id is nil
/// until set with [`EngineResult::with_request_id`].
pub fn assemble(
    patient: PatientInfo,
    panels: Vec<Panel>,
    cardio: Result<ProbabilityMap, ScoringError>,
    oncology: Result<ProbabilityMap, ScoringError>,
) -> Result<EngineResult, EngineError> {
    let cardio = cardio?;
    let oncology = oncology?;
    Ok(EngineResult {
        request_id: Uuid::nil(),
        source: None,
        patient,
        panels,
        cardio,
        oncology,
        diagnostics: Vec::new(),
    })
}

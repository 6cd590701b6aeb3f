use tracing::debug;

use metascreen_core::models::probability::ProbabilityMap;

use crate::error::ScoringError;
use crate::features::FeatureVector;
use crate::pipeline::ModelPipeline;

/// Score one feature vector with one pipeline.
///
/// The dimensionality check happens before the model runs. Entries come
/// back in the model's declared label order and are not renormalized.
pub fn score(
    features: &FeatureVector,
    pipeline: &ModelPipeline,
) -> Result<ProbabilityMap, ScoringError> {
    if features.len() != pipeline.feature_count() {
        return Err(ScoringError::FeatureMismatch {
            model: pipeline.id().to_string(),
            expected: pipeline.feature_count(),
            actual: features.len(),
        });
    }
    if !features.imputed().is_empty() {
        debug!(model = pipeline.id(), imputed = ?features.imputed(), "imputed missing features");
    }
    let entries = pipeline.predict_proba(features.values())?;
    Ok(ProbabilityMap::new(pipeline.summary().clone(), entries))
}

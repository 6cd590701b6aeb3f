use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use metascreen_core::models::measurement::MetaboliteMeasurement;
use metascreen_core::models::probability::{ClassProbability, ModelMetric, ModelSummary};
use metascreen_reference::ReferenceTable;

use crate::artifact::{FORMAT_VERSION, ModelArtifact};
use crate::error::ScoringError;
use crate::features::FeatureVector;

const CARDIO_V1: &str = include_str!("../assets/cardio_v1.json");
const ONCOLOGY_V1: &str = include_str!("../assets/oncology_v1.json");

/// A validated, ready-to-run model. Immutable after loading.
#[derive(Debug, Clone)]
pub struct ModelPipeline {
    artifact: ModelArtifact,
    summary: ModelSummary,
}

impl ModelPipeline {
    /// Built-in cardiovascular demonstration model.
    pub fn builtin_cardio() -> Result<Self, ScoringError> {
        Self::from_json(CARDIO_V1, "builtin:cardio_v1")
    }

    /// Built-in lung cancer demonstration model.
    pub fn builtin_oncology() -> Result<Self, ScoringError> {
        Self::from_json(ONCOLOGY_V1, "builtin:oncology_v1")
    }

    pub fn load(path: &Path) -> Result<Self, ScoringError> {
        let source = path.display().to_string();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ScoringError::unavailable(&source, format!("cannot read: {e}")))?;
        let pipeline = Self::from_json(&json, &source)?;
        info!(path = %source, model = %pipeline.id(), "model loaded");
        Ok(pipeline)
    }

    pub fn from_json(json: &str, source_name: &str) -> Result<Self, ScoringError> {
        let artifact: ModelArtifact = serde_json::from_str(json)
            .map_err(|e| ScoringError::unavailable(source_name, format!("invalid artifact: {e}")))?;
        Self::from_artifact(artifact, source_name)
    }

    pub fn from_artifact(artifact: ModelArtifact, source_name: &str) -> Result<Self, ScoringError> {
        validate(&artifact).map_err(|reason| ScoringError::unavailable(source_name, reason))?;
        let summary = summarize(&artifact);
        Ok(Self { artifact, summary })
    }

    /// Every feature must name a metabolite the reference table knows.
    pub fn check_features(&self, reference: &ReferenceTable) -> Result<(), ScoringError> {
        match self
            .artifact
            .features
            .iter()
            .find(|f| reference.get(&f.metabolite).is_none())
        {
            Some(missing) => Err(ScoringError::unavailable(
                self.id(),
                format!(
                    "feature '{}' is not in reference table {}",
                    missing.metabolite,
                    reference.version()
                ),
            )),
            None => Ok(()),
        }
    }

    pub fn id(&self) -> &str {
        &self.artifact.id
    }

    pub fn summary(&self) -> &ModelSummary {
        &self.summary
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn feature_count(&self) -> usize {
        self.artifact.features.len()
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.artifact.features.iter().map(|f| f.metabolite.as_str())
    }

    /// Published labels, head by head, in declared order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.artifact
            .heads
            .iter()
            .flat_map(|h| h.reported().iter().map(String::as_str))
    }

    pub fn feature_vector<'a>(
        &self,
        measurements: impl IntoIterator<Item = &'a MetaboliteMeasurement>,
    ) -> FeatureVector {
        FeatureVector::from_measurements(&self.artifact.features, measurements)
    }

    /// Run every head and return the reported classes as percentages.
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<ClassProbability>, ScoringError> {
        if x.len() != self.feature_count() {
            return Err(ScoringError::FeatureMismatch {
                model: self.id().to_string(),
                expected: self.feature_count(),
                actual: x.len(),
            });
        }
        let scaled;
        let input = match &self.artifact.scaler {
            Some(scaler) => {
                scaled = scaler.apply(x);
                &scaled[..]
            }
            None => x,
        };

        let mut out = Vec::new();
        for head in &self.artifact.heads {
            let proba = head.estimator.predict_proba(input);
            for label in head.reported() {
                let p = head
                    .classes
                    .iter()
                    .position(|c| c == label)
                    .and_then(|i| proba.get(i))
                    .copied()
                    .unwrap_or(0.0);
                out.push(ClassProbability {
                    label: label.clone(),
                    probability: p * 100.0,
                });
            }
        }
        Ok(out)
    }
}

fn summarize(artifact: &ModelArtifact) -> ModelSummary {
    ModelSummary {
        id: artifact.id.clone(),
        title: artifact.title.clone(),
        algorithm: artifact.algorithm.clone(),
        description: artifact.description.clone(),
        metrics: artifact
            .heads
            .iter()
            .flat_map(|h| {
                h.metrics.iter().map(move |m| ModelMetric {
                    head: h.name.clone(),
                    name: m.name.clone(),
                    value: m.value,
                })
            })
            .collect(),
    }
}

fn validate(artifact: &ModelArtifact) -> Result<(), String> {
    if artifact.format_version != FORMAT_VERSION {
        return Err(format!(
            "unsupported format_version {} (expected {FORMAT_VERSION})",
            artifact.format_version
        ));
    }
    if artifact.id.trim().is_empty() {
        return Err("empty model id".into());
    }
    let n_features = artifact.features.len();
    if n_features == 0 {
        return Err("model declares no features".into());
    }
    let mut seen = HashSet::new();
    for feature in &artifact.features {
        if !seen.insert(feature.metabolite.as_str()) {
            return Err(format!("feature '{}' listed twice", feature.metabolite));
        }
        if !feature.impute.is_finite() {
            return Err(format!(
                "feature '{}' has a non-finite imputation value",
                feature.metabolite
            ));
        }
    }
    if let Some(scaler) = &artifact.scaler {
        if scaler.mean.len() != n_features || scaler.scale.len() != n_features {
            return Err(format!("scaler does not cover {n_features} features"));
        }
        if scaler.mean.iter().any(|v| !v.is_finite())
            || scaler.scale.iter().any(|v| !v.is_finite() || *v == 0.0)
        {
            return Err("scaler has non-finite or zero parameters".into());
        }
    }
    if artifact.heads.is_empty() {
        return Err("model declares no heads".into());
    }
    for head in &artifact.heads {
        if head.classes.len() < 2 {
            return Err(format!("head '{}' needs at least two classes", head.name));
        }
        if let Some(missing) = head.reported().iter().find(|l| !head.classes.contains(*l)) {
            return Err(format!(
                "head '{}' reports unknown class '{missing}'",
                head.name
            ));
        }
        head.estimator
            .validate(n_features, head.classes.len())
            .map_err(|e| format!("head '{}': {e}", head.name))?;
    }
    Ok(())
}

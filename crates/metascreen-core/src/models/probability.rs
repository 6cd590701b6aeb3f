use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A published quality figure of a classifier head, e.g. AUC-ROC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ModelMetric {
    pub head: String,
    pub name: String,
    pub value: f64,
}

/// Descriptive metadata of a model pipeline, shown next to its scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ModelSummary {
    pub id: String,
    pub title: String,
    /// e.g. `"random_forest"`.
    pub algorithm: String,
    pub description: Option<String>,
    pub metrics: Vec<ModelMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClassProbability {
    pub label: String,
    /// Percentage in `[0, 100]`.
    pub probability: f64,
}

/// Ordered label → probability output of one model pipeline.
///
/// Entry order is the model's declared class order and is never changed by
/// the engine. Values are not renormalized: a pipeline with several
/// independent heads sums to more than 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProbabilityMap {
    pub model: ModelSummary,
    pub entries: Vec<ClassProbability>,
}

impl ProbabilityMap {
    pub fn new(model: ModelSummary, entries: Vec<ClassProbability>) -> Self {
        Self { model, entries }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.probability)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.probability).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use serde::{Deserialize, Serialize};

use crate::estimator::Estimator;

/// Artifact layout version understood by this crate.
pub const FORMAT_VERSION: u32 = 1;

/// On-disk description of a model pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub id: String,
    pub title: String,
    pub algorithm: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Input slots in training order.
    pub features: Vec<FeatureSpec>,
    #[serde(default)]
    pub scaler: Option<Scaler>,
    pub heads: Vec<HeadSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// Reference table identifier.
    pub metabolite: String,
    /// Cohort median used when the measurement is absent.
    pub impute: f64,
}

/// Standardization applied before estimation: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler {
    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect()
    }
}

/// One independent classifier over the shared feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadSpec {
    pub name: String,
    /// Class labels in estimator output order.
    pub classes: Vec<String>,
    /// Classes to publish, in the listed order. All classes when absent.
    #[serde(default)]
    pub report: Option<Vec<String>>,
    #[serde(default)]
    pub metrics: Vec<MetricSpec>,
    pub estimator: Estimator,
}

impl HeadSpec {
    pub fn reported(&self) -> &[String] {
        self.report.as_deref().unwrap_or(&self.classes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub name: String,
    pub value: f64,
}

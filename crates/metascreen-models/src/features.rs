use std::collections::HashMap;

use serde::Serialize;

use metascreen_core::models::measurement::MetaboliteMeasurement;

use crate::artifact::FeatureSpec;

/// Fixed-order model input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    values: Vec<f64>,
    /// Identifiers of slots filled from the imputation constant.
    imputed: Vec<String>,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            imputed: Vec::new(),
        }
    }

    /// One slot per feature, in artifact order. Absent or missing
    /// measurements take the feature's cohort median.
    pub fn from_measurements<'a>(
        features: &[FeatureSpec],
        measurements: impl IntoIterator<Item = &'a MetaboliteMeasurement>,
    ) -> Self {
        let observed: HashMap<&str, f64> = measurements
            .into_iter()
            .filter_map(|m| m.value.map(|v| (m.id.as_str(), v)))
            .collect();

        let mut values = Vec::with_capacity(features.len());
        let mut imputed = Vec::new();
        for feature in features {
            match observed.get(feature.metabolite.as_str()) {
                Some(&v) => values.push(v),
                None => {
                    values.push(feature.impute);
                    imputed.push(feature.metabolite.clone());
                }
            }
        }
        Self { values, imputed }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn imputed(&self) -> &[String] {
        &self.imputed
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

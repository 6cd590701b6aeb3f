use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    /// The feature vector does not have the dimensionality the model was
    /// trained on. Fatal for that scoring call only.
    #[error("model {model} expects {expected} features, got {actual}")]
    FeatureMismatch {
        model: String,
        expected: usize,
        actual: usize,
    },

    /// The artifact could not be loaded or failed validation. Surfaced at
    /// startup.
    #[error("model {source_name} unavailable: {reason}")]
    ModelUnavailable { source_name: String, reason: String },
}

impl ScoringError {
    pub fn unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        ScoringError::ModelUnavailable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

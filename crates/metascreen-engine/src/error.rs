use std::path::PathBuf;

use thiserror::Error;

use metascreen_ingest::IngestError;
use metascreen_interpret::InterpretError;
use metascreen_models::ScoringError;
use metascreen_reference::ReferenceError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write config at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config_version {found} is newer than this build supports ({supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("config_version must be an unsigned integer, found {0}")]
    InvalidVersion(String),

    #[error("config is not a JSON object")]
    NotAnObject,

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    RiskMargin(#[from] InterpretError),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl EngineError {
    /// Stable machine-readable error class.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Config(_) => "config",
            EngineError::Reference(_) => "reference_table",
            EngineError::Ingest(IngestError::MalformedFile(_)) => "malformed_file",
            EngineError::Ingest(IngestError::UnresolvedMetabolite { .. }) => "unresolved_metabolite",
            EngineError::Scoring(ScoringError::FeatureMismatch { .. }) => "feature_mismatch",
            EngineError::Scoring(ScoringError::ModelUnavailable { .. }) => "model_unavailable",
        }
    }
}

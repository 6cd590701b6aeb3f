use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("failed to read reference table {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{source_name}: malformed reference table: {message}")]
    Malformed {
        source_name: String,
        message: String,
    },

    #[error("duplicate metabolite id '{0}'")]
    DuplicateId(String),

    #[error("name '{name}' refers to both '{first}' and '{second}'")]
    AmbiguousName {
        name: String,
        first: String,
        second: String,
    },

    #[error("invalid bounds for '{id}': {message}")]
    InvalidBounds { id: String, message: String },

    #[error("panel '{panel}' declared with orders {first} and {second}")]
    InconsistentPanelOrder {
        panel: String,
        first: u32,
        second: u32,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

//! metascreen-models
//!
//! Pre-trained risk classifiers. Artifacts are plain JSON documents holding
//! feature order, imputation constants and estimator parameters, so
//! inference needs no external runtime.

pub mod artifact;
pub mod error;
pub mod estimator;
pub mod features;
pub mod pipeline;
pub mod scorer;

pub use error::ScoringError;
pub use features::FeatureVector;
pub use pipeline::ModelPipeline;
pub use scorer::score;

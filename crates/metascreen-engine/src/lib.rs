//! metascreen-engine
//!
//! Wires ingestion, classification, grouping and scoring into a single
//! request/response pipeline over shared read-only state.

pub mod assemble;
pub mod config;
pub mod engine;
pub mod error;

pub use assemble::assemble;
pub use config::EngineConfig;
pub use engine::{Engine, Upload};
pub use error::{ConfigError, EngineError};

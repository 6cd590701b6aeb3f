//! metascreen-core
//!
//! Shared vocabulary of the Metascreen engine: patient info, reference
//! entries, measurements, flags, panels, probability maps and the engine
//! result consumed by the presentation layer. No I/O lives here.

pub mod models;
pub mod normalize;

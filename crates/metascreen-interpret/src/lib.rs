//! metascreen-interpret
//!
//! Rule-based interpretation of resolved measurements: reference-range
//! flags and physiological panel grouping. No I/O.

pub mod classify;
pub mod error;
pub mod group;
pub mod margin;

pub use classify::{classify, classify_all, flag_for};
pub use error::InterpretError;
pub use group::{GroupingPolicy, PanelPolicy, group};
pub use margin::RiskMargin;

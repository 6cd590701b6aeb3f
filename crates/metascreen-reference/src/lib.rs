//! metascreen-reference
//!
//! The reference table: per-metabolite normal bands and panel membership.
//! Loaded once at process start, from the embedded versioned asset or from a
//! TSV file, and read-only afterwards.

pub mod error;
pub mod loader;
pub mod table;

pub use error::ReferenceError;
pub use table::ReferenceTable;

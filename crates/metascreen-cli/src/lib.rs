//! metascreen-cli
//!
//! Command-line front end for the metascreen engine.

pub mod cli;
pub mod commands;

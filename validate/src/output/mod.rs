//! Output formatting for replay results
//!
//! Provides colored CLI output and the final summary.

pub mod cli;

pub use cli::{CliOutput, OutputLevel};

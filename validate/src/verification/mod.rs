//! Checkpoint verification for tracker replays
//!
//! Defines expected tracker outputs and verifies them against actual behavior.

pub mod checkpoint;

pub use checkpoint::{CheckpointResult, CheckpointVerifier, Expectations, Observed};

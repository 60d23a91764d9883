//! Session tracking
//!
//! This module provides:
//! - **SessionTracker**: XP-rate window and time-to-level projection
//! - **DeathCounter**: debounced death detection from XP regressions

mod deaths;
mod tracker;


pub use deaths::DeathCounter;
pub use tracker::{Sample, SessionReport, SessionSettings, SessionState, SessionTracker};

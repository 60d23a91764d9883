//! Replay engine for tracker scripts
//!
//! Maps script offsets onto timestamps and optionally paces playback.

pub mod clock;

pub use clock::VirtualClock;

pub mod area;
pub mod bar;
pub mod context;
pub mod format;
pub mod history;
pub mod level_curve;
pub mod session;
pub mod state;
pub mod tracker;

// Re-exports for convenience
pub use area::{AreaTransition, AreaTransitionController, TrackState};
pub use bar::{BarSegments, bar_segments};
pub use context::{ConfigError, CurveError, DisplayMode, TrackerConfig, TrackerConfigExt};
pub use format::{DEFAULT_TIME_DISPLAY, MAX_TIME_DISPLAY, TimeToLevel};
pub use history::{MapRun, RunEnd, RunHistory};
pub use level_curve::{EXP_TABLE, LevelCurve};
pub use session::{DeathCounter, Sample, SessionReport, SessionSettings, SessionState, SessionTracker};
pub use state::{AreaInstance, PlayerSnapshot, TrackerCache};
pub use tracker::{HistoryEntry, OverlayText, TelemetryHandler, XpTracker};

#[cfg(test)]
mod tracker_tests;

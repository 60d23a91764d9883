//! Display formatting shared by the tracker outputs.

use std::fmt;

use chrono::TimeDelta;

pub const DEFAULT_TIME_DISPLAY: &str = "00:00:00";
pub const MAX_TIME_DISPLAY: &str = ">99:59:59";

/// Projected hours above this are shown as [`MAX_TIME_DISPLAY`].
const MAX_DISPLAY_HOURS: u64 = 99;

/// Time-to-level as shown on the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeToLevel {
    /// Not enough data for an estimate
    #[default]
    Unknown,
    /// Estimate beyond the displayable range
    Capped,
    /// Whole seconds until the level completes
    Seconds(u64),
}

impl TimeToLevel {
    /// Classify a raw projection. Non-finite or negative input is `Unknown`.
    pub fn from_secs_f64(seconds: f64) -> Self {
        if !seconds.is_finite() || seconds < 0.0 {
            return TimeToLevel::Unknown;
        }
        // `as` saturates, so absurd projections still land in Capped
        let whole = seconds.floor() as u64;
        if whole / 3600 > MAX_DISPLAY_HOURS {
            return TimeToLevel::Capped;
        }
        TimeToLevel::Seconds(whole)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TimeToLevel::Unknown)
    }
}

impl fmt::Display for TimeToLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeToLevel::Unknown => f.write_str(DEFAULT_TIME_DISPLAY),
            TimeToLevel::Capped => f.write_str(MAX_TIME_DISPLAY),
            TimeToLevel::Seconds(secs) => write!(
                f,
                "{:02}:{:02}:{:02}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60
            ),
        }
    }
}

/// Format a run duration as MM:SS (minutes are not wrapped at the hour).
pub fn format_run_time(elapsed: TimeDelta) -> String {
    let secs = elapsed.num_seconds().max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Round a percentage to `places` decimals, dropping trailing zeros the
/// way the overlay shows it ("42.5", not "42.50"). Halves round to even.
pub fn format_percent(pct: f64, places: u8) -> String {
    let factor = 10f64.powi(places as i32);
    let rounded = (pct * factor).round_ties_even() / factor;
    // -0.0 prints as "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}

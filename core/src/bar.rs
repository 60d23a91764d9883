//! Experience bar segment math.
//!
//! The bar shows how far the character is into the level, with the part
//! gained during the current session highlighted at its right end.

use crate::level_curve::LevelCurve;

/// Bar widths as fractions of the full bar, both in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BarSegments {
    /// Progress through the current level
    pub level_fraction: f64,
    /// Trailing part of `level_fraction` gained this session
    pub session_fraction: f64,
}

impl BarSegments {
    /// Fraction gained before the session started.
    pub fn prior_fraction(&self) -> f64 {
        self.level_fraction - self.session_fraction
    }
}

/// Split the bar for `level` into prior and this-session progress.
///
/// Session XP only counts from the later of the session start and the level
/// start, so a level-up mid-session never overflows the bar.
pub fn bar_segments(
    curve: &LevelCurve,
    level: u32,
    session_start_xp: u64,
    current_xp: u64,
) -> BarSegments {
    let span = curve.xp_required_in_level(level);
    if span == 0 {
        return BarSegments::default();
    }

    let level_start = curve.cumulative_xp_for_level(level - 1);
    let into_level = current_xp.saturating_sub(level_start);
    let level_fraction = (into_level as f64 / span as f64).clamp(0.0, 1.0);

    let session_from = session_start_xp.max(level_start);
    let gained = current_xp.saturating_sub(session_from);
    let session_fraction = (gained as f64 / span as f64).clamp(0.0, level_fraction);

    BarSegments {
        level_fraction,
        session_fraction,
    }
}

//! XP-rate measurement over a session window.
//!
//! A session runs from its last reset to now. The rate is the plain average
//! of XP gained over the whole window; resets happen on level-up, idle
//! timeout, new area entry and explicit user request.

use chrono::{NaiveDateTime, TimeDelta};
use tracing::debug;
use xpbar_types::TrackerConfig;

use super::DeathCounter;
use crate::format::TimeToLevel;
use crate::level_curve::LevelCurve;

/// One frame of player telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub level: u32,
    pub xp: u64,
    pub at: NaiveDateTime,
}

impl Sample {
    pub fn new(level: u32, xp: u64, at: NaiveDateTime) -> Self {
        Self { level, xp, at }
    }
}

/// Timing knobs for the session, derived from [`TrackerConfig`].
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub idle_reset: TimeDelta,
    pub min_calculation: TimeDelta,
    pub death_debounce: TimeDelta,
}

impl From<&TrackerConfig> for SessionSettings {
    fn from(config: &TrackerConfig) -> Self {
        Self {
            idle_reset: TimeDelta::minutes(config.idle_reset_minutes as i64),
            min_calculation: TimeDelta::seconds(config.min_seconds_for_calculation as i64),
            death_debounce: TimeDelta::milliseconds(config.death_debounce_ms as i64),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&TrackerConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub session_start: NaiveDateTime,
    pub session_start_xp: u64,
    pub last_xp_seen: u64,
    pub last_xp_gain_time: NaiveDateTime,
    pub last_level_seen: u32,
    pub xp_per_second: f64,
}

/// What the bar shows for a sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionReport {
    pub percent_into_level: f64,
    pub time_to_level: TimeToLevel,
}

#[derive(Debug, Clone)]
pub struct SessionTracker {
    state: SessionState,
    settings: SessionSettings,
}

impl SessionTracker {
    /// A tracker with no player data yet (level 0, 0 XP).
    pub fn new(now: NaiveDateTime, settings: SessionSettings) -> Self {
        Self {
            state: SessionState {
                session_start: now,
                session_start_xp: 0,
                last_xp_seen: 0,
                last_xp_gain_time: now,
                last_level_seen: 0,
                xp_per_second: 0.0,
            },
            settings,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: SessionSettings) {
        self.settings = settings;
    }

    pub fn xp_per_second(&self) -> f64 {
        self.state.xp_per_second
    }

    /// Rebase the session on the given player values.
    pub fn reset(&mut self, now: NaiveDateTime, level: u32, xp: u64) {
        debug!(level, xp, "Session reset");
        self.state = SessionState {
            session_start: now,
            session_start_xp: xp,
            last_xp_seen: xp,
            last_xp_gain_time: now,
            last_level_seen: level,
            xp_per_second: 0.0,
        };
    }

    /// Move the session clocks forward, used to hide time spent paused.
    pub fn shift_timestamps(&mut self, delta: TimeDelta) {
        self.state.session_start += delta;
        self.state.last_xp_gain_time += delta;
    }

    /// Feed one sample and compute what the bar should show.
    ///
    /// Levels without a defined span (0 while loading, the cap) are ignored
    /// and leave the session untouched.
    pub fn update(
        &mut self,
        curve: &LevelCurve,
        sample: Sample,
        deaths: &mut DeathCounter,
    ) -> SessionReport {
        let Sample { level, xp, at: now } = sample;
        if !curve.is_valid_level(level) {
            return SessionReport::default();
        }

        if level > self.state.last_level_seen {
            self.reset(now, level, xp);
        }

        let report = SessionReport {
            percent_into_level: curve.percent_into_level(level, xp),
            time_to_level: TimeToLevel::Unknown,
        };

        if xp < self.state.last_xp_seen
            && deaths.try_register(now, self.settings.death_debounce)
        {
            // Baseline is kept: only the rate is discarded.
            debug!(xp, last_xp = self.state.last_xp_seen, deaths = deaths.count(), "XP regression counted as death");
            self.state.xp_per_second = 0.0;
            return report;
        }

        if xp > self.state.last_xp_seen {
            self.state.last_xp_gain_time = now;
        } else if now.signed_duration_since(self.state.last_xp_gain_time) > self.settings.idle_reset {
            debug!("Session idle timeout");
            self.reset(now, level, xp);
            return report;
        }

        self.state.last_xp_seen = xp;

        let elapsed = now.signed_duration_since(self.state.session_start);
        if elapsed < self.settings.min_calculation {
            return report;
        }

        let elapsed_secs = elapsed.num_milliseconds() as f64 / 1000.0;
        let gained = xp as i64 - self.state.session_start_xp as i64;
        if gained > 0 && elapsed_secs > 0.0 {
            self.state.xp_per_second = gained as f64 / elapsed_secs;
        }

        if self.state.xp_per_second <= 0.0 {
            return report;
        }

        let remaining = curve.remaining_xp(level, xp) as f64;
        SessionReport {
            time_to_level: TimeToLevel::from_secs_f64(remaining / self.state.xp_per_second),
            ..report
        }
    }
}

//! Host-facing tracker.
//!
//! The host drives [`XpTracker`] through [`TelemetryHandler`] and reads the
//! derived outputs each frame. Nothing here reads the clock or the game
//! process: every input arrives as an argument.

use chrono::{NaiveDateTime, TimeDelta};
use tracing::info;
use xpbar_types::{DisplayMode, TrackerConfig};

use crate::area::{AreaTransition, AreaTransitionController, TrackState};
use crate::bar::{BarSegments, bar_segments};
use crate::format::{TimeToLevel, format_percent, format_run_time};
use crate::history::MapRun;
use crate::level_curve::LevelCurve;
use crate::session::{Sample, SessionReport, SessionSettings};
use crate::state::{AreaInstance, PlayerSnapshot, TrackerCache};

/// Lifecycle hooks the host calls.
pub trait TelemetryHandler {
    /// Called once when the overlay starts.
    fn init(&mut self, now: NaiveDateTime);

    /// Called on every zone change. `player` is None while the host has no
    /// character data.
    fn on_area_change(
        &mut self,
        area: &AreaInstance,
        player: Option<PlayerSnapshot>,
        now: NaiveDateTime,
    ) -> AreaTransition;

    /// Called every frame with the current player values.
    fn on_sample(&mut self, sample: Sample);
}

/// One row of the run history panel.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub area_name: String,
    pub percent_gain: f64,
    pub elapsed: TimeDelta,
    pub elapsed_display: String,
    pub is_live: bool,
}

/// Text drawn on the bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlayText {
    /// "{level} ({pct}%)", or "Paused"
    pub primary: String,
    /// Time to level and extras, depending on display mode
    pub secondary: Option<String>,
}

#[derive(Debug, Clone)]
pub struct XpTracker {
    config: TrackerConfig,
    cache: TrackerCache,
    controller: AreaTransitionController,
    report: SessionReport,
    last_sample: Option<Sample>,
}

impl XpTracker {
    pub fn new(config: TrackerConfig, now: NaiveDateTime) -> Self {
        Self::with_curve(LevelCurve::default(), config, now)
    }

    pub fn with_curve(curve: LevelCurve, config: TrackerConfig, now: NaiveDateTime) -> Self {
        let config = config.sanitized();
        Self {
            cache: TrackerCache::new(curve, &config, now),
            controller: AreaTransitionController::new(),
            report: SessionReport::default(),
            last_sample: None,
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Apply new settings. History is trimmed if the limit shrank and the
    /// level cap follows `max_level`.
    pub fn set_config(&mut self, config: TrackerConfig) {
        let config = config.sanitized();
        self.cache.curve = self.cache.curve.clone().with_max_level(config.max_level);
        self.cache.session.set_settings(SessionSettings::from(&config));
        self.cache.history.set_capacity(config.history_limit);
        self.config = config;
    }

    pub fn curve(&self) -> &LevelCurve {
        &self.cache.curve
    }

    pub fn track_state(&self) -> TrackState {
        self.controller.state()
    }

    /// Reset requested from the settings panel: forget everything tracked.
    pub fn on_user_reset_request(&mut self, now: NaiveDateTime) {
        info!("Session reset requested");
        self.cache.reset_session(now);
        self.cache.history.clear();
        self.cache.deaths.reset();
        self.controller.reset();
        self.report = SessionReport {
            percent_into_level: self.last_sample.map_or(0.0, |s| {
                self.cache.curve.percent_into_level(s.level, s.xp)
            }),
            ..SessionReport::default()
        };
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Outputs
    // ─────────────────────────────────────────────────────────────────────────

    pub fn percent_into_level(&self) -> f64 {
        self.report.percent_into_level
    }

    pub fn time_to_level(&self) -> TimeToLevel {
        self.report.time_to_level
    }

    pub fn time_to_level_display(&self) -> String {
        self.report.time_to_level.to_string()
    }

    pub fn is_paused(&self) -> bool {
        self.controller.is_paused()
    }

    pub fn death_count(&self) -> u32 {
        self.cache.deaths.count()
    }

    pub fn projected_areas_to_level(&self) -> f64 {
        self.cache.history.projected_areas_to_level()
    }

    pub fn xp_per_second(&self) -> f64 {
        self.cache.session.xp_per_second()
    }

    /// True while the bar frame should flash for a recent death.
    pub fn is_death_flash_active(&self, now: NaiveDateTime) -> bool {
        let flash = TimeDelta::milliseconds(self.config.death_flash_duration_ms as i64);
        !self.is_paused() && self.cache.deaths.is_flash_active(now, flash)
    }

    /// Bar segments for the last sample.
    pub fn bar(&self) -> BarSegments {
        let Some(sample) = self.last_sample else {
            return BarSegments::default();
        };
        let session_start_xp = self.cache.session.state().session_start_xp;
        bar_segments(&self.cache.curve, sample.level, session_start_xp, sample.xp)
    }

    /// Run history, oldest first.
    ///
    /// The newest open run is live unless tracking is paused; a paused run
    /// shows its progress frozen at the moment the player left.
    pub fn history(&self, now: NaiveDateTime) -> Vec<HistoryEntry> {
        let current_xp = self.cache.player.map(|p| p.xp);
        let paused_since = self.controller.paused_since();

        self.cache
            .history
            .runs()
            .map(|run| self.history_entry(run, current_xp, paused_since, now))
            .collect()
    }

    fn history_entry(
        &self,
        run: &MapRun,
        current_xp: Option<u64>,
        paused_since: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> HistoryEntry {
        let curve = &self.cache.curve;
        let (percent_gain, elapsed) = match (run.is_open(), current_xp) {
            (true, Some(xp)) => (
                run.live_percent_gain(curve, xp),
                run.live_run_time(paused_since.unwrap_or(now)),
            ),
            _ => (run.final_percent_gain(curve), run.final_run_time()),
        };

        HistoryEntry {
            area_name: run.area_name.clone(),
            percent_gain,
            elapsed_display: format_run_time(elapsed),
            elapsed,
            is_live: run.is_open() && paused_since.is_none(),
        }
    }

    /// History rows as shown in the hover panel.
    pub fn history_lines(&self, now: NaiveDateTime) -> Vec<String> {
        self.history(now)
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let sign = if entry.percent_gain >= 0.0 { "+" } else { "" };
                format!(
                    "{}. {}: {}{:.2}% - {} Runtime",
                    i + 1,
                    entry.area_name,
                    sign,
                    entry.percent_gain,
                    entry.elapsed_display
                )
            })
            .collect()
    }

    /// Text for the bar according to the display settings.
    pub fn overlay_text(&self) -> OverlayText {
        if self.is_paused() {
            return OverlayText {
                primary: "Paused".to_string(),
                secondary: None,
            };
        }

        let level = self.last_sample.map_or(0, |s| s.level);
        let primary = format!(
            "{} ({}%)",
            level,
            format_percent(self.report.percent_into_level, self.config.decimal_places)
        );

        let secondary = match self.config.display_mode {
            DisplayMode::Minimal => None,
            _ if !self.config.show_ttl => None,
            DisplayMode::Simple => Some(format!("TTL: {}", self.report.time_to_level)),
            DisplayMode::Full => Some(format!(
                "TTL: {} - Areas: {} - Deaths: {}",
                self.report.time_to_level,
                self.projected_areas_to_level().ceil(),
                self.death_count()
            )),
        };

        OverlayText { primary, secondary }
    }
}

impl TelemetryHandler for XpTracker {
    fn init(&mut self, now: NaiveDateTime) {
        self.controller.reset();
        self.cache.deaths.reset();
        self.cache.reset_session(now);
        self.report = SessionReport::default();
        info!(max_level = self.cache.curve.max_level(), "Tracker initialized");
    }

    fn on_area_change(
        &mut self,
        area: &AreaInstance,
        player: Option<PlayerSnapshot>,
        now: NaiveDateTime,
    ) -> AreaTransition {
        self.controller
            .on_area_change(area, player, now, &mut self.cache)
    }

    fn on_sample(&mut self, sample: Sample) {
        self.cache.player = Some(PlayerSnapshot::new(sample.level, sample.xp));
        self.last_sample = Some(sample);

        if self.is_paused() {
            // Time in town is not measured; only the percentage follows.
            self.report.percent_into_level =
                self.cache.curve.percent_into_level(sample.level, sample.xp);
            return;
        }

        let cache = &mut self.cache;
        self.report = cache
            .session
            .update(&cache.curve, sample, &mut cache.deaths);
    }
}

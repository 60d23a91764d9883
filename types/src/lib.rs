//! Shared configuration types for xpbar
//!
//! This crate contains the serializable tracker configuration that is shared
//! between the engine (xpbar-core) and whatever front-end drives it.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Display Mode
// ─────────────────────────────────────────────────────────────────────────────

/// How much text the overlay shows next to the level percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Time to level, areas to level and death count
    #[default]
    Full,
    /// Time to level only
    Simple,
    /// Level and percentage only
    Minimal,
}

impl DisplayMode {
    pub fn label(&self) -> &'static str {
        match self {
            DisplayMode::Full => "Full",
            DisplayMode::Simple => "Simple",
            DisplayMode::Minimal => "Minimal",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Serde Default Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}
fn default_idle_reset_minutes() -> u32 {
    1
}
fn default_min_seconds_for_calculation() -> u32 {
    10
}
fn default_death_debounce_ms() -> u64 {
    5000
}
fn default_history_limit() -> usize {
    5
}
fn default_max_level() -> u32 {
    100
}
fn default_decimal_places() -> u8 {
    2
}
fn default_death_flash_duration_ms() -> u64 {
    1000
}

// ─────────────────────────────────────────────────────────────────────────────
// Tracker Config
// ─────────────────────────────────────────────────────────────────────────────

/// Tuning values consumed by the tracking engine.
///
/// The engine treats these as opaque inputs; persistence lives in
/// `xpbar_core::context`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Minutes without any XP gain before the session is restarted.
    #[serde(default = "default_idle_reset_minutes")]
    pub idle_reset_minutes: u32,

    /// Seconds a session must run before a rate is computed.
    #[serde(default = "default_min_seconds_for_calculation")]
    pub min_seconds_for_calculation: u32,

    /// Minimum gap between two XP regressions for both to count as deaths.
    #[serde(default = "default_death_debounce_ms")]
    pub death_debounce_ms: u64,

    /// Number of map runs kept in the history.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Level at which progress stops being tracked.
    #[serde(default = "default_max_level")]
    pub max_level: u32,

    /// Decimal places for the level percentage.
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u8,

    /// How long the bar flashes after a death.
    #[serde(default = "default_death_flash_duration_ms")]
    pub death_flash_duration_ms: u64,

    #[serde(default)]
    pub display_mode: DisplayMode,

    #[serde(default = "default_true")]
    pub show_ttl: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            idle_reset_minutes: default_idle_reset_minutes(),
            min_seconds_for_calculation: default_min_seconds_for_calculation(),
            death_debounce_ms: default_death_debounce_ms(),
            history_limit: default_history_limit(),
            max_level: default_max_level(),
            decimal_places: default_decimal_places(),
            death_flash_duration_ms: default_death_flash_duration_ms(),
            display_mode: DisplayMode::Full,
            show_ttl: true,
        }
    }
}

impl TrackerConfig {
    /// Clamp every ranged setting into the range the settings menu allows.
    pub fn sanitized(mut self) -> Self {
        self.idle_reset_minutes = self.idle_reset_minutes.clamp(1, 10);
        self.min_seconds_for_calculation = self.min_seconds_for_calculation.clamp(1, 60);
        self.history_limit = self.history_limit.clamp(1, 20);
        self.decimal_places = self.decimal_places.clamp(1, 4);
        self.death_flash_duration_ms = self.death_flash_duration_ms.clamp(100, 5000);
        self.max_level = self.max_level.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: TrackerConfig = toml::from_str("history_limit = 8").unwrap();
        assert_eq!(config.history_limit, 8);
        assert_eq!(config.idle_reset_minutes, 1);
        assert_eq!(config.min_seconds_for_calculation, 10);
        assert_eq!(config.death_debounce_ms, 5000);
        assert_eq!(config.display_mode, DisplayMode::Full);
        assert!(config.show_ttl);
    }

    #[test]
    fn test_display_mode_from_toml() {
        let config: TrackerConfig = toml::from_str("display_mode = \"Minimal\"").unwrap();
        assert_eq!(config.display_mode, DisplayMode::Minimal);
        assert_eq!(config.display_mode.label(), "Minimal");
    }

    #[test]
    fn test_sanitized_clamps_ranges() {
        let config = TrackerConfig {
            idle_reset_minutes: 0,
            min_seconds_for_calculation: 600,
            history_limit: 0,
            decimal_places: 9,
            death_flash_duration_ms: 10,
            max_level: 0,
            ..TrackerConfig::default()
        }
        .sanitized();

        assert_eq!(config.idle_reset_minutes, 1);
        assert_eq!(config.min_seconds_for_calculation, 60);
        assert_eq!(config.history_limit, 1);
        assert_eq!(config.decimal_places, 4);
        assert_eq!(config.death_flash_duration_ms, 100);
        assert_eq!(config.max_level, 1);
    }

    #[test]
    fn test_sanitized_keeps_defaults() {
        assert_eq!(TrackerConfig::default().sanitized(), TrackerConfig::default());
    }
}

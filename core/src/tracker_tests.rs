//! End-to-end tests for XpTracker
//!
//! Drives the tracker the way a host would: area changes plus a stream of
//! frame samples, then checks the outputs the overlay reads.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::area::{AreaTransition, TrackState};
use crate::context::{DisplayMode, TrackerConfig};
use crate::level_curve::LevelCurve;
use crate::session::Sample;
use crate::state::{AreaInstance, PlayerSnapshot};
use crate::tracker::{TelemetryHandler, XpTracker};

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn at(secs: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 1)
        .unwrap()
        .and_hms_opt(20, 0, 0)
        .unwrap()
        + TimeDelta::seconds(secs)
}

/// Level 1 spans 0..1000, level 2 spans 1000..3000
fn make_tracker(config: TrackerConfig) -> XpTracker {
    let curve = LevelCurve::new(vec![0, 1000, 3000]).unwrap();
    let mut tracker = XpTracker::with_curve(curve, config, at(0));
    tracker.init(at(0));
    tracker
}

fn enter(tracker: &mut XpTracker, area: AreaInstance, xp: u64, secs: i64) -> AreaTransition {
    tracker.on_area_change(&area, Some(PlayerSnapshot::new(1, xp)), at(secs))
}

fn sample(tracker: &mut XpTracker, secs: i64, xp: u64) {
    tracker.on_sample(Sample::new(1, xp, at(secs)));
}

// ═══════════════════════════════════════════════════════════════════════════
// Outputs
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_fresh_tracker_defaults() {
    let tracker = make_tracker(TrackerConfig::default());

    assert_eq!(tracker.percent_into_level(), 0.0);
    assert_eq!(tracker.time_to_level_display(), "00:00:00");
    assert!(!tracker.is_paused());
    assert_eq!(tracker.death_count(), 0);
    assert_eq!(tracker.projected_areas_to_level(), 0.0);
    assert!(tracker.history(at(0)).is_empty());
    assert_eq!(tracker.track_state(), TrackState::Idle);
}

#[test]
fn test_samples_drive_rate_and_text() {
    let mut tracker = make_tracker(TrackerConfig::default());
    enter(&mut tracker, AreaInstance::new("Dunes", 100), 0, 0);

    sample(&mut tracker, 0, 0);
    sample(&mut tracker, 50, 500);

    assert_eq!(tracker.percent_into_level(), 50.0);
    assert_eq!(tracker.xp_per_second(), 10.0);
    assert_eq!(tracker.time_to_level_display(), "00:00:50");

    let text = tracker.overlay_text();
    assert_eq!(text.primary, "1 (50%)");
    assert_eq!(
        text.secondary.as_deref(),
        Some("TTL: 00:00:50 - Areas: 0 - Deaths: 0")
    );

    let bar = tracker.bar();
    assert_eq!(bar.level_fraction, 0.5);
    assert_eq!(bar.session_fraction, 0.5);
}

#[test]
fn test_display_modes() {
    let mut config = TrackerConfig {
        display_mode: DisplayMode::Simple,
        ..TrackerConfig::default()
    };
    let mut tracker = make_tracker(config.clone());
    sample(&mut tracker, 0, 250);
    assert_eq!(tracker.overlay_text().secondary.as_deref(), Some("TTL: 00:00:00"));

    config.display_mode = DisplayMode::Minimal;
    tracker.set_config(config.clone());
    assert_eq!(tracker.overlay_text().secondary, None);
    assert_eq!(tracker.overlay_text().primary, "1 (25%)");

    config.display_mode = DisplayMode::Full;
    config.show_ttl = false;
    tracker.set_config(config);
    assert_eq!(tracker.overlay_text().secondary, None);
}

#[test]
fn test_death_count_and_flash() {
    let mut tracker = make_tracker(TrackerConfig::default());
    enter(&mut tracker, AreaInstance::new("Dunes", 100), 0, 0);

    sample(&mut tracker, 0, 0);
    sample(&mut tracker, 20, 600);
    sample(&mut tracker, 21, 500);
    sample(&mut tracker, 22, 500);

    assert_eq!(tracker.death_count(), 1);
    assert!(tracker.is_death_flash_active(at(21)));
    assert!(!tracker.is_death_flash_active(at(23)));

    sample(&mut tracker, 30, 400);
    assert_eq!(tracker.death_count(), 2);

    enter(&mut tracker, AreaInstance::new("Crypt", 101), 400, 40);
    assert_eq!(tracker.death_count(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Pause / resume
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_pause_excludes_town_time_from_run() {
    let mut tracker = make_tracker(TrackerConfig::default());
    enter(&mut tracker, AreaInstance::new("Dunes", 100), 0, 0);
    sample(&mut tracker, 0, 0);
    sample(&mut tracker, 60, 300);

    enter(&mut tracker, AreaInstance::town("Town", 1), 300, 60);
    assert!(tracker.is_paused());
    assert_eq!(tracker.overlay_text().primary, "Paused");

    // samples in town neither tick the session nor count deaths
    sample(&mut tracker, 200, 300);
    assert_eq!(tracker.death_count(), 0);

    let paused = tracker.history(at(200));
    assert_eq!(paused.len(), 1);
    assert!(!paused[0].is_live);
    assert_eq!(paused[0].elapsed, TimeDelta::seconds(60));
    assert_eq!(paused[0].percent_gain, 30.0);

    // D = 240s in town
    enter(&mut tracker, AreaInstance::new("Dunes", 100), 300, 300);
    assert!(!tracker.is_paused());
    let live = tracker.history(at(330));
    assert!(live[0].is_live);
    assert_eq!(live[0].elapsed, TimeDelta::seconds(90));

    // the rate ignores the pause: 600 XP over 120s of play
    sample(&mut tracker, 360, 600);
    assert_eq!(tracker.xp_per_second(), 5.0);

    enter(&mut tracker, AreaInstance::new("Crypt", 101), 600, 400);
    let closed = tracker.history(at(400));
    assert_eq!(closed[0].elapsed, TimeDelta::seconds(400 - 240));
    assert_eq!(closed[0].percent_gain, 60.0);
    assert!(!closed[0].is_live);
    assert!(closed[1].is_live);
}

#[test]
fn test_history_lines() {
    let mut tracker = make_tracker(TrackerConfig::default());
    enter(&mut tracker, AreaInstance::new("Dunes", 100), 500, 0);
    enter(&mut tracker, AreaInstance::new("Crypt", 101), 400, 125);
    sample(&mut tracker, 185, 650);

    let lines = tracker.history_lines(at(185));
    assert_eq!(
        lines,
        vec![
            "1. Dunes: -10.00% - 02:05 Runtime".to_string(),
            "2. Crypt: +25.00% - 01:00 Runtime".to_string(),
        ]
    );
}

#[test]
fn test_history_limit_from_config() {
    let config = TrackerConfig {
        history_limit: 2,
        ..TrackerConfig::default()
    };
    let mut tracker = make_tracker(config);
    for (i, name) in ["A", "B", "C"].iter().enumerate() {
        enter(&mut tracker, AreaInstance::new(*name, i as u64 + 10), 0, i as i64 * 10);
    }

    let names: Vec<_> = tracker
        .history(at(40))
        .into_iter()
        .map(|e| e.area_name)
        .collect();
    assert_eq!(names, vec!["B", "C"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Reset / missing data
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_user_reset_clears_everything() {
    let mut tracker = make_tracker(TrackerConfig::default());
    enter(&mut tracker, AreaInstance::new("Dunes", 100), 0, 0);
    sample(&mut tracker, 0, 0);
    sample(&mut tracker, 20, 500);
    sample(&mut tracker, 21, 400);
    enter(&mut tracker, AreaInstance::town("Town", 1), 400, 30);

    tracker.on_user_reset_request(at(40));

    assert!(tracker.history(at(40)).is_empty());
    assert_eq!(tracker.death_count(), 0);
    assert!(!tracker.is_paused());
    assert_eq!(tracker.track_state(), TrackState::Idle);
    assert_eq!(tracker.time_to_level_display(), "00:00:00");
    assert_eq!(tracker.xp_per_second(), 0.0);
}

#[test]
fn test_user_reset_keeps_percent_from_last_sample() {
    let mut tracker = make_tracker(TrackerConfig::default());
    enter(&mut tracker, AreaInstance::new("Dunes", 100), 0, 0);
    sample(&mut tracker, 0, 0);
    sample(&mut tracker, 30, 400);

    tracker.on_user_reset_request(at(40));

    assert_eq!(tracker.percent_into_level(), 40.0);
    assert_eq!(tracker.overlay_text().primary, "1 (40%)");
    assert_eq!(tracker.time_to_level_display(), "00:00:00");
}

#[test]
fn test_area_change_without_player() {
    let mut tracker = make_tracker(TrackerConfig::default());
    let transition = tracker.on_area_change(&AreaInstance::new("Dunes", 100), None, at(0));

    assert_eq!(transition, AreaTransition::Ignored);
    assert!(tracker.history(at(0)).is_empty());
}

#[test]
fn test_level_up_sample_restarts_rate() {
    let mut tracker = make_tracker(TrackerConfig::default());
    sample(&mut tracker, 0, 0);
    sample(&mut tracker, 30, 900);
    assert_eq!(tracker.xp_per_second(), 30.0);

    tracker.on_sample(Sample::new(2, 1100, at(40)));
    assert_eq!(tracker.xp_per_second(), 0.0);
    assert_eq!(tracker.time_to_level_display(), "00:00:00");
    assert_eq!(tracker.percent_into_level(), 5.0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Config changes
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_set_config_applies_max_level() {
    let curve = LevelCurve::new(vec![0, 1000, 3000, 6000]).unwrap();
    let mut tracker = XpTracker::with_curve(curve, TrackerConfig::default(), at(0));
    tracker.init(at(0));
    assert_eq!(tracker.curve().max_level(), 4);

    tracker.set_config(TrackerConfig {
        max_level: 2,
        ..TrackerConfig::default()
    });
    assert_eq!(tracker.curve().max_level(), 2);

    // level 2 is the cap now: no progress is tracked
    tracker.on_sample(Sample::new(2, 2000, at(10)));
    assert_eq!(tracker.percent_into_level(), 0.0);

    // raising the cap again restores the table levels
    tracker.set_config(TrackerConfig::default());
    assert_eq!(tracker.curve().max_level(), 4);
    tracker.on_sample(Sample::new(2, 2000, at(20)));
    assert_eq!(tracker.percent_into_level(), 50.0);
}

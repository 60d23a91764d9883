//! Tests for RunHistory
//!
//! Verifies FIFO eviction, idempotent closing, pause shifting and the
//! areas-to-level projection.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::level_curve::LevelCurve;

use super::RunHistory;

fn at(secs: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 1)
        .unwrap()
        .and_hms_opt(20, 0, 0)
        .unwrap()
        + TimeDelta::seconds(secs)
}

/// Level 1 spans 0..1000, level 2 spans 1000..3000
fn curve() -> LevelCurve {
    LevelCurve::new(vec![0, 1000, 3000]).unwrap()
}

fn names(history: &RunHistory) -> Vec<&str> {
    history.runs().map(|r| r.area_name.as_str()).collect()
}

#[test]
fn test_capacity_evicts_oldest_in_order() {
    let mut history = RunHistory::new(3);
    for (i, name) in ["A", "B", "C", "D"].iter().enumerate() {
        history.close_current_run(i as u64 * 10, at(i as i64 * 60));
        history.open_run(name, 1, i as u64 * 10, at(i as i64 * 60));
    }

    assert_eq!(history.len(), 3);
    assert_eq!(names(&history), vec!["B", "C", "D"]);
    assert!(history.current_run().is_some_and(|r| r.area_name == "D"));
}

#[test]
fn test_shrinking_capacity_trims() {
    let mut history = RunHistory::new(5);
    for name in ["A", "B", "C", "D"] {
        history.open_run(name, 1, 0, at(0));
    }
    history.set_capacity(2);
    assert_eq!(names(&history), vec!["C", "D"]);
    assert_eq!(history.capacity(), 2);
}

#[test]
fn test_close_is_idempotent() {
    let mut history = RunHistory::default();
    assert!(!history.close_current_run(100, at(0)));

    history.open_run("Dunes", 1, 100, at(0));
    assert!(history.close_current_run(400, at(60)));
    assert!(!history.close_current_run(900, at(120)));

    let run = history.runs().next().unwrap();
    assert_eq!(run.gain(), Some(300));
    assert_eq!(run.final_run_time(), TimeDelta::seconds(60));
    assert!(history.current_run().is_none());
}

#[test]
fn test_shift_only_moves_open_run() {
    let mut history = RunHistory::default();
    history.open_run("Dunes", 1, 0, at(0));
    history.close_current_run(100, at(60));
    history.open_run("Crypt", 1, 100, at(60));

    history.shift_all_timestamps(TimeDelta::seconds(30));

    let runs: Vec<_> = history.runs().collect();
    assert_eq!(runs[0].start_time, at(0));
    assert_eq!(runs[1].start_time, at(90));
}

#[test]
fn test_projection_averages_positive_runs() {
    let curve = curve();
    let mut history = RunHistory::default();

    history.open_run("A", 1, 0, at(0));
    history.close_current_run(200, at(60));
    history.open_run("B", 1, 200, at(60));
    history.close_current_run(600, at(120));
    // a run that lost XP is left out of the average
    history.open_run("C", 1, 600, at(120));
    history.close_current_run(500, at(180));

    // average gain 300, 500 XP left in level 1
    let areas = history.recompute_projection(&curve, 1, 500);
    assert!((areas - 500.0 / 300.0).abs() < 1e-9);
    assert_eq!(history.projected_areas_to_level(), areas);
}

#[test]
fn test_projection_keeps_previous_without_data() {
    let curve = curve();
    let mut history = RunHistory::default();

    assert_eq!(history.recompute_projection(&curve, 1, 0), 0.0);

    history.open_run("A", 1, 0, at(0));
    history.close_current_run(250, at(60));
    let first = history.recompute_projection(&curve, 1, 250);
    assert_eq!(first, 3.0);

    // capped level: keep the last value
    assert_eq!(history.recompute_projection(&curve, 3, 3000), 3.0);

    // clearing the log leaves no completed runs, projection stays
    history.clear();
    assert!(history.is_empty());
    let kept = history.recompute_projection(&curve, 1, 250);
    assert_eq!(kept, 3.0);
    assert!(kept.is_finite());
}

#[test]
fn test_projection_ignores_open_run() {
    let curve = curve();
    let mut history = RunHistory::default();
    history.open_run("A", 1, 0, at(0));
    assert_eq!(history.recompute_projection(&curve, 1, 900), 0.0);
}

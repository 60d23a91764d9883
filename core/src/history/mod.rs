//! Map-run history
//!
//! Keeps the most recent map runs in creation order and projects how many
//! more runs the character needs to finish the current level.

mod run;

#[cfg(test)]
mod history_tests;

use std::collections::VecDeque;

use chrono::{NaiveDateTime, TimeDelta};
use tracing::info;

use crate::level_curve::LevelCurve;

pub use run::{MapRun, RunEnd};

pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Bounded, oldest-first log of map runs. Only the newest entry can be open.
#[derive(Debug, Clone)]
pub struct RunHistory {
    runs: VecDeque<MapRun>,
    capacity: usize,
    projected_areas_to_level: f64,
}

impl Default for RunHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl RunHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            runs: VecDeque::with_capacity(capacity + 1),
            capacity,
            projected_areas_to_level: 0.0,
        }
    }

    // --- Run Management ---

    /// Append a new open run, evicting the oldest beyond capacity.
    pub fn open_run(&mut self, area_name: &str, level: u32, xp: u64, now: NaiveDateTime) {
        info!(area = area_name, level, xp, "Map run started");
        self.runs.push_back(MapRun::new(area_name, level, xp, now));
        self.trim_old_runs();
    }

    /// Close the newest run if it is open. Returns whether a run was closed.
    pub fn close_current_run(&mut self, xp: u64, now: NaiveDateTime) -> bool {
        let Some(run) = self.runs.back_mut() else { return false };
        if !run.is_open() {
            return false;
        }
        run.close(xp, now);
        info!(
            area = %run.area_name,
            gained = run.gain().unwrap_or(0),
            secs = run.final_run_time().num_seconds(),
            "Map run finished"
        );
        true
    }

    /// Recompute the areas-to-level projection from completed runs.
    ///
    /// Only runs with a positive gain count. Without such runs, or at a level
    /// with no defined span, the previous projection is kept.
    pub fn recompute_projection(&mut self, curve: &LevelCurve, level: u32, xp: u64) -> f64 {
        let gains: Vec<i64> = self
            .runs
            .iter()
            .filter_map(MapRun::gain)
            .filter(|gain| *gain > 0)
            .collect();

        if gains.is_empty() || !curve.is_valid_level(level) {
            return self.projected_areas_to_level;
        }

        let average = gains.iter().sum::<i64>() as f64 / gains.len() as f64;
        if average > 0.0 {
            self.projected_areas_to_level = curve.remaining_xp(level, xp) as f64 / average;
        }
        self.projected_areas_to_level
    }

    /// Push the open run's start forward by `delta` so paused time is not
    /// counted. Closed runs are left alone.
    pub fn shift_all_timestamps(&mut self, delta: TimeDelta) {
        if let Some(run) = self.runs.back_mut()
            && run.is_open()
        {
            run.start_time += delta;
        }
    }

    /// Drop every run. The projection is kept until new data replaces it.
    pub fn clear(&mut self) {
        self.runs.clear();
    }

    /// Change the capacity, evicting the oldest runs if needed.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.trim_old_runs();
    }

    fn trim_old_runs(&mut self) {
        while self.runs.len() > self.capacity {
            self.runs.pop_front();
        }
    }

    // --- Accessors ---

    pub fn runs(&self) -> impl ExactSizeIterator<Item = &MapRun> {
        self.runs.iter()
    }

    pub fn current_run(&self) -> Option<&MapRun> {
        self.runs.back().filter(|run| run.is_open())
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn projected_areas_to_level(&self) -> f64 {
        self.projected_areas_to_level
    }
}

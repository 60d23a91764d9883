use chrono::{NaiveDateTime, TimeDelta};

use crate::level_curve::LevelCurve;

/// Where and when a run was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunEnd {
    pub xp: u64,
    pub time: NaiveDateTime,
}

/// One tracked visit to a combat area.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRun {
    pub area_name: String,
    pub start_xp: u64,
    pub level_at_start: u32,
    pub start_time: NaiveDateTime,
    /// None while the run is still open
    pub end: Option<RunEnd>,
}

impl MapRun {
    pub fn new(area_name: impl Into<String>, level: u32, xp: u64, now: NaiveDateTime) -> Self {
        Self {
            area_name: area_name.into(),
            start_xp: xp,
            level_at_start: level,
            start_time: now,
            end: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// XP gained over a closed run; negative when XP was lost.
    pub fn gain(&self) -> Option<i64> {
        self.end.map(|end| end.xp as i64 - self.start_xp as i64)
    }

    fn percent_gain_to(&self, curve: &LevelCurve, xp: u64) -> f64 {
        let span = curve.xp_required_in_level(self.level_at_start);
        if span == 0 {
            return 0.0;
        }
        (xp as i64 - self.start_xp as i64) as f64 * 100.0 / span as f64
    }

    /// Share of the starting level gained so far.
    pub fn live_percent_gain(&self, curve: &LevelCurve, current_xp: u64) -> f64 {
        self.percent_gain_to(curve, current_xp)
    }

    /// Share of the starting level gained over the run; 0 while open.
    pub fn final_percent_gain(&self, curve: &LevelCurve) -> f64 {
        self.end
            .map_or(0.0, |end| self.percent_gain_to(curve, end.xp))
    }

    /// Duration of a closed run; zero while open.
    pub fn final_run_time(&self) -> TimeDelta {
        match self.end {
            Some(end) if end.time > self.start_time => end.time - self.start_time,
            _ => TimeDelta::zero(),
        }
    }

    pub fn live_run_time(&self, now: NaiveDateTime) -> TimeDelta {
        now.signed_duration_since(self.start_time).max(TimeDelta::zero())
    }

    pub(super) fn close(&mut self, xp: u64, now: NaiveDateTime) {
        self.end = Some(RunEnd { xp, time: now });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(secs: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap()
            + TimeDelta::seconds(secs)
    }

    fn curve() -> LevelCurve {
        LevelCurve::new(vec![0, 1000, 3000]).unwrap()
    }

    #[test]
    fn test_open_run() {
        let run = MapRun::new("Dunes", 1, 200, at(0));
        assert!(run.is_open());
        assert_eq!(run.gain(), None);
        assert_eq!(run.final_percent_gain(&curve()), 0.0);
        assert_eq!(run.final_run_time(), TimeDelta::zero());
        assert_eq!(run.live_percent_gain(&curve(), 450), 25.0);
        assert_eq!(run.live_run_time(at(75)), TimeDelta::seconds(75));
    }

    #[test]
    fn test_closed_run() {
        let mut run = MapRun::new("Dunes", 1, 200, at(0));
        run.close(700, at(120));
        assert!(!run.is_open());
        assert_eq!(run.gain(), Some(500));
        assert_eq!(run.final_percent_gain(&curve()), 50.0);
        assert_eq!(run.final_run_time(), TimeDelta::seconds(120));
    }

    #[test]
    fn test_loss_is_negative() {
        let mut run = MapRun::new("Dunes", 2, 2000, at(0));
        run.close(1900, at(60));
        assert_eq!(run.gain(), Some(-100));
        assert_eq!(run.final_percent_gain(&curve()), -5.0);
    }

    #[test]
    fn test_invalid_start_level_has_no_percent() {
        let mut run = MapRun::new("Dunes", 3, 3000, at(0));
        run.close(3500, at(60));
        assert_eq!(run.final_percent_gain(&curve()), 0.0);
        assert_eq!(run.live_percent_gain(&curve(), 3500), 0.0);
    }
}

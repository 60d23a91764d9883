//! Virtual clock for script replay
//!
//! Script events carry offsets in seconds from the start of the replay. The
//! clock turns them into timestamps for the tracker and, at non-zero speed,
//! sleeps so the replay runs in (scaled) real time.

use chrono::{NaiveDateTime, TimeDelta};
use std::time::Duration;

/// Virtual clock that maps script offsets to timestamps
#[derive(Debug)]
pub struct VirtualClock {
    /// Timestamp of offset 0
    start: NaiveDateTime,

    /// Timestamp of the last event replayed
    current: NaiveDateTime,

    /// Speed multiplier (1.0 = realtime, 0.0 = instant, 10.0 = 10x speed)
    speed_multiplier: f32,
}

impl VirtualClock {
    pub fn new(start: NaiveDateTime, speed_multiplier: f32) -> Self {
        Self {
            start,
            current: start,
            speed_multiplier: speed_multiplier.max(0.0),
        }
    }

    /// Timestamp of a script offset. Millisecond resolution.
    pub fn time_at(&self, offset_secs: f64) -> NaiveDateTime {
        self.start + TimeDelta::milliseconds((offset_secs * 1000.0).round() as i64)
    }

    /// Advance the clock to a timestamp, sleeping when not in instant mode
    pub fn advance_to(&mut self, time: NaiveDateTime) {
        if self.speed_multiplier > 0.0 && time > self.current {
            let delta_ms = (time - self.current).num_milliseconds().max(0) as f32;
            let sleep_ms = (delta_ms / self.speed_multiplier) as u64;

            if sleep_ms > 0 {
                std::thread::sleep(Duration::from_millis(sleep_ms));
            }
        }

        self.current = time;
    }

    /// Seconds replayed so far
    pub fn elapsed_secs(&self) -> f64 {
        (self.current - self.start).num_milliseconds() as f64 / 1000.0
    }

    pub fn current_time(&self) -> NaiveDateTime {
        self.current
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn is_instant_mode(&self) -> bool {
        self.speed_multiplier == 0.0
    }

    pub fn speed(&self) -> f32 {
        self.speed_multiplier
    }
}

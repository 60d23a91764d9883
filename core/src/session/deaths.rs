use chrono::{NaiveDateTime, TimeDelta};

/// Deaths observed in the current tracked area.
///
/// A death is an XP regression on a live sample. Regressions closer together
/// than the debounce window count once.
#[derive(Debug, Clone, Default)]
pub struct DeathCounter {
    count: u32,
    /// Last time a regression was counted. Survives `reset` so the debounce
    /// still applies right after entering a new area.
    last_processed: Option<NaiveDateTime>,
}

impl DeathCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a death at `now` unless one was counted within `debounce`.
    /// Returns whether it was counted.
    pub fn try_register(&mut self, now: NaiveDateTime, debounce: TimeDelta) -> bool {
        if let Some(last) = self.last_processed
            && now.signed_duration_since(last) <= debounce
        {
            return false;
        }
        self.count += 1;
        self.last_processed = Some(now);
        true
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn last_death_at(&self) -> Option<NaiveDateTime> {
        self.last_processed
    }

    /// True while the bar should flash for the most recent death.
    pub fn is_flash_active(&self, now: NaiveDateTime, flash: TimeDelta) -> bool {
        self.last_processed
            .is_some_and(|last| now.signed_duration_since(last) < flash)
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

use chrono::NaiveDateTime;
use xpbar_types::TrackerConfig;

use crate::history::RunHistory;
use crate::level_curve::LevelCurve;
use crate::session::{DeathCounter, SessionSettings, SessionTracker};

use super::PlayerSnapshot;

/// Pure storage for tracker state.
/// Routing logic lives in AreaTransitionController and XpTracker.
#[derive(Debug, Clone)]
pub struct TrackerCache {
    pub curve: LevelCurve,
    pub session: SessionTracker,
    pub history: RunHistory,
    pub deaths: DeathCounter,
    /// Last player values seen on a sample or area change
    pub player: Option<PlayerSnapshot>,
}

impl TrackerCache {
    pub fn new(curve: LevelCurve, config: &TrackerConfig, now: NaiveDateTime) -> Self {
        Self {
            curve: curve.with_max_level(config.max_level),
            session: SessionTracker::new(now, SessionSettings::from(config)),
            history: RunHistory::new(config.history_limit),
            deaths: DeathCounter::new(),
            player: None,
        }
    }

    /// Restart the session from the last known player values (0/0 if none).
    pub fn reset_session(&mut self, now: NaiveDateTime) {
        let player = self.player.unwrap_or_default();
        self.session.reset(now, player.level, player.xp);
    }
}

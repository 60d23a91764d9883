//! Area transition state machine.
//!
//! Tracks which combat area the current run belongs to:
//! - Idle: nothing tracked yet (startup, after a user reset)
//! - Tracking: a run is live in the given area
//! - Paused: the player left the area for a town or hideout
//!
//! Entering a new combat area rolls the run over; coming back to the paused
//! area resumes it with the time spent away removed from every clock.

use chrono::{NaiveDateTime, TimeDelta};
use tracing::{debug, info};

use crate::state::{AreaInstance, PlayerSnapshot, TrackerCache};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackState {
    #[default]
    Idle,
    Tracking { area: u64 },
    Paused { area: u64, since: NaiveDateTime },
}

/// Outcome of an area change, for callers that log or display it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaTransition {
    /// No player data; nothing changed
    Ignored,
    /// A new run was opened
    RunStarted { closed_previous: bool },
    /// Returned to the paused area
    Resumed { paused_for: TimeDelta },
    /// Left the tracked area for a town or hideout
    Paused,
    /// Event had no effect in the current state
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct AreaTransitionController {
    state: TrackState,
}

impl AreaTransitionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, TrackState::Paused { .. })
    }

    /// Start of the current pause, if paused.
    pub fn paused_since(&self) -> Option<NaiveDateTime> {
        match self.state {
            TrackState::Paused { since, .. } => Some(since),
            _ => None,
        }
    }

    pub fn tracked_area(&self) -> Option<u64> {
        match self.state {
            TrackState::Idle => None,
            TrackState::Tracking { area } | TrackState::Paused { area, .. } => Some(area),
        }
    }

    /// Forget the tracked area and any pause.
    pub fn reset(&mut self) {
        self.state = TrackState::Idle;
    }

    pub fn on_area_change(
        &mut self,
        area: &AreaInstance,
        player: Option<PlayerSnapshot>,
        now: NaiveDateTime,
        cache: &mut TrackerCache,
    ) -> AreaTransition {
        let Some(player) = player else {
            debug!(area = %area.name, "Area change without player data ignored");
            return AreaTransition::Ignored;
        };
        cache.player = Some(player);

        let entering_combat_area = !area.is_town_or_hideout();
        let state = self.state;

        match state {
            TrackState::Idle if entering_combat_area => self.start_run(area, player, now, cache),
            TrackState::Tracking { area: current } | TrackState::Paused { area: current, .. }
                if entering_combat_area && area.hash != current =>
            {
                self.start_run(area, player, now, cache)
            }
            TrackState::Paused { area: current, since } if entering_combat_area && area.hash == current => {
                let paused_for = now.signed_duration_since(since).max(TimeDelta::zero());
                cache.session.shift_timestamps(paused_for);
                cache.history.shift_all_timestamps(paused_for);
                self.state = TrackState::Tracking { area: current };
                info!(area = %area.name, paused_secs = paused_for.num_seconds(), "Tracking resumed");
                AreaTransition::Resumed { paused_for }
            }
            TrackState::Tracking { area: current } if !entering_combat_area => {
                self.state = TrackState::Paused { area: current, since: now };
                info!(area = %area.name, "Tracking paused");
                AreaTransition::Paused
            }
            _ => AreaTransition::Unchanged,
        }
    }

    fn start_run(
        &mut self,
        area: &AreaInstance,
        player: PlayerSnapshot,
        now: NaiveDateTime,
        cache: &mut TrackerCache,
    ) -> AreaTransition {
        let closed_previous = cache.history.close_current_run(player.xp, now);
        let areas = cache
            .history
            .recompute_projection(&cache.curve, player.level, player.xp);
        debug!(areas, closed_previous, "Areas to level recomputed");

        cache.history.open_run(&area.name, player.level, player.xp, now);
        cache.session.reset(now, player.level, player.xp);
        cache.deaths.reset();
        self.state = TrackState::Tracking { area: area.hash };

        AreaTransition::RunStarted { closed_previous }
    }
}

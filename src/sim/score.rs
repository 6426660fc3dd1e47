//! Score, lives and ammo bookkeeping plus the end-of-run check

use super::state::{AlienKind, GameEvent, GamePhase, GameState, RunState, RunSummary};
use crate::consts::*;

impl RunState {
    /// Credit a destroyed alien. Strong aliens also grant a life.
    pub fn award_kill(&mut self, kind: AlienKind) {
        self.score = self.score.saturating_add(kind.score_value());
        if kind.is_strong() {
            self.lives = self.lives.saturating_add(1);
        }
    }

    /// Spend one round. Returns false when the magazine is empty.
    pub fn spend_round(&mut self) -> bool {
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }

    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    /// Pickups are not capped at `MAX_AMMO`
    pub fn add_ammo(&mut self, amount: u32) {
        self.ammo = self.ammo.saturating_add(amount);
    }

    pub fn refill_ammo(&mut self) {
        self.ammo = MAX_AMMO;
    }
}

/// End the run if lives are gone or the last round has been spent and missed.
/// Returns the summary the first time the run ends.
pub fn check_end_of_run(state: &mut GameState, now_ms: u64) -> Option<RunSummary> {
    if state.phase != GamePhase::Running {
        return None;
    }

    let out_of_lives = state.run.lives == 0;
    let out_of_ammo = state.run.ammo == 0 && !state.registry.has_player_bullet();
    if !out_of_lives && !out_of_ammo {
        return None;
    }

    state.clock.stop(now_ms);
    state.phase = GamePhase::GameOver;
    let summary = RunSummary {
        score: state.run.score,
        level: state.run.level,
        played_seconds: state.clock.played_seconds(now_ms),
    };
    log::info!(
        "Game over ({}): score {}, level {}, {}s played",
        if out_of_lives { "no lives" } else { "no ammo" },
        summary.score,
        summary.level,
        summary.played_seconds
    );
    state.events.push(GameEvent::RunEnded(summary.clone()));
    Some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_award_values() {
        let mut run = RunState::default();
        run.award_kill(AlienKind::Small);
        run.award_kill(AlienKind::Medium);
        run.award_kill(AlienKind::Big);
        assert_eq!(run.score, 50);
        assert_eq!(run.lives, START_LIVES);

        run.award_kill(AlienKind::Strong);
        assert_eq!(run.score, 100);
        assert_eq!(run.lives, START_LIVES + 1);
    }

    #[test]
    fn test_spend_round_never_underflows() {
        let mut run = RunState {
            ammo: 1,
            ..Default::default()
        };
        assert!(run.spend_round());
        assert!(!run.spend_round());
        assert_eq!(run.ammo, 0);
    }

    #[test]
    fn test_end_on_lives() {
        let mut state = GameState::empty(1, 0);
        state.run.lives = 0;
        let summary = check_end_of_run(&mut state, 12_500).unwrap();
        assert_eq!(summary.played_seconds, 12);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.clock.is_stopped());

        // Only once
        assert!(check_end_of_run(&mut state, 13_000).is_none());
        let ended = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::RunEnded(_)))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_empty_magazine_waits_for_bullet() {
        let mut state = GameState::empty(1, 0);
        state.run.ammo = 0;
        state.registry.spawn_player_bullet();
        assert!(check_end_of_run(&mut state, 100).is_none());

        state.registry.bullets.clear();
        assert!(check_end_of_run(&mut state, 200).is_some());
    }

    #[test]
    fn test_no_end_while_paused() {
        let mut state = GameState::empty(1, 0);
        state.run.lives = 0;
        state.phase = GamePhase::Paused;
        assert!(check_end_of_run(&mut state, 100).is_none());
    }
}

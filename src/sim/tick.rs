//! Fixed timestep simulation tick
//!
//! Order within a running tick: fire attempt, motion, collisions, wave check,
//! end-of-run check. Pause and quit commands are applied first, at the tick
//! boundary.

use super::state::{GameEvent, GamePhase, GameState};
use super::{collision, motion, score, wave};
use crate::input::ControlFrame;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Unified player control (ignored unless running)
    pub control: ControlFrame,
    /// Wall-clock time of this tick
    pub now_ms: u64,
    /// Request a pause
    pub pause: bool,
    /// Leave the pause
    pub resume: bool,
    /// Abandon the run (only honored while paused)
    pub quit: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    let now_ms = input.now_ms;
    apply_commands(state, input);

    if state.phase != GamePhase::Running {
        return;
    }
    state.time_ticks += 1;

    if input.control.fire {
        try_fire(state);
    }

    let escaped = motion::run(
        &mut state.registry,
        &input.control.lateral,
        &mut state.rng,
        now_ms,
    );
    for _ in 0..escaped {
        state.events.push(GameEvent::StrongAlienEscaped);
    }

    collision::run(
        &mut state.registry,
        &mut state.run,
        &mut state.rng,
        now_ms,
        &mut state.events,
    );
    wave::run(
        &mut state.registry,
        &mut state.run,
        &mut state.rng,
        now_ms,
        &mut state.events,
    );
    score::check_end_of_run(state, now_ms);
}

/// Commands apply in order: pause, then quit or resume from the pause.
/// A quit or resume queued behind a pause therefore lands in the same tick.
fn apply_commands(state: &mut GameState, input: &TickInput) {
    let now_ms = input.now_ms;
    if state.phase == GamePhase::Running && input.pause && state.clock.pause(now_ms) {
        state.phase = GamePhase::Paused;
        state.events.push(GameEvent::Paused);
        log::info!("Paused at tick {}", state.time_ticks);
    }
    if state.phase != GamePhase::Paused {
        return;
    }

    if input.quit {
        state.clock.stop(now_ms);
        state.phase = GamePhase::Quit;
        state.events.push(GameEvent::RunQuit);
        log::info!("Run abandoned from pause");
    } else if input.resume && state.clock.resume(now_ms) {
        state.phase = GamePhase::Running;
        state.events.push(GameEvent::Resumed);
        log::info!(
            "Resumed ({} ms paused in total)",
            state.clock.paused_total_ms()
        );
    }
}

/// Spawn a player bullet if a round is available and none is in flight.
/// Returns true on success.
pub fn try_fire(state: &mut GameState) -> bool {
    if state.registry.has_player_bullet() || !state.run.spend_round() {
        return false;
    }
    state.registry.spawn_player_bullet();
    state.events.push(GameEvent::ShotFired);
    true
}

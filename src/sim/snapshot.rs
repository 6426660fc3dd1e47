//! Read-only per-tick view of the run for rendering

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{AlienKind, BulletOwner, GamePhase, GameState, PowerUpKind};
use crate::highscores::format_clock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudView {
    pub score: u64,
    pub level: u32,
    pub lives: u32,
    pub ammo: u32,
    pub played_seconds: u64,
    /// `MM:SS` label for the played time
    pub clock_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CannonView {
    pub rect: Rect,
    pub shield: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletView {
    pub owner: BulletOwner,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlienView {
    pub kind: AlienKind,
    pub rect: Rect,
    pub hp: u32,
    pub max_hp: u32,
    pub hp_fraction: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpView {
    pub kind: PowerUpKind,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionView {
    pub rect: Rect,
    /// Animation progress in [0, 1]
    pub progress: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub hud: HudView,
    pub cannon: CannonView,
    pub bullets: Vec<BulletView>,
    pub aliens: Vec<AlienView>,
    pub power_ups: Vec<PowerUpView>,
    pub explosions: Vec<ExplosionView>,
}

/// Build a snapshot of the current state. Never modifies the state.
pub fn build_snapshot(state: &GameState, now_ms: u64) -> Snapshot {
    let registry = &state.registry;
    let played_seconds = state.clock.played_seconds(now_ms);

    Snapshot {
        phase: state.phase,
        hud: HudView {
            score: state.run.score,
            level: state.run.level,
            lives: state.run.lives,
            ammo: state.run.ammo,
            played_seconds,
            clock_label: format_clock(played_seconds),
        },
        cannon: CannonView {
            rect: registry.cannon.rect,
            shield: registry.cannon.shield_active(),
        },
        bullets: registry
            .bullets
            .values()
            .map(|b| BulletView {
                owner: b.owner,
                rect: b.rect,
            })
            .collect(),
        aliens: registry
            .aliens
            .values()
            .map(|a| AlienView {
                kind: a.kind,
                rect: a.rect,
                hp: a.hp,
                max_hp: a.max_hp,
                hp_fraction: a.hp_fraction(),
            })
            .collect(),
        power_ups: registry
            .power_ups
            .values()
            .map(|p| PowerUpView {
                kind: p.kind,
                rect: p.rect,
            })
            .collect(),
        explosions: registry
            .explosions
            .values()
            .map(|e| ExplosionView {
                rect: e.rect,
                progress: e.progress(now_ms),
            })
            .collect(),
    }
}

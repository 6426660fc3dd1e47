//! Game state and core simulation types
//!
//! Entities are tagged variants stored in per-category arenas inside the
//! `EntityRegistry`. Systems receive explicit references to the registry and
//! to `RunState`; no entity points back at either.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::{Arena, Handle};
use super::clock::GameClock;
use super::rect::Rect;
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Frozen by explicit user action; resumable
    Paused,
    /// Run ended by lives or ammo exhaustion (terminal, score recorded)
    GameOver,
    /// Run abandoned from the pause menu (terminal, nothing recorded)
    Quit,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Quit)
    }
}

/// Alien types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlienKind {
    Small,
    Medium,
    Big,
    /// Bonus alien: bounces sideways, never fires, expires, grants a life
    Strong,
}

impl AlienKind {
    pub fn max_hp(&self) -> u32 {
        match self {
            AlienKind::Small => 1,
            AlienKind::Medium => 2,
            AlienKind::Big => 3,
            AlienKind::Strong => STRONG_ALIEN_HP,
        }
    }

    pub fn size(&self) -> (f32, f32) {
        match self {
            AlienKind::Small => ALIEN_SMALL_SIZE,
            AlienKind::Medium => ALIEN_MEDIUM_SIZE,
            AlienKind::Big => ALIEN_BIG_SIZE,
            AlienKind::Strong => STRONG_ALIEN_SIZE,
        }
    }

    /// Points awarded on destruction
    pub fn score_value(&self) -> u64 {
        match self {
            AlienKind::Small => SCORE_SMALL,
            AlienKind::Medium | AlienKind::Big => SCORE_MEDIUM_BIG,
            AlienKind::Strong => SCORE_STRONG,
        }
    }

    pub fn is_strong(&self) -> bool {
        *self == AlienKind::Strong
    }
}

/// Horizontal movement pattern of a regular alien
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovePattern {
    Sine,
    Zigzag,
    Random,
}

/// Per-alien firing schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireControl {
    pub enabled: bool,
    /// Minimum gap between shots, drawn once at spawn
    pub delay_ms: u64,
    pub last_shot_ms: u64,
}

/// Variant-specific alien behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AlienBody {
    Regular {
        pattern: MovePattern,
        /// Pattern phase, advanced every tick
        phase: f32,
        fire: FireControl,
    },
    Strong {
        /// Horizontal velocity (pixels per tick)
        vx: f32,
        spawn_time_ms: u64,
        lifespan_ms: u64,
    },
}

/// An alien entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alien {
    pub kind: AlienKind,
    pub hp: u32,
    pub max_hp: u32,
    pub rect: Rect,
    pub body: AlienBody,
}

impl Alien {
    /// A regular (non-strong) alien with its top-left corner at `pos`
    pub fn regular(
        kind: AlienKind,
        pos: Vec2,
        pattern: MovePattern,
        fire_enabled: bool,
        delay_ms: u64,
        now_ms: u64,
    ) -> Self {
        debug_assert!(!kind.is_strong());
        Self {
            kind,
            hp: kind.max_hp(),
            max_hp: kind.max_hp(),
            rect: Rect::from_top_left(pos, kind.size()),
            body: AlienBody::Regular {
                pattern,
                phase: 0.0,
                fire: FireControl {
                    enabled: fire_enabled,
                    delay_ms,
                    last_shot_ms: now_ms,
                },
            },
        }
    }

    /// A strong alien entering from the side opposite its direction of travel
    pub fn strong(y: f32, vx: f32, now_ms: u64) -> Self {
        let kind = AlienKind::Strong;
        let (w, _) = kind.size();
        let x = if vx > 0.0 { -w } else { SCREEN_WIDTH };
        Self {
            kind,
            hp: kind.max_hp(),
            max_hp: kind.max_hp(),
            rect: Rect::from_top_left(Vec2::new(x, y), kind.size()),
            body: AlienBody::Strong {
                vx,
                spawn_time_ms: now_ms,
                lifespan_ms: STRONG_ALIEN_LIFESPAN_MS,
            },
        }
    }

    /// Remaining health as a fraction for health bars
    pub fn hp_fraction(&self) -> f32 {
        self.hp as f32 / self.max_hp.max(1) as f32
    }

    /// Enable or disable firing (no-op for strong aliens)
    pub fn set_fire_enabled(&mut self, enabled: bool) {
        if let AlienBody::Regular { fire, .. } = &mut self.body {
            fire.enabled = enabled;
        }
    }

    pub fn fire_enabled(&self) -> bool {
        match &self.body {
            AlienBody::Regular { fire, .. } => fire.enabled,
            AlienBody::Strong { .. } => false,
        }
    }
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Alien,
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub owner: BulletOwner,
    pub rect: Rect,
    /// Vertical velocity (pixels per tick, negative = up)
    pub vy: f32,
}

impl Bullet {
    /// Player bullet leaving the cannon muzzle
    pub fn player(muzzle: Vec2) -> Self {
        Self {
            owner: BulletOwner::Player,
            rect: Rect::from_mid_bottom(muzzle, BULLET_SIZE),
            vy: BULLET_SPEED,
        }
    }

    /// Alien bullet leaving an alien's underside
    pub fn alien(gun: Vec2) -> Self {
        Self {
            owner: BulletOwner::Alien,
            rect: Rect::from_mid_top(gun, ALIEN_BULLET_SIZE),
            vy: ALIEN_BULLET_SPEED,
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Ammo,
    Shield,
}

impl PowerUpKind {
    pub fn size(&self) -> (f32, f32) {
        match self {
            PowerUpKind::Ammo => POWERUP_AMMO_SIZE,
            PowerUpKind::Shield => POWERUP_SHIELD_SIZE,
        }
    }
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub rect: Rect,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, center: Vec2) -> Self {
        Self {
            kind,
            rect: Rect::from_center(center, kind.size()),
        }
    }
}

/// A short-lived explosion sprite (no gameplay effect)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub rect: Rect,
    pub created_ms: u64,
    pub duration_ms: u64,
}

impl Explosion {
    pub fn new(center: Vec2, now_ms: u64) -> Self {
        Self {
            rect: Rect::from_center(center, EXPLOSION_SIZE),
            created_ms: now_ms,
            duration_ms: EXPLOSION_DURATION_MS,
        }
    }

    /// Animation progress in [0, 1]
    pub fn progress(&self, now_ms: u64) -> f32 {
        let age = now_ms.saturating_sub(self.created_ms) as f32;
        (age / self.duration_ms.max(1) as f32).min(1.0)
    }

    pub fn expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_ms) > self.duration_ms
    }
}

/// The player's cannon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cannon {
    pub rect: Rect,
    /// Shield expiry time; `None` when no shield is up
    pub shield_expiry_ms: Option<u64>,
}

impl Default for Cannon {
    fn default() -> Self {
        Self {
            rect: Rect::from_mid_bottom(
                Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT - CANNON_BOTTOM_MARGIN),
                CANNON_SIZE,
            ),
            shield_expiry_ms: None,
        }
    }
}

impl Cannon {
    pub fn shield_active(&self) -> bool {
        self.shield_expiry_ms.is_some()
    }

    /// Raise (or refresh) the shield
    pub fn activate_shield(&mut self, now_ms: u64) {
        self.shield_expiry_ms = Some(now_ms + SHIELD_DURATION_MS);
    }

    /// Drop the shield after it absorbs a hit
    pub fn consume_shield(&mut self) {
        self.shield_expiry_ms = None;
    }

    /// Expire the shield once its time is up
    pub fn expire_shield(&mut self, now_ms: u64) {
        if self.shield_expiry_ms.is_some_and(|expiry| now_ms > expiry) {
            self.shield_expiry_ms = None;
        }
    }
}

/// Owns every live entity of the current run
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    pub cannon: Cannon,
    pub bullets: Arena<Bullet>,
    pub aliens: Arena<Alien>,
    pub power_ups: Arena<PowerUp>,
    pub explosions: Arena<Explosion>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_bullet_count(&self) -> usize {
        self.bullets
            .values()
            .filter(|b| b.owner == BulletOwner::Player)
            .count()
    }

    pub fn alien_bullet_count(&self) -> usize {
        self.bullets
            .values()
            .filter(|b| b.owner == BulletOwner::Alien)
            .count()
    }

    pub fn has_player_bullet(&self) -> bool {
        self.bullets.values().any(|b| b.owner == BulletOwner::Player)
    }

    pub fn spawn_alien(&mut self, alien: Alien) -> Handle {
        log::debug!("Spawned {:?} alien at ({:.0}, {:.0})", alien.kind, alien.rect.x, alien.rect.y);
        self.aliens.insert(alien)
    }

    pub fn spawn_player_bullet(&mut self) -> Handle {
        let muzzle = self.cannon.rect.mid_top();
        self.bullets.insert(Bullet::player(muzzle))
    }

    pub fn spawn_explosion(&mut self, center: Vec2, now_ms: u64) -> Handle {
        self.explosions.insert(Explosion::new(center, now_ms))
    }

    pub fn spawn_power_up(&mut self, kind: PowerUpKind, center: Vec2) -> Handle {
        self.power_ups.insert(PowerUp::new(kind, center))
    }

    /// Remove everything except the cannon
    pub fn clear(&mut self) {
        self.bullets.clear();
        self.aliens.clear();
        self.power_ups.clear();
        self.explosions.clear();
    }
}

/// Counters for the current run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub score: u64,
    pub level: u32,
    pub lives: u32,
    pub ammo: u32,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            score: 0,
            level: 1,
            lives: START_LIVES,
            ammo: MAX_AMMO,
        }
    }
}

/// Summary produced once when a run ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub level: u32,
    pub played_seconds: u64,
}

/// Things that happened during a tick, drained by the game loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired,
    AlienHit { kind: AlienKind, hp_left: u32 },
    AlienDestroyed { kind: AlienKind, center: Vec2 },
    /// Strong alien timed out without being killed
    StrongAlienEscaped,
    CannonHit { lives_left: u32 },
    ShieldAbsorbed,
    PowerUpCollected { kind: PowerUpKind },
    LevelAdvanced { level: u32 },
    Paused,
    Resumed,
    RunEnded(RunSummary),
    RunQuit,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub run: RunState,
    pub registry: EntityRegistry,
    pub clock: GameClock,
    /// Simulation tick counter (running ticks only)
    pub time_ticks: u64,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a new run: fresh counters, cannon, and the level-1 wave
    pub fn new(seed: u64, now_ms: u64) -> Self {
        let mut state = Self::empty(seed, now_ms);
        super::wave::spawn_wave(
            &mut state.registry,
            &mut state.rng,
            state.run.level,
            now_ms,
        );
        log::info!("Run started (seed {})", seed);
        state
    }

    /// Fixture constructor: a running state with no aliens. The caller
    /// places its own; left empty, the first tick clears level 1.
    #[doc(hidden)]
    pub fn empty(seed: u64, now_ms: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Running,
            run: RunState::default(),
            registry: EntityRegistry::new(),
            clock: GameClock::start(now_ms),
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

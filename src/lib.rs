//! Gesture Invaders - simulation core for a cannon-vs-alien-waves arcade game
//!
//! Core modules:
//! - `sim`: Deterministic per-tick simulation (entities, motion, collisions, waves)
//! - `input`: Keyboard + hand-gesture fusion into one control stream
//! - `game_loop`: Fixed-tick orchestration, pause/quit, snapshot hand-off
//! - `highscores` / `persistence`: Append-only score records and leaderboard
//! - `audio`: Fire-and-forget sound cue dispatch
//! - `platform`: Time sources (wall clock, manual clock for tests)

pub mod audio;
pub mod game_loop;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use game_loop::GameLoop;
pub use highscores::{HighScores, ScoreRecord};
pub use input::{ControlFrame, GestureSignal, InputUnifier, KeyEvent};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const TICK_RATE: u32 = 60;
    /// Milliseconds per tick
    pub const TICK_MS: f64 = 1000.0 / TICK_RATE as f64;
    /// Maximum catch-up ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (pixels, origin top-left, y down)
    pub const SCREEN_WIDTH: f32 = 900.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Cannon
    pub const CANNON_SIZE: (f32, f32) = (72.0, 48.0);
    /// Gap between cannon bottom and screen bottom
    pub const CANNON_BOTTOM_MARGIN: f32 = 12.0;
    /// Keyboard displacement per tick while a direction is held
    pub const CANNON_KEY_SPEED: f32 = 8.0;
    /// Fraction of the remaining distance to the gesture target covered per tick
    pub const CANNON_SMOOTH: f32 = 0.25;
    pub const SHIELD_DURATION_MS: u64 = 5000;

    /// Projectiles (pixels per tick, signed: negative = up)
    pub const BULLET_SPEED: f32 = -12.0;
    pub const ALIEN_BULLET_SPEED: f32 = 4.0;
    pub const BULLET_SIZE: (f32, f32) = (10.0, 18.0);
    pub const ALIEN_BULLET_SIZE: (f32, f32) = (12.0, 22.0);
    /// Global cap on concurrently live alien bullets
    pub const MAX_ALIEN_BULLETS: usize = 6;

    /// Aliens
    pub const ALIEN_SMALL_SIZE: (f32, f32) = (36.0, 32.0);
    pub const ALIEN_MEDIUM_SIZE: (f32, f32) = (52.0, 40.0);
    pub const ALIEN_BIG_SIZE: (f32, f32) = (68.0, 54.0);
    pub const STRONG_ALIEN_SIZE: (f32, f32) = (60.0, 50.0);
    pub const STRONG_ALIEN_HP: u32 = 4;
    pub const STRONG_ALIEN_SPEED: f32 = 4.0;
    pub const STRONG_ALIEN_LIFESPAN_MS: u64 = 15_000;
    /// Pattern phase advance per tick
    pub const ALIEN_PHASE_STEP: f32 = 0.08;
    pub const ALIEN_SWAY_AMPLITUDE: f32 = 3.0;
    pub const ALIEN_DRIFT: f32 = 0.06;
    /// Fire delay range drawn once per alien (ms, inclusive)
    pub const ALIEN_FIRE_DELAY_MS: (u64, u64) = (1800, 3800);
    pub const MAX_ALIENS: u32 = 5;
    /// Levels above this enable alien fire and shield power-ups
    pub const FIRE_LEVEL_THRESHOLD: u32 = 5;

    /// Power-ups
    pub const POWERUP_SPEED: f32 = 6.0;
    pub const POWERUP_AMMO_SIZE: (f32, f32) = (30.0, 30.0);
    pub const POWERUP_SHIELD_SIZE: (f32, f32) = (36.0, 36.0);
    pub const POWERUP_DROP_CHANCE: f64 = 0.25;
    pub const POWERUP_AMMO_BONUS: u32 = 5;

    /// Explosions (visual only)
    pub const EXPLOSION_SIZE: (f32, f32) = (48.0, 48.0);
    pub const EXPLOSION_DURATION_MS: u64 = 300;

    /// Run state
    pub const MAX_AMMO: u32 = 10;
    pub const START_LIVES: u32 = 3;

    /// Score awards
    pub const SCORE_SMALL: u64 = 10;
    pub const SCORE_MEDIUM_BIG: u64 = 20;
    pub const SCORE_STRONG: u64 = 50;

    /// Longest stored player name
    pub const MAX_NAME_LEN: usize = 12;
}

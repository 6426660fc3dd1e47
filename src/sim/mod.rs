//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Time is passed in, never read
//! - Stable iteration order (arena slot order)
//! - No rendering, audio or platform dependencies

pub mod arena;
pub mod clock;
pub mod collision;
pub mod motion;
pub mod rect;
pub mod score;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod wave;

pub use arena::{Arena, Handle};
pub use clock::GameClock;
pub use rect::Rect;
pub use snapshot::{Snapshot, build_snapshot};
pub use state::{
    Alien, AlienBody, AlienKind, Bullet, BulletOwner, Cannon, EntityRegistry, Explosion,
    GameEvent, GamePhase, GameState, MovePattern, PowerUp, PowerUpKind, RunState, RunSummary,
};
pub use tick::{TickInput, tick, try_fire};

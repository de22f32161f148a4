//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (insertion order within each collection)
//! - No rendering, audio or platform dependencies
//!
//! Side effects leave the world as `GameEvent`s, read after each tick.

pub mod collision;
pub mod entities;
pub mod events;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{circles_overlap, resolve_collisions};
pub use entities::{Asteroid, Bullet, BulletOwner, Particle, Saucer, Ship};
pub use events::GameEvent;
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use timer::RepeatTimer;

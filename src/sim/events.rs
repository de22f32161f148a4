//! Side effects produced by a tick
//!
//! The simulation never calls audio or rendering code directly. It records
//! what happened and the frame driver hands the list to the collaborators.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Splash/GameOver -> Playing
    GameStarted,
    /// Playing -> GameOver
    GameOver,
    /// Ship started thrusting
    EngineStarted,
    /// Ship stopped thrusting (or was forced off)
    EngineStopped,
    PlayerFired,
    SaucerFired,
    AsteroidDestroyed { pos: Vec2, radius: f32, split: bool },
    SaucerDestroyed { pos: Vec2 },
    ShipDestroyed { pos: Vec2, lives_left: u32 },
    SaucerSpawned,
    /// Saucer left the field without being shot
    SaucerExited,
    /// Asteroid field emptied and was refilled
    FieldRefilled,
}

//! Game state and phase transitions
//!
//! `GameState` is the whole simulation world: one owner for score, the
//! ship, every entity collection, the RNG and the scheduled timers.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entities::{Asteroid, Bullet, Particle, Saucer, Ship};
use super::events::GameEvent;
use super::spawn;
use super::timer::RepeatTimer;
use crate::settings::Settings;
use crate::tuning::Tuning;
use crate::wrap_position;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen; the field is inert until a start signal
    Splash,
    /// Active gameplay
    Playing,
    /// Ship out of lives; waiting for a restart signal
    GameOver,
}

/// Complete simulation world
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    pub ship: Ship,
    /// Player bullets
    pub bullets: Vec<Bullet>,
    pub saucer_bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    pub saucers: Vec<Saucer>,
    /// Visual debris (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Simulated milliseconds spent in Playing since the last start
    pub clock_ms: f64,
    /// `clock_ms` deadline for the next saucer
    pub next_saucer_ms: f64,
    /// Auto-fire repeat while the fire intent is held
    pub auto_fire: RepeatTimer,
    /// Frames ticked since creation (all phases)
    pub frame: u64,
    /// Cap on live particles (presentation setting)
    pub max_particles: usize,
    /// Events produced by the most recent tick
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a world in the Splash phase with a backdrop asteroid field
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut state = Self {
            ship: Ship::new(&tuning),
            auto_fire: RepeatTimer::new(tuning.auto_fire_interval_ms),
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Splash,
            score: 0,
            bullets: Vec::new(),
            saucer_bullets: Vec::new(),
            asteroids: Vec::new(),
            saucers: Vec::new(),
            particles: Vec::new(),
            clock_ms: 0.0,
            next_saucer_ms: 0.0,
            frame: 0,
            max_particles: Settings::default().max_particles(),
            events: Vec::new(),
            next_id: 1,
        };

        spawn::spawn_asteroid_field(&mut state);

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Events produced by the most recent tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Start (from Splash) or restart (from GameOver) a run.
    /// Returns false while already playing.
    pub fn start(&mut self) -> bool {
        if self.phase == GamePhase::Playing {
            return false;
        }

        self.score = 0;
        self.clock_ms = 0.0;
        self.bullets.clear();
        self.saucer_bullets.clear();
        self.saucers.clear();
        self.particles.clear();
        self.asteroids.clear();
        self.auto_fire = RepeatTimer::new(self.tuning.auto_fire_interval_ms);
        self.ship = Ship::new(&self.tuning);

        spawn::spawn_asteroid_field(self);
        spawn::schedule_saucer(self);

        let from = self.phase;
        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::GameStarted);
        log::info!(
            "Run started from {:?} ({} asteroids, first saucer at {:.0} ms)",
            from,
            self.asteroids.len(),
            self.next_saucer_ms
        );
        true
    }

    /// Playing -> GameOver. Forces the engine off and drops pending auto-fire.
    pub(crate) fn enter_game_over(&mut self) {
        if self.ship.thrusting {
            self.ship.thrusting = false;
            self.push_event(GameEvent::EngineStopped);
        }
        self.ship.rotation = 0.0;
        self.auto_fire.cancel();
        self.phase = GamePhase::GameOver;
        self.push_event(GameEvent::GameOver);
        log::info!("Game over with score {}", self.score);
    }

    /// Adopt a new field size (canvas resize). Wrapped entities are folded
    /// back into the new bounds.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.tuning.width = width;
        self.tuning.height = height;
        let bounds = Vec2::new(width, height);

        self.ship.pos = wrap_position(self.ship.pos, bounds);
        for asteroid in &mut self.asteroids {
            asteroid.pos = wrap_position(asteroid.pos, bounds);
        }
        for bullet in self.bullets.iter_mut().chain(self.saucer_bullets.iter_mut()) {
            bullet.pos = wrap_position(bullet.pos, bounds);
        }
        log::debug!("Field resized to {}x{}", width, height);
    }
}

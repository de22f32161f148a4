//! Entity models and their per-frame update rules
//!
//! Each entity owns its kinematic state and knows how to advance it. None of
//! them look at other entities; interactions live in `collision`.

use glam::Vec2;
use rand::Rng;

use super::events::GameEvent;
use crate::consts::SHIP_START_HEADING;
use crate::tuning::Tuning;
use crate::{heading_vector, random_range, wrap_coord, wrap_position};

/// The player's ship
#[derive(Debug, Clone)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading angle (radians, 0 = +x, screen y grows downward)
    pub heading: f32,
    /// Radians added to `heading` every frame
    pub rotation: f32,
    pub thrusting: bool,
    pub lives: u32,
    /// Frames left during which collisions are ignored
    pub invulnerable: u32,
    pub radius: f32,
}

impl Ship {
    /// Fresh ship at the center of the field, briefly invulnerable
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.center(),
            vel: Vec2::ZERO,
            heading: SHIP_START_HEADING,
            rotation: 0.0,
            thrusting: false,
            lives: tuning.starting_lives,
            invulnerable: tuning.invulnerability_frames,
            radius: tuning.ship_radius,
        }
    }

    /// Apply steering intents. Returns the engine event when thrust toggles.
    pub fn set_intent(
        &mut self,
        rotate_left: bool,
        rotate_right: bool,
        thrust: bool,
        turn_rate: f32,
    ) -> Option<GameEvent> {
        self.rotation = match (rotate_left, rotate_right) {
            (true, false) => -turn_rate,
            (false, true) => turn_rate,
            _ => 0.0,
        };

        let changed = self.thrusting != thrust;
        self.thrusting = thrust;
        match (changed, thrust) {
            (true, true) => Some(GameEvent::EngineStarted),
            (true, false) => Some(GameEvent::EngineStopped),
            _ => None,
        }
    }

    /// Advance one frame: rotate, thrust, drag, move, wrap
    pub fn update(&mut self, tuning: &Tuning) {
        self.heading += self.rotation;
        if self.thrusting {
            self.vel += heading_vector(self.heading) * tuning.ship_thrust;
        }
        self.vel *= tuning.ship_drag;
        self.pos = wrap_position(self.pos + self.vel, tuning.bounds());
        self.invulnerable = self.invulnerable.saturating_sub(1);
    }

    /// Put the ship back at the center after losing a life
    pub fn respawn(&mut self, tuning: &Tuning) {
        self.pos = tuning.center();
        self.vel = Vec2::ZERO;
        self.heading = SHIP_START_HEADING;
        self.invulnerable = tuning.invulnerability_frames;
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0
    }

    /// Muzzle position (tip of the hull)
    pub fn nose(&self) -> Vec2 {
        self.pos + heading_vector(self.heading) * self.radius
    }
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Saucer,
}

/// A projectile that wraps around the field until it has traveled its range
#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: u32,
    pub owner: BulletOwner,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Distance covered so far
    pub traveled: f32,
    /// Distance after which the bullet expires
    pub max_travel: f32,
}

impl Bullet {
    pub fn new(
        id: u32,
        owner: BulletOwner,
        pos: Vec2,
        angle: f32,
        speed: f32,
        radius: f32,
        max_travel: f32,
    ) -> Self {
        Self {
            id,
            owner,
            pos,
            vel: heading_vector(angle) * speed,
            radius,
            traveled: 0.0,
            max_travel,
        }
    }

    pub fn update(&mut self, bounds: Vec2) {
        self.pos = wrap_position(self.pos + self.vel, bounds);
        self.traveled += self.vel.length();
    }

    /// Alive until the accumulated distance reaches the max travel
    pub fn is_alive(&self) -> bool {
        self.traveled < self.max_travel
    }
}

/// A drifting rock
#[derive(Debug, Clone)]
pub struct Asteroid {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Seed for the jagged outline (rendering only)
    pub noise_seed: u32,
}

impl Asteroid {
    /// Asteroid with a random heading and speed
    pub fn random<R: Rng + ?Sized>(
        id: u32,
        pos: Vec2,
        radius: f32,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Self {
        let angle = random_range(rng, 0.0, std::f32::consts::TAU);
        let speed = random_range(rng, tuning.asteroid_min_speed, tuning.asteroid_max_speed);
        Self {
            id,
            pos: wrap_position(pos, tuning.bounds()),
            vel: heading_vector(angle) * speed,
            radius,
            noise_seed: rng.random(),
        }
    }

    pub fn update(&mut self, bounds: Vec2) {
        self.pos = wrap_position(self.pos + self.vel, bounds);
    }

    /// Whether destroying this asteroid yields two children
    pub fn splits(&self, threshold: f32) -> bool {
        self.radius > threshold
    }
}

/// An enemy that crosses the field once, shooting at the ship
#[derive(Debug, Clone)]
pub struct Saucer {
    pub id: u32,
    pub pos: Vec2,
    /// Horizontal velocity per nominal frame; the sign tells the travel direction
    pub vel: Vec2,
    pub radius: f32,
    /// Milliseconds until the next shot
    pub fire_countdown_ms: f32,
    pub alive: bool,
}

impl Saucer {
    /// Saucer entering from `side` (-1 = left edge, +1 = right edge) at height `y`
    pub fn new(id: u32, side: f32, y: f32, fire_countdown_ms: f32, tuning: &Tuning) -> Self {
        let radius = tuning.saucer_radius;
        let x = if side < 0.0 {
            -radius
        } else {
            tuning.width + radius
        };
        Self {
            id,
            pos: Vec2::new(x, y),
            vel: Vec2::new(-side * tuning.saucer_speed, 0.0),
            radius,
            fire_countdown_ms,
            alive: true,
        }
    }

    /// Side the saucer entered from (-1 left, +1 right)
    pub fn entry_side(&self) -> f32 {
        if self.vel.x >= 0.0 { -1.0 } else { 1.0 }
    }

    /// Whether the saucer is horizontally inside the field
    pub fn on_field(&self, width: f32) -> bool {
        (0.0..width).contains(&self.pos.x)
    }

    /// Time-scaled move, wrapping `y` only. Returns true when the shot timer
    /// has run out and the saucer is on the field to take the shot.
    pub fn update(&mut self, dt_ms: f32, tuning: &Tuning) -> bool {
        let scale = dt_ms / tuning.nominal_frame_ms;
        self.pos.x += self.vel.x * scale;
        self.pos.y = wrap_coord(self.pos.y + self.vel.y * scale, tuning.height);

        let exited = if self.entry_side() < 0.0 {
            self.pos.x > tuning.width + tuning.saucer_exit_margin
        } else {
            self.pos.x < -tuning.saucer_exit_margin
        };
        if exited {
            self.alive = false;
        }

        self.fire_countdown_ms -= dt_ms;
        self.alive && self.fire_countdown_ms <= 0.0 && self.on_field(tuning.width)
    }

    /// Draw a new random delay until the next shot
    pub fn reload<R: Rng + ?Sized>(&mut self, tuning: &Tuning, rng: &mut R) {
        self.fire_countdown_ms =
            random_range(rng, tuning.saucer_fire_min_ms, tuning.saucer_fire_max_ms);
    }

    /// Firing angle toward `target` with a random error in `[-spread, spread]`
    pub fn aim_at<R: Rng + ?Sized>(&self, target: Vec2, spread: f32, rng: &mut R) -> f32 {
        let to_target = target - self.pos;
        to_target.y.atan2(to_target.x) + random_range(rng, -spread, spread)
    }
}

/// Cosmetic explosion debris
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left to live
    pub life: i32,
    /// Lifetime at spawn (for fading)
    pub max_life: i32,
    pub size: f32,
}

impl Particle {
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.life -= 1;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Remaining life in [0, 1]
    pub fn life_ratio(&self) -> f32 {
        if self.max_life <= 0 {
            0.0
        } else {
            (self.life as f32 / self.max_life as f32).clamp(0.0, 1.0)
        }
    }
}

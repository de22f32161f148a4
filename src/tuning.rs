//! Data-driven game balance
//!
//! Every gameplay constant lives here so the page can override any subset
//! of them with a JSON blob. Missing fields fall back to the defaults.

use glam::Vec2;
use serde::Deserialize;

use crate::error::TuningError;

/// Gameplay tuning. Speeds are in pixels per nominal frame unless noted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    /// Playfield width in pixels (replaced by the canvas size at startup)
    pub width: f32,
    /// Playfield height in pixels
    pub height: f32,

    // === Ship ===
    pub starting_lives: u32,
    pub ship_radius: f32,
    /// Radians per frame while a rotate intent is held
    pub ship_turn_rate: f32,
    /// Velocity added per frame while thrusting
    pub ship_thrust: f32,
    /// Velocity multiplier applied every frame
    pub ship_drag: f32,
    /// Frames of invulnerability after a (re)spawn
    pub invulnerability_frames: u32,

    // === Player bullets ===
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    /// Max travel distance as a multiple of `max(width, height)`
    pub bullet_travel_factor: f32,
    /// Auto-fire repeat while fire is held (ms)
    pub auto_fire_interval_ms: f32,

    // === Asteroids ===
    pub asteroid_count: usize,
    pub asteroid_radius: f32,
    /// Asteroids strictly larger than this split in two on destruction
    pub asteroid_split_threshold: f32,
    pub asteroid_min_speed: f32,
    pub asteroid_max_speed: f32,
    pub asteroid_score: u64,
    /// Refilled asteroids try to keep this far from the ship
    pub safe_spawn_distance: f32,

    // === Saucer ===
    pub saucer_radius: f32,
    /// Horizontal speed per nominal frame (time-scaled)
    pub saucer_speed: f32,
    /// Distance past the far edge before the saucer counts as gone
    pub saucer_exit_margin: f32,
    pub saucer_spawn_min_ms: f64,
    pub saucer_spawn_max_ms: f64,
    pub saucer_fire_min_ms: f32,
    pub saucer_fire_max_ms: f32,
    pub saucer_bullet_speed: f32,
    /// Half-width of the uniform aim error (radians)
    pub saucer_aim_spread: f32,
    pub saucer_score: u64,

    // === Particles ===
    pub particles_per_burst: usize,
    pub particle_min_life: i32,
    pub particle_max_life: i32,
    pub particle_max_speed: f32,

    // === Loop ===
    /// Frame interval the saucer motion is normalized against (ms)
    pub nominal_frame_ms: f32,
    /// Largest elapsed time a single frame may simulate (ms)
    pub max_frame_dt_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,

            starting_lives: 3,
            ship_radius: 12.0,
            ship_turn_rate: 0.08,
            ship_thrust: 0.12,
            ship_drag: 0.99,
            invulnerability_frames: 120,

            bullet_speed: 7.0,
            bullet_radius: 2.0,
            bullet_travel_factor: 1.0,
            auto_fire_interval_ms: 250.0,

            asteroid_count: 5,
            asteroid_radius: 40.0,
            asteroid_split_threshold: 15.0,
            asteroid_min_speed: 0.5,
            asteroid_max_speed: 1.8,
            asteroid_score: 100,
            safe_spawn_distance: 150.0,

            saucer_radius: 18.0,
            saucer_speed: 2.0,
            saucer_exit_margin: 40.0,
            saucer_spawn_min_ms: 10_000.0,
            saucer_spawn_max_ms: 20_000.0,
            saucer_fire_min_ms: 1_000.0,
            saucer_fire_max_ms: 2_500.0,
            saucer_bullet_speed: 5.0,
            saucer_aim_spread: 0.25,
            saucer_score: 1000,

            particles_per_burst: 12,
            particle_min_life: 20,
            particle_max_life: 45,
            particle_max_speed: 3.0,

            nominal_frame_ms: crate::consts::NOMINAL_FRAME_MS,
            max_frame_dt_ms: 100.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Playfield size as a vector
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Center of the playfield (ship spawn point)
    pub fn center(&self) -> Vec2 {
        self.bounds() * 0.5
    }

    /// Max travel distance for any bullet
    pub fn bullet_max_travel(&self) -> f32 {
        self.width.max(self.height) * self.bullet_travel_factor
    }

    /// Reject values that would break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("ship_radius", self.ship_radius),
            ("bullet_speed", self.bullet_speed),
            ("bullet_travel_factor", self.bullet_travel_factor),
            ("auto_fire_interval_ms", self.auto_fire_interval_ms),
            ("asteroid_radius", self.asteroid_radius),
            ("saucer_radius", self.saucer_radius),
            ("saucer_speed", self.saucer_speed),
            ("saucer_bullet_speed", self.saucer_bullet_speed),
            ("nominal_frame_ms", self.nominal_frame_ms),
            ("max_frame_dt_ms", self.max_frame_dt_ms),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::NonPositive { field, value });
            }
        }

        if !(0.0..=1.0).contains(&self.ship_drag) {
            return Err(TuningError::OutOfRange {
                field: "ship_drag",
                value: self.ship_drag,
            });
        }
        if self.asteroid_count == 0 {
            return Err(TuningError::NonPositive {
                field: "asteroid_count",
                value: 0.0,
            });
        }

        let ranges = [
            (
                "asteroid_speed",
                self.asteroid_min_speed as f64,
                self.asteroid_max_speed as f64,
            ),
            (
                "saucer_spawn_ms",
                self.saucer_spawn_min_ms,
                self.saucer_spawn_max_ms,
            ),
            (
                "saucer_fire_ms",
                self.saucer_fire_min_ms as f64,
                self.saucer_fire_max_ms as f64,
            ),
            (
                "particle_life",
                self.particle_min_life as f64,
                self.particle_max_life as f64,
            ),
        ];
        for (field, min, max) in ranges {
            if min > max {
                return Err(TuningError::InvertedRange { field, min, max });
            }
        }

        Ok(())
    }
}

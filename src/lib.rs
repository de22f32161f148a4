//! Vector Rocks - A wrap-around asteroid field arcade game
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, spawning, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Sound triggers and the Web Audio backend
//! - `platform`: Browser glue (input intents, offline cache)
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod headless;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{StartupError, TuningError};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;
use rand::Rng;

/// Fixed constants that are not worth exposing as tuning
pub mod consts {
    /// Nominal display frame interval the per-frame physics is tuned for (60 Hz)
    pub const NOMINAL_FRAME_MS: f32 = 1000.0 / 60.0;

    /// Ship heading at spawn (pointing up in screen coordinates)
    pub const SHIP_START_HEADING: f32 = -std::f32::consts::FRAC_PI_2;

    /// Loop sound fade-in duration (seconds)
    pub const LOOP_FADE_IN_SECS: f64 = 0.1;
    /// Loop sound fade-out duration (seconds)
    pub const LOOP_FADE_OUT_SECS: f64 = 0.25;
}

/// Wrap a single coordinate into `[0, size)`
#[inline]
pub fn wrap_coord(value: f32, size: f32) -> f32 {
    let wrapped = value.rem_euclid(size);
    // rem_euclid rounds up to `size` for tiny negative inputs
    if wrapped >= size { 0.0 } else { wrapped }
}

/// Wrap a position onto the torus described by `bounds` (width, height)
#[inline]
pub fn wrap_position(pos: Vec2, bounds: Vec2) -> Vec2 {
    Vec2::new(wrap_coord(pos.x, bounds.x), wrap_coord(pos.y, bounds.y))
}

/// Euclidean distance between two points (no wrap-around shortcut)
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Uniform sample in `[min, max)`; returns `min` for an empty range
#[inline]
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// Unit vector pointing along `angle` (radians)
#[inline]
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_wrap_coord_edges() {
        assert_eq!(wrap_coord(0.0, 800.0), 0.0);
        assert_eq!(wrap_coord(800.0, 800.0), 0.0);
        assert_eq!(wrap_coord(-1.0, 800.0), 799.0);
        assert_eq!(wrap_coord(801.0, 800.0), 1.0);
        assert_eq!(wrap_coord(-1e-9, 800.0), 0.0);
    }

    #[test]
    fn test_random_range_degenerate() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(random_range(&mut rng, 5.0, 5.0), 5.0);
        assert_eq!(random_range(&mut rng, 5.0, 1.0), 5.0);
        for _ in 0..100 {
            let v = random_range(&mut rng, -0.25, 0.25);
            assert!((-0.25..0.25).contains(&v));
        }
    }

    proptest! {
        #[test]
        fn prop_wrap_position_in_bounds(
            x in -1.0e5f32..1.0e5,
            y in -1.0e5f32..1.0e5,
            w in 1.0f32..4000.0,
            h in 1.0f32..4000.0,
        ) {
            let p = wrap_position(Vec2::new(x, y), Vec2::new(w, h));
            prop_assert!(p.x >= 0.0 && p.x < w);
            prop_assert!(p.y >= 0.0 && p.y < h);
        }
    }
}

//! Frame builder: turns a world snapshot into triangle-list vertices
//!
//! Only reads the state. Objects straddling a border are drawn on both
//! edges so wrap-around looks continuous.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::shapes::{circle, closed_outline, line, ring, square, wrap_offsets};
use super::vertex::{Vertex, colors};
use crate::settings::Settings;
use crate::sim::{Asteroid, GamePhase, GameState, Saucer, Ship};

/// Stroke width for vector outlines (field pixels)
const STROKE: f32 = 1.5;
/// Invulnerable ship blinks on/off every this many frames
const BLINK_FRAMES: u32 = 6;
/// Outline vertices per asteroid
const ASTEROID_POINTS: usize = 11;

/// Build all vertices for one frame
pub fn scene_vertices(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let bounds = state.tuning.bounds();
    let segments = settings.quality.circle_segments();
    let mut out = Vec::with_capacity(4096);

    for asteroid in &state.asteroids {
        let outline = asteroid_outline(asteroid);
        for offset in wrap_offsets(asteroid.pos, asteroid.radius * 1.1, bounds) {
            let points: Vec<Vec2> = outline.iter().map(|p| *p + offset).collect();
            closed_outline(&mut out, &points, STROKE, colors::ASTEROID);
        }
    }

    for saucer in &state.saucers {
        saucer_shape(&mut out, saucer);
    }

    for bullet in &state.bullets {
        out.extend(circle(bullet.pos, bullet.radius, colors::BULLET, segments));
    }
    for bullet in &state.saucer_bullets {
        out.extend(circle(bullet.pos, bullet.radius, colors::SAUCER_BULLET, segments));
    }

    if state.phase == GamePhase::Playing && ship_visible(&state.ship) {
        for offset in wrap_offsets(state.ship.pos, state.ship.radius, bounds) {
            ship_shape(&mut out, &state.ship, offset, state.frame, segments);
        }
    }

    for particle in &state.particles {
        let color = colors::faded(colors::PARTICLE, particle.life_ratio());
        square(&mut out, particle.pos, particle.size, color);
    }

    out
}

fn ship_visible(ship: &Ship) -> bool {
    !ship.is_invulnerable() || (ship.invulnerable / BLINK_FRAMES) % 2 == 0
}

/// Hull corners: nose, left wing, right wing, tail notch
fn ship_hull(ship: &Ship, offset: Vec2) -> [Vec2; 4] {
    let fwd = Vec2::from_angle(ship.heading);
    let side = fwd.perp();
    let center = ship.pos + offset;
    let r = ship.radius;

    [
        center + fwd * r,
        center - fwd * (r * 0.8) + side * (r * 0.7),
        center - fwd * (r * 0.45),
        center - fwd * (r * 0.8) - side * (r * 0.7),
    ]
}

fn ship_shape(out: &mut Vec<Vertex>, ship: &Ship, offset: Vec2, frame: u64, segments: u32) {
    let hull = ship_hull(ship, offset);
    closed_outline(out, &hull, STROKE, colors::SHIP);

    if ship.thrusting && frame % 4 < 2 {
        let fwd = Vec2::from_angle(ship.heading);
        let side = fwd.perp();
        let base = hull[2];
        let tip = base - fwd * (ship.radius * 0.9);
        let spread = side * (ship.radius * 0.3);
        line(out, base + spread, tip, STROKE, colors::FLAME);
        line(out, base - spread, tip, STROKE, colors::FLAME);
    }

    if ship.is_invulnerable() {
        let r = ship.radius * 1.4;
        out.extend(ring(ship.pos + offset, r - 1.0, r, colors::SHIELD, segments * 2));
    }
}

/// Jagged outline, stable per asteroid through its noise seed
fn asteroid_outline(asteroid: &Asteroid) -> Vec<Vec2> {
    let mut rng = Pcg32::seed_from_u64(asteroid.noise_seed as u64);
    (0..ASTEROID_POINTS)
        .map(|i| {
            let angle = i as f32 / ASTEROID_POINTS as f32 * std::f32::consts::TAU;
            let scale: f32 = rng.random_range(0.75..1.1);
            asteroid.pos + Vec2::from_angle(angle) * asteroid.radius * scale
        })
        .collect()
}

fn saucer_shape(out: &mut Vec<Vertex>, saucer: &Saucer) {
    let c = saucer.pos;
    let r = saucer.radius;

    let hull = [
        c + Vec2::new(-r, 0.0),
        c + Vec2::new(-r * 0.45, -r * 0.35),
        c + Vec2::new(r * 0.45, -r * 0.35),
        c + Vec2::new(r, 0.0),
        c + Vec2::new(r * 0.45, r * 0.35),
        c + Vec2::new(-r * 0.45, r * 0.35),
    ];
    closed_outline(out, &hull, STROKE, colors::SAUCER);
    line(out, hull[0], hull[3], STROKE, colors::SAUCER);

    let dome = [
        c + Vec2::new(-r * 0.3, -r * 0.35),
        c + Vec2::new(-r * 0.18, -r * 0.7),
        c + Vec2::new(r * 0.18, -r * 0.7),
        c + Vec2::new(r * 0.3, -r * 0.35),
    ];
    for pair in dome.windows(2) {
        line(out, pair[0], pair[1], STROKE, colors::SAUCER);
    }
}

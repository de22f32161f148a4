//! Headless runs for native builds
//!
//! A simple autopilot plays the game without a window so the simulation can
//! be exercised (and profiled) outside the browser.

use std::f32::consts::{PI, TAU};

use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;
use crate::{consts::NOMINAL_FRAME_MS, distance};

/// Summary of a headless run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessReport {
    pub frames: u64,
    pub games_played: u32,
    pub best_score: u64,
    pub asteroids_destroyed: u32,
    pub saucers_destroyed: u32,
    pub ships_lost: u32,
    pub shots_fired: u32,
}

/// Steer toward the nearest asteroid and keep shooting
pub fn autopilot(state: &GameState) -> TickInput {
    if state.phase != GamePhase::Playing {
        return TickInput {
            start: true,
            ..Default::default()
        };
    }

    let ship = &state.ship;
    let nearest = state.asteroids.iter().min_by(|a, b| {
        distance(a.pos, ship.pos).total_cmp(&distance(b.pos, ship.pos))
    });
    let Some(target) = nearest else {
        return TickInput::default();
    };

    let to_target = target.pos - ship.pos;
    let wanted = to_target.y.atan2(to_target.x);
    let diff = (wanted - ship.heading + PI).rem_euclid(TAU) - PI;
    let turn = state.tuning.ship_turn_rate;

    TickInput {
        rotate_left: diff < -turn * 0.5,
        rotate_right: diff > turn * 0.5,
        thrust: to_target.length() > 250.0 && diff.abs() < 0.3,
        fire: diff.abs() < 0.5,
        start: false,
    }
}

/// Run `frames` nominal frames under the autopilot
pub fn run_headless(tuning: Tuning, seed: u64, frames: u64) -> HeadlessReport {
    let mut state = GameState::new(tuning, seed);
    let mut report = HeadlessReport::default();

    for _ in 0..frames {
        let input = autopilot(&state);
        tick(&mut state, &input, NOMINAL_FRAME_MS);
        report.frames += 1;

        for event in state.events() {
            match event {
                GameEvent::GameStarted => report.games_played += 1,
                GameEvent::AsteroidDestroyed { .. } => report.asteroids_destroyed += 1,
                GameEvent::SaucerDestroyed { .. } => report.saucers_destroyed += 1,
                GameEvent::ShipDestroyed { .. } => report.ships_lost += 1,
                GameEvent::PlayerFired => report.shots_fired += 1,
                _ => {}
            }
        }
        report.best_score = report.best_score.max(state.score);
    }

    log::info!(
        "Headless run: {} frames, {} games, best score {}",
        report.frames,
        report.games_played,
        report.best_score
    );
    report
}

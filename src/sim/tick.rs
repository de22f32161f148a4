//! Per-frame simulation step
//!
//! One call per display frame. The elapsed time since the previous frame is
//! the step; per-frame physics ignores it, the saucer and timers use it.

use super::collision::resolve_collisions;
use super::events::GameEvent;
use super::spawn;
use super::state::{GamePhase, GameState};

/// Input intents for a single frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust: bool,
    /// Fire is held (auto-repeats while true)
    pub fire: bool,
    /// Start/restart trigger (one-shot)
    pub start: bool,
}

/// Advance the world by one display frame of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    state.events.clear();
    state.frame += 1;
    let dt_ms = dt_ms.clamp(0.0, state.tuning.max_frame_dt_ms);

    match state.phase {
        GamePhase::Splash | GamePhase::GameOver => {
            // Only the debris overlay keeps moving
            advance_particles(state);
            if input.start {
                state.start();
            }
            return;
        }
        GamePhase::Playing => {}
    }

    state.clock_ms += dt_ms as f64;

    let turn_rate = state.tuning.ship_turn_rate;
    if let Some(event) =
        state
            .ship
            .set_intent(input.rotate_left, input.rotate_right, input.thrust, turn_rate)
    {
        state.push_event(event);
    }

    if state.auto_fire.poll(input.fire, dt_ms) {
        spawn::fire_player_bullet(state);
    }

    advance_entities(state, dt_ms);
    resolve_collisions(state);

    if state.phase != GamePhase::Playing {
        return;
    }

    prune(state);
    spawn::update_spawns(state);
}

fn advance_entities(state: &mut GameState, dt_ms: f32) {
    let bounds = state.tuning.bounds();

    state.ship.update(&state.tuning);
    for bullet in state.bullets.iter_mut() {
        bullet.update(bounds);
    }
    for bullet in state.saucer_bullets.iter_mut() {
        bullet.update(bounds);
    }
    for asteroid in state.asteroids.iter_mut() {
        asteroid.update(bounds);
    }

    // Collect shooters first; firing needs the whole state
    let mut shooters = Vec::new();
    for (idx, saucer) in state.saucers.iter_mut().enumerate() {
        if saucer.update(dt_ms, &state.tuning) {
            shooters.push(idx);
        }
    }
    for idx in shooters {
        spawn::fire_saucer_bullet(state, idx);
    }

    for particle in state.particles.iter_mut() {
        particle.update();
    }
}

fn advance_particles(state: &mut GameState) {
    for particle in state.particles.iter_mut() {
        particle.update();
    }
    state.particles.retain(|p| p.is_alive());
}

/// Drop exited saucers, spent bullets and dead debris
fn prune(state: &mut GameState) {
    let before = state.saucers.len();
    state.saucers.retain(|s| s.alive);
    for _ in state.saucers.len()..before {
        state.push_event(GameEvent::SaucerExited);
    }

    state.bullets.retain(|b| b.is_alive());
    state.saucer_bullets.retain(|b| b.is_alive());
    state.particles.retain(|p| p.is_alive());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::NOMINAL_FRAME_MS;
    use crate::sim::entities::{Asteroid, Bullet, BulletOwner, Saucer};
    use crate::tuning::Tuning;
    use glam::Vec2;

    const DT: f32 = NOMINAL_FRAME_MS;

    fn start_input() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(Tuning::default(), seed);
        tick(&mut state, &start_input(), DT);
        assert_eq!(state.phase, GamePhase::Playing);
        state
    }

    /// Replace the field with five stationary radius-40 rocks away from the ship
    fn five_big_rocks(state: &mut GameState) {
        state.asteroids.clear();
        for i in 0..5 {
            let id = state.next_entity_id();
            state.asteroids.push(Asteroid {
                id,
                pos: Vec2::new(80.0 + i as f32 * 150.0, 80.0),
                vel: Vec2::ZERO,
                radius: 40.0,
                noise_seed: i,
            });
        }
    }

    #[test]
    fn test_splash_is_inert_until_start() {
        let mut state = GameState::new(Tuning::default(), 5);
        let before: Vec<Vec2> = state.asteroids.iter().map(|a| a.pos).collect();
        let input = TickInput {
            thrust: true,
            fire: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &input, DT);
        }
        let after: Vec<Vec2> = state.asteroids.iter().map(|a| a.pos).collect();
        assert_eq!(before, after);
        assert_eq!(state.phase, GamePhase::Splash);
        assert!(state.bullets.is_empty());

        tick(&mut state, &start_input(), DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.events(), &[GameEvent::GameStarted]);
    }

    #[test]
    fn test_bullet_on_asteroid_center_splits_it() {
        let mut state = playing_state(10);
        five_big_rocks(&mut state);
        let target = state.asteroids[2].pos;
        let id = state.next_entity_id();
        state.bullets.push(Bullet::new(
            id,
            BulletOwner::Player,
            target,
            0.0,
            0.0,
            state.tuning.bullet_radius,
            state.tuning.bullet_max_travel(),
        ));

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.asteroids.len(), 6);
        assert_eq!(state.score, 100);
        assert_eq!(state.particles.len(), state.tuning.particles_per_burst);
        assert!(state.bullets.is_empty());
        let halves = state.asteroids.iter().filter(|a| a.radius == 20.0).count();
        assert_eq!(halves, 2);
    }

    #[test]
    fn test_last_life_collision_ends_game() {
        let mut state = playing_state(11);
        five_big_rocks(&mut state);
        state.ship.lives = 1;
        state.ship.invulnerable = 0;
        state.ship.pos = state.asteroids[0].pos;

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.ship.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut state = playing_state(12);
        state.score = 4200;
        state.ship.lives = 1;
        state.ship.invulnerable = 0;
        state.ship.pos = state.asteroids[0].pos;
        state.asteroids[0].vel = Vec2::ZERO;
        state.ship.vel = Vec2::ZERO;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        // Frozen while game over
        let ship_pos = state.ship.pos;
        tick(&mut state, &TickInput { thrust: true, ..Default::default() }, DT);
        assert_eq!(state.ship.pos, ship_pos);

        tick(&mut state, &start_input(), DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.ship.lives, 3);
        assert_eq!(state.asteroids.len(), state.tuning.asteroid_count);
        assert!(state.bullets.is_empty());
        assert!(state.saucer_bullets.is_empty());
        assert!(state.saucers.is_empty());
    }

    #[test]
    fn test_no_life_lost_while_invulnerable() {
        let mut state = playing_state(13);
        five_big_rocks(&mut state);
        state.ship.invulnerable = 30;
        for _ in 0..20 {
            state.ship.pos = state.asteroids[0].pos;
            state.ship.vel = Vec2::ZERO;
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.ship.lives, 3);
    }

    #[test]
    fn test_held_fire_auto_repeats() {
        let mut state = playing_state(14);
        five_big_rocks(&mut state);
        for a in state.asteroids.iter_mut() {
            a.pos.y = 550.0;
        }
        state.ship.heading = 0.0;
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };

        tick(&mut state, &fire, DT);
        assert_eq!(state.bullets.len(), 1);
        assert!(state.events().contains(&GameEvent::PlayerFired));

        // 250 ms repeat at ~16.7 ms per frame: one more shot within 16 frames
        let mut shots = 1;
        for _ in 0..16 {
            tick(&mut state, &fire, DT);
            if state.events().contains(&GameEvent::PlayerFired) {
                shots += 1;
            }
        }
        assert_eq!(shots, 2);

        // Release and press again: immediate shot
        tick(&mut state, &TickInput::default(), DT);
        tick(&mut state, &fire, DT);
        assert!(state.events().contains(&GameEvent::PlayerFired));
    }

    #[test]
    fn test_engine_events_follow_thrust() {
        let mut state = playing_state(15);
        let thrust = TickInput {
            thrust: true,
            ..Default::default()
        };
        tick(&mut state, &thrust, DT);
        assert!(state.events().contains(&GameEvent::EngineStarted));
        tick(&mut state, &thrust, DT);
        assert!(!state.events().contains(&GameEvent::EngineStarted));
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.events().contains(&GameEvent::EngineStopped));
    }

    #[test]
    fn test_saucer_exit_is_pruned() {
        let mut state = playing_state(16);
        let mut saucer = Saucer::new(999, -1.0, 50.0, 1.0e9, &state.tuning);
        saucer.pos.x = state.tuning.width + state.tuning.saucer_exit_margin - 0.5;
        state.saucers.push(saucer);

        tick(&mut state, &TickInput::default(), DT);

        assert!(state.saucers.is_empty());
        assert!(state.events().contains(&GameEvent::SaucerExited));
    }

    #[test]
    fn test_saucer_fires_when_countdown_runs_out() {
        let mut state = playing_state(17);
        state.saucer_bullets.clear();
        let mut saucer = Saucer::new(998, -1.0, 50.0, 1.0, &state.tuning);
        saucer.pos.x = 100.0;
        state.saucers.push(saucer);

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.saucer_bullets.len(), 1);
        assert!(state.events().contains(&GameEvent::SaucerFired));
        assert!(state.saucers[0].fire_countdown_ms >= state.tuning.saucer_fire_min_ms);
    }

    #[test]
    fn test_score_only_moves_on_kills() {
        let mut state = playing_state(17);
        let input = TickInput {
            rotate_left: true,
            thrust: true,
            fire: true,
            ..Default::default()
        };
        let mut last = state.score;
        for _ in 0..2000 {
            tick(&mut state, &input, DT);
            let kills: u64 = state
                .events()
                .iter()
                .map(|e| match e {
                    GameEvent::AsteroidDestroyed { .. } => state.tuning.asteroid_score,
                    GameEvent::SaucerDestroyed { .. } => state.tuning.saucer_score,
                    _ => 0,
                })
                .sum();
            if state.events().contains(&GameEvent::GameStarted) {
                last = 0;
            }
            assert_eq!(state.score, last + kills);
            last = state.score;
            if state.phase == GamePhase::GameOver {
                break;
            }
        }
    }

    #[test]
    fn test_field_never_empty_while_playing() {
        let mut state = playing_state(18);
        let input = TickInput {
            rotate_right: true,
            fire: true,
            ..Default::default()
        };
        for _ in 0..3000 {
            tick(&mut state, &input, DT);
            if state.phase != GamePhase::Playing {
                break;
            }
            assert!(!state.asteroids.is_empty());
            let bounds = state.tuning.bounds();
            for a in &state.asteroids {
                assert!(a.pos.x >= 0.0 && a.pos.x < bounds.x);
                assert!(a.pos.y >= 0.0 && a.pos.y < bounds.y);
            }
            assert!(state.bullets.iter().all(|b| b.is_alive()));
        }
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput {
                thrust: true,
                fire: true,
                ..Default::default()
            },
            TickInput {
                rotate_left: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        let mut a = playing_state(99999);
        let mut b = playing_state(99999);
        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            tick(&mut a, input, DT);
            tick(&mut b, input, DT);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.asteroids.len(), b.asteroids.len());
        assert_eq!(a.ship.pos, b.ship.pos);
        assert_eq!(a.phase, b.phase);
    }
}

//! Collision detection and resolution
//!
//! Everything is a circle. Resolution runs in a fixed order on the
//! post-update entity sets:
//! 1. player bullets vs asteroids (first hit per bullet wins)
//! 2. remaining player bullets vs saucers
//! 3. saucer bullets vs ship
//! 4. ship vs asteroids
//!
//! Phases 3 and 4 are skipped while the ship is invulnerable, and a hit
//! resets the window, so at most one life is lost per tick.

use glam::Vec2;

use super::entities::Asteroid;
use super::events::GameEvent;
use super::spawn::{spawn_explosion, split_asteroid};
use super::state::GameState;
use crate::distance;

/// Circle-circle overlap test (touching is not a hit)
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    distance(a, b) < a_radius + b_radius
}

/// Run all collision phases for one tick
pub fn resolve_collisions(state: &mut GameState) {
    bullets_vs_asteroids(state);
    bullets_vs_saucers(state);
    saucer_bullets_vs_ship(state);
    ship_vs_asteroids(state);
}

fn bullets_vs_asteroids(state: &mut GameState) {
    // Children join the field after the phase so they can't be hit this tick
    let mut children: Vec<Asteroid> = Vec::new();

    let mut i = 0;
    while i < state.bullets.len() {
        let bullet = &state.bullets[i];
        let hit = state
            .asteroids
            .iter()
            .position(|a| circles_overlap(bullet.pos, bullet.radius, a.pos, a.radius));

        let Some(asteroid_idx) = hit else {
            i += 1;
            continue;
        };

        state.bullets.remove(i);
        let asteroid = state.asteroids.remove(asteroid_idx);
        state.score += state.tuning.asteroid_score;

        let pieces = split_asteroid(state, &asteroid);
        spawn_explosion(state, asteroid.pos);
        state.push_event(GameEvent::AsteroidDestroyed {
            pos: asteroid.pos,
            radius: asteroid.radius,
            split: !pieces.is_empty(),
        });
        children.extend(pieces);
    }

    state.asteroids.extend(children);
}

fn bullets_vs_saucers(state: &mut GameState) {
    if state.saucers.is_empty() {
        return;
    }

    let mut i = 0;
    while i < state.bullets.len() {
        let bullet = &state.bullets[i];
        let hit = state
            .saucers
            .iter()
            .position(|s| s.alive && circles_overlap(bullet.pos, bullet.radius, s.pos, s.radius));

        let Some(saucer_idx) = hit else {
            i += 1;
            continue;
        };

        state.bullets.remove(i);
        let saucer = state.saucers.remove(saucer_idx);
        state.score += state.tuning.saucer_score;
        spawn_explosion(state, saucer.pos);
        state.push_event(GameEvent::SaucerDestroyed { pos: saucer.pos });
        log::debug!("Saucer {} destroyed, score {}", saucer.id, state.score);
    }
}

fn saucer_bullets_vs_ship(state: &mut GameState) {
    if state.ship.is_invulnerable() {
        return;
    }

    let ship = &state.ship;
    let hit = state
        .saucer_bullets
        .iter()
        .position(|b| circles_overlap(b.pos, b.radius, ship.pos, ship.radius));

    if let Some(idx) = hit {
        state.saucer_bullets.remove(idx);
        destroy_ship(state);
    }
}

fn ship_vs_asteroids(state: &mut GameState) {
    if state.ship.is_invulnerable() {
        return;
    }

    let ship = &state.ship;
    let hit = state
        .asteroids
        .iter()
        .any(|a| circles_overlap(ship.pos, ship.radius, a.pos, a.radius));

    if hit {
        destroy_ship(state);
    }
}

/// Lose a life, respawn at the center, and end the run at zero lives
fn destroy_ship(state: &mut GameState) {
    let pos = state.ship.pos;
    state.ship.lives = state.ship.lives.saturating_sub(1);
    spawn_explosion(state, pos);
    state.ship.respawn(&state.tuning);

    let lives_left = state.ship.lives;
    state.push_event(GameEvent::ShipDestroyed { pos, lives_left });
    log::debug!("Ship destroyed, {} lives left", lives_left);

    if lives_left == 0 {
        state.enter_game_over();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Bullet, BulletOwner, Saucer};
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;

    fn playing_state() -> GameState {
        let mut state = GameState::new(Tuning::default(), 77);
        state.start();
        state.events.clear();
        state
    }

    fn rock(id: u32, pos: Vec2, radius: f32) -> Asteroid {
        Asteroid {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            noise_seed: id,
        }
    }

    fn bullet(state: &mut GameState, owner: BulletOwner, pos: Vec2) -> Bullet {
        let id = state.next_entity_id();
        Bullet::new(id, owner, pos, 0.0, 0.0, 2.0, 1000.0)
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_bullet_hits_first_asteroid_only() {
        let mut state = playing_state();
        state.asteroids = vec![
            rock(900, Vec2::new(100.0, 100.0), 10.0),
            rock(901, Vec2::new(101.0, 100.0), 10.0),
        ];
        let b = bullet(&mut state, BulletOwner::Player, Vec2::new(100.0, 100.0));
        state.bullets.push(b);

        resolve_collisions(&mut state);

        assert!(state.bullets.is_empty());
        assert_eq!(state.asteroids.len(), 1);
        assert_eq!(state.asteroids[0].id, 901);
        assert_eq!(state.score, state.tuning.asteroid_score);
    }

    #[test]
    fn test_asteroid_wins_tie_break_over_saucer() {
        let mut state = playing_state();
        let pos = Vec2::new(300.0, 200.0);
        state.asteroids = vec![rock(900, pos, 10.0)];
        let mut saucer = Saucer::new(950, -1.0, pos.y, 1.0e9, &state.tuning);
        saucer.pos = pos;
        state.saucers.push(saucer);
        let b = bullet(&mut state, BulletOwner::Player, pos);
        state.bullets.push(b);

        resolve_collisions(&mut state);

        assert!(state.asteroids.is_empty());
        assert_eq!(state.saucers.len(), 1);
        assert_eq!(state.score, state.tuning.asteroid_score);
    }

    #[test]
    fn test_bullet_destroys_saucer() {
        let mut state = playing_state();
        state.asteroids = vec![rock(900, Vec2::new(700.0, 500.0), 10.0)];
        let mut saucer = Saucer::new(950, 1.0, 100.0, 1.0e9, &state.tuning);
        saucer.pos = Vec2::new(200.0, 100.0);
        state.saucers.push(saucer);
        let b = bullet(&mut state, BulletOwner::Player, Vec2::new(205.0, 100.0));
        state.bullets.push(b);

        resolve_collisions(&mut state);

        assert!(state.saucers.is_empty());
        assert_eq!(state.score, state.tuning.saucer_score);
        assert!(state
            .events()
            .iter()
            .any(|e| matches!(e, GameEvent::SaucerDestroyed { .. })));
    }

    #[test]
    fn test_saucer_bullet_ignored_while_invulnerable() {
        let mut state = playing_state();
        state.asteroids.clear();
        state.ship.invulnerable = 10;
        let ship_pos = state.ship.pos;
        let b = bullet(&mut state, BulletOwner::Saucer, ship_pos);
        state.saucer_bullets.push(b);

        resolve_collisions(&mut state);

        assert_eq!(state.ship.lives, state.tuning.starting_lives);
        assert_eq!(state.saucer_bullets.len(), 1);
    }

    #[test]
    fn test_one_life_per_tick() {
        let mut state = playing_state();
        state.ship.invulnerable = 0;
        let ship_pos = state.ship.pos;
        state.asteroids = vec![rock(900, ship_pos, 30.0)];
        let b = bullet(&mut state, BulletOwner::Saucer, ship_pos);
        state.saucer_bullets.push(b);

        resolve_collisions(&mut state);

        assert_eq!(state.ship.lives, state.tuning.starting_lives - 1);
        assert!(state.saucer_bullets.is_empty());
        assert_eq!(state.ship.invulnerable, state.tuning.invulnerability_frames);
        assert_eq!(state.ship.pos, state.tuning.center());
        assert_eq!(state.ship.vel, Vec2::ZERO);
        // Ship collisions never score
        assert_eq!(state.score, 0);
        assert_eq!(state.asteroids.len(), 1);
    }

    #[test]
    fn test_last_life_ends_run() {
        let mut state = playing_state();
        state.ship.lives = 1;
        state.ship.invulnerable = 0;
        state.ship.pos = Vec2::new(100.0, 100.0);
        state.asteroids = vec![rock(900, Vec2::new(110.0, 100.0), 20.0)];

        resolve_collisions(&mut state);

        assert_eq!(state.ship.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events().contains(&GameEvent::GameOver));
    }
}

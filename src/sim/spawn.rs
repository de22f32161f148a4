//! Spawning rules: asteroid fields, splits, saucers, bullets, debris

use glam::Vec2;
use rand::Rng;

use super::entities::{Asteroid, Bullet, BulletOwner, Particle, Saucer};
use super::events::GameEvent;
use super::state::GameState;
use crate::{distance, heading_vector, random_range, wrap_position};

/// Attempts to find an asteroid spawn point away from the ship
const SAFE_SPAWN_ATTEMPTS: usize = 16;

/// Fill the field with the starting number of asteroids
pub fn spawn_asteroid_field(state: &mut GameState) {
    let radius = state.tuning.asteroid_radius;
    for _ in 0..state.tuning.asteroid_count {
        let pos = random_field_position(state);
        let id = state.next_entity_id();
        let asteroid = Asteroid::random(id, pos, radius, &state.tuning, &mut state.rng);
        state.asteroids.push(asteroid);
    }
    log::debug!("Spawned asteroid field ({} rocks)", state.asteroids.len());
}

/// Random point on the field, preferring points outside the ship's safe radius
fn random_field_position(state: &mut GameState) -> Vec2 {
    let (w, h) = (state.tuning.width, state.tuning.height);
    let mut pos = Vec2::ZERO;
    for _ in 0..SAFE_SPAWN_ATTEMPTS {
        pos = Vec2::new(
            random_range(&mut state.rng, 0.0, w),
            random_range(&mut state.rng, 0.0, h),
        );
        if distance(pos, state.ship.pos) >= state.tuning.safe_spawn_distance {
            break;
        }
    }
    pos
}

/// Children produced by destroying `parent`: two half-size rocks at
/// slightly offset positions, or none at the terminal size
pub fn split_asteroid(state: &mut GameState, parent: &Asteroid) -> Vec<Asteroid> {
    if !parent.splits(state.tuning.asteroid_split_threshold) {
        return Vec::new();
    }

    let radius = parent.radius / 2.0;
    let angle = random_range(&mut state.rng, 0.0, std::f32::consts::TAU);
    let offset = heading_vector(angle) * (radius / 2.0);

    let mut children = Vec::with_capacity(2);
    for pos in [parent.pos + offset, parent.pos - offset] {
        let id = state.next_entity_id();
        let pos = wrap_position(pos, state.tuning.bounds());
        children.push(Asteroid::random(
            id,
            pos,
            radius,
            &state.tuning,
            &mut state.rng,
        ));
    }
    children
}

/// Burst of debris at `pos`, trimmed to the particle cap
pub fn spawn_explosion(state: &mut GameState, pos: Vec2) {
    let room = state.max_particles.saturating_sub(state.particles.len());
    let count = state.tuning.particles_per_burst.min(room);
    let (min_life, max_life) = (state.tuning.particle_min_life, state.tuning.particle_max_life);

    for _ in 0..count {
        let angle = random_range(&mut state.rng, 0.0, std::f32::consts::TAU);
        let speed = random_range(&mut state.rng, 0.3, state.tuning.particle_max_speed);
        let life = state.rng.random_range(min_life..=max_life);
        let size = random_range(&mut state.rng, 1.0, 3.0);
        state.particles.push(Particle {
            pos,
            vel: heading_vector(angle) * speed,
            life,
            max_life: life,
            size,
        });
    }
}

/// Draw the next saucer deadline within the configured bounds
pub fn schedule_saucer(state: &mut GameState) {
    let (min, max) = (
        state.tuning.saucer_spawn_min_ms,
        state.tuning.saucer_spawn_max_ms,
    );
    let delay = if max > min {
        state.rng.random_range(min..max)
    } else {
        min
    };
    state.next_saucer_ms = state.clock_ms + delay;
}

/// Launch a saucer from a random side at a random height
pub fn spawn_saucer(state: &mut GameState) {
    let side = if state.rng.random_bool(0.5) { -1.0 } else { 1.0 };
    let radius = state.tuning.saucer_radius;
    let y = random_range(&mut state.rng, radius, state.tuning.height - radius);
    let countdown = random_range(
        &mut state.rng,
        state.tuning.saucer_fire_min_ms,
        state.tuning.saucer_fire_max_ms,
    );
    let id = state.next_entity_id();
    state
        .saucers
        .push(Saucer::new(id, side, y, countdown, &state.tuning));
    state.push_event(GameEvent::SaucerSpawned);
    log::debug!("Saucer {} entering from {}", id, if side < 0.0 { "left" } else { "right" });
}

/// Refill an emptied field and launch saucers when their deadline passes
pub fn update_spawns(state: &mut GameState) {
    if state.asteroids.is_empty() {
        spawn_asteroid_field(state);
        state.push_event(GameEvent::FieldRefilled);
        log::info!("Field cleared at score {}, refilling", state.score);
    }

    if state.clock_ms >= state.next_saucer_ms {
        // One saucer at a time; a deadline that passes mid-crossing is skipped
        if state.saucers.is_empty() {
            spawn_saucer(state);
        }
        schedule_saucer(state);
    }
}

/// Fire a player bullet from the ship's nose along its heading
pub fn fire_player_bullet(state: &mut GameState) {
    let id = state.next_entity_id();
    let t = &state.tuning;
    let bullet = Bullet::new(
        id,
        BulletOwner::Player,
        wrap_position(state.ship.nose(), t.bounds()),
        state.ship.heading,
        t.bullet_speed,
        t.bullet_radius,
        t.bullet_max_travel(),
    );
    state.bullets.push(bullet);
    state.push_event(GameEvent::PlayerFired);
}

/// Fire from saucer `index` toward the ship and reload its shot timer
pub fn fire_saucer_bullet(state: &mut GameState, index: usize) {
    let target = state.ship.pos;
    let spread = state.tuning.saucer_aim_spread;
    let Some(saucer) = state.saucers.get(index) else {
        return;
    };
    let angle = saucer.aim_at(target, spread, &mut state.rng);
    let pos = wrap_position(saucer.pos, state.tuning.bounds());

    let id = state.next_entity_id();
    let t = &state.tuning;
    let bullet = Bullet::new(
        id,
        BulletOwner::Saucer,
        pos,
        angle,
        t.saucer_bullet_speed,
        t.bullet_radius,
        t.bullet_max_travel(),
    );
    state.saucer_bullets.push(bullet);

    if let Some(saucer) = state.saucers.get_mut(index) {
        saucer.reload(&state.tuning, &mut state.rng);
    }
    state.push_event(GameEvent::SaucerFired);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn playing_state() -> GameState {
        let mut state = GameState::new(Tuning::default(), 1234);
        state.start();
        state.events.clear();
        state
    }

    #[test]
    fn test_large_asteroid_splits_in_two() {
        let mut state = playing_state();
        let mut parent = state.asteroids[0].clone();
        parent.pos = Vec2::new(200.0, 200.0);
        let children = split_asteroid(&mut state, &parent);
        assert_eq!(children.len(), 2);
        for child in &children {
            assert_eq!(child.radius, parent.radius / 2.0);
            assert!(distance(child.pos, parent.pos) < parent.radius);
        }
        assert_ne!(children[0].id, children[1].id);
    }

    #[test]
    fn test_terminal_asteroid_has_no_children() {
        let mut state = playing_state();
        let mut parent = state.asteroids[0].clone();
        parent.radius = state.tuning.asteroid_split_threshold;
        assert!(split_asteroid(&mut state, &parent).is_empty());
    }

    #[test]
    fn test_explosion_respects_particle_cap() {
        let mut state = playing_state();
        spawn_explosion(&mut state, Vec2::new(10.0, 10.0));
        assert_eq!(state.particles.len(), state.tuning.particles_per_burst);

        state.max_particles = state.particles.len() + 3;
        spawn_explosion(&mut state, Vec2::new(10.0, 10.0));
        assert_eq!(state.particles.len(), state.max_particles);
        assert!(state.particles.iter().all(|p| p.life > 0));
    }

    #[test]
    fn test_refill_when_field_empty() {
        let mut state = playing_state();
        state.asteroids.clear();
        update_spawns(&mut state);
        assert_eq!(state.asteroids.len(), state.tuning.asteroid_count);
        assert!(state.events().contains(&GameEvent::FieldRefilled));
    }

    #[test]
    fn test_refill_keeps_clear_of_ship() {
        let mut state = playing_state();
        state.asteroids.clear();
        spawn_asteroid_field(&mut state);
        // 800x600 has plenty of room outside a 150 px radius
        for a in &state.asteroids {
            assert!(distance(a.pos, state.ship.pos) >= state.tuning.safe_spawn_distance);
        }
    }

    #[test]
    fn test_saucer_spawns_after_deadline() {
        let mut state = playing_state();
        state.clock_ms = state.next_saucer_ms - 1.0;
        update_spawns(&mut state);
        assert!(state.saucers.is_empty());

        state.clock_ms = state.next_saucer_ms;
        update_spawns(&mut state);
        assert_eq!(state.saucers.len(), 1);
        assert!(state.next_saucer_ms > state.clock_ms);
        assert!(state.events().contains(&GameEvent::SaucerSpawned));

        // Next deadline passes while the first is still crossing
        state.clock_ms = state.next_saucer_ms;
        update_spawns(&mut state);
        assert_eq!(state.saucers.len(), 1);
    }

    #[test]
    fn test_saucer_bullet_aims_at_ship() {
        let mut state = playing_state();
        state.ship.pos = Vec2::new(400.0, 300.0);
        spawn_saucer(&mut state);
        state.saucers[0].pos = Vec2::new(100.0, 300.0);
        fire_saucer_bullet(&mut state, 0);

        assert_eq!(state.saucer_bullets.len(), 1);
        let bullet = &state.saucer_bullets[0];
        assert_eq!(bullet.owner, BulletOwner::Saucer);
        let angle = bullet.vel.y.atan2(bullet.vel.x);
        assert!(angle.abs() <= state.tuning.saucer_aim_spread + 1e-5);
        assert!(state.saucers[0].fire_countdown_ms >= state.tuning.saucer_fire_min_ms);
    }

    #[test]
    fn test_player_bullet_leaves_nose() {
        let mut state = playing_state();
        fire_player_bullet(&mut state);
        let bullet = &state.bullets[0];
        assert_eq!(bullet.owner, BulletOwner::Player);
        assert!((bullet.vel.length() - state.tuning.bullet_speed).abs() < 1e-4);
        assert_eq!(bullet.max_travel, state.tuning.bullet_max_travel());
        assert_eq!(state.events(), &[GameEvent::PlayerFired]);
    }
}

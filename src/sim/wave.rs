//! Wave spawning and level progression

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Alien, AlienKind, EntityRegistry, GameEvent, MovePattern, RunState};
use crate::consts::*;

/// Number of regular aliens in the batch for `level`
pub fn batch_size(level: u32) -> u32 {
    (1 + level).min(MAX_ALIENS)
}

/// Spawn the batch for `level` into the registry
pub fn spawn_wave(registry: &mut EntityRegistry, rng: &mut Pcg32, level: u32, now_ms: u64) {
    let fire_enabled = level > FIRE_LEVEL_THRESHOLD;

    for _ in 0..batch_size(level) {
        let kind = match rng.random_range(0..3) {
            0 => AlienKind::Small,
            1 => AlienKind::Medium,
            _ => AlienKind::Big,
        };
        let pattern = match rng.random_range(0..3) {
            0 => MovePattern::Sine,
            1 => MovePattern::Zigzag,
            _ => MovePattern::Random,
        };
        let x = rng.random_range(40..=760) as f32;
        let y = rng.random_range(40..=140) as f32;
        let delay_ms = rng.random_range(ALIEN_FIRE_DELAY_MS.0..=ALIEN_FIRE_DELAY_MS.1);
        registry.spawn_alien(Alien::regular(
            kind,
            Vec2::new(x, y),
            pattern,
            fire_enabled,
            delay_ms,
            now_ms,
        ));
    }

    // Even levels bring a bonus alien
    if level % 2 == 0 {
        let y = rng.random_range(50..=120) as f32;
        let vx = if rng.random_bool(0.5) {
            STRONG_ALIEN_SPEED
        } else {
            -STRONG_ALIEN_SPEED
        };
        registry.spawn_alien(Alien::strong(y, vx, now_ms));
    }
}

/// Advance the level once the field is clear. Returns true if a new wave spawned.
pub fn run(
    registry: &mut EntityRegistry,
    run: &mut RunState,
    rng: &mut Pcg32,
    now_ms: u64,
    events: &mut Vec<GameEvent>,
) -> bool {
    if !registry.aliens.is_empty() {
        return false;
    }

    run.level += 1;
    run.refill_ammo();
    spawn_wave(registry, rng, run.level, now_ms);

    let fire_enabled = run.level > FIRE_LEVEL_THRESHOLD;
    for (_, alien) in registry.aliens.iter_mut() {
        alien.set_fire_enabled(fire_enabled);
    }

    log::info!(
        "Level {} ({} aliens, firing {})",
        run.level,
        registry.aliens.len(),
        if fire_enabled { "on" } else { "off" }
    );
    events.push(GameEvent::LevelAdvanced { level: run.level });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::AlienBody;
    use rand::SeedableRng;

    #[test]
    fn test_batch_size_caps() {
        assert_eq!(batch_size(1), 2);
        assert_eq!(batch_size(3), 4);
        assert_eq!(batch_size(4), 5);
        assert_eq!(batch_size(40), 5);
    }

    #[test]
    fn test_spawn_positions_within_bounds() {
        let mut rng = Pcg32::seed_from_u64(3);
        for level in 1..12 {
            let mut reg = EntityRegistry::new();
            spawn_wave(&mut reg, &mut rng, level, 0);
            for alien in reg.aliens.values() {
                if alien.kind.is_strong() {
                    assert!((50.0..=120.0).contains(&alien.rect.y));
                } else {
                    assert!((40.0..=760.0).contains(&alien.rect.x));
                    assert!((40.0..=140.0).contains(&alien.rect.y));
                    assert_eq!(alien.fire_enabled(), level > FIRE_LEVEL_THRESHOLD);
                    let AlienBody::Regular { fire, .. } = &alien.body else {
                        panic!("regular alien with a strong body");
                    };
                    let (lo, hi) = ALIEN_FIRE_DELAY_MS;
                    assert!((lo..=hi).contains(&fire.delay_ms), "delay = {}", fire.delay_ms);
                }
            }
        }
    }

    #[test]
    fn test_strong_alien_on_even_levels_only() {
        let mut rng = Pcg32::seed_from_u64(11);
        for level in 1..10 {
            let mut reg = EntityRegistry::new();
            spawn_wave(&mut reg, &mut rng, level, 0);
            let strong = reg.aliens.values().filter(|a| a.kind.is_strong()).count();
            assert_eq!(strong, if level % 2 == 0 { 1 } else { 0 });
            assert_eq!(reg.aliens.len() - strong, batch_size(level) as usize);
        }
    }

    #[test]
    fn test_level_advances_only_when_clear() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut reg = EntityRegistry::new();
        let mut run_state = RunState {
            ammo: 2,
            ..Default::default()
        };
        let mut events = Vec::new();

        spawn_wave(&mut reg, &mut rng, 1, 0);
        assert!(!run(&mut reg, &mut run_state, &mut rng, 0, &mut events));
        assert_eq!(run_state.level, 1);

        reg.aliens.clear();
        assert!(run(&mut reg, &mut run_state, &mut rng, 0, &mut events));
        assert_eq!(run_state.level, 2);
        assert_eq!(run_state.ammo, MAX_AMMO);
        assert_eq!(reg.aliens.len(), 4);
        assert_eq!(events, vec![GameEvent::LevelAdvanced { level: 2 }]);
    }

    #[test]
    fn test_fire_enabled_past_threshold() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut reg = EntityRegistry::new();
        let mut run_state = RunState {
            level: FIRE_LEVEL_THRESHOLD,
            ..Default::default()
        };
        let mut events = Vec::new();

        run(&mut reg, &mut run_state, &mut rng, 0, &mut events);
        assert!(
            reg.aliens
                .values()
                .filter(|a| !a.kind.is_strong())
                .all(|a| a.fire_enabled())
        );
    }
}

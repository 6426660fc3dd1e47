//! Collision detection and response
//!
//! Runs once per tick after motion. The three passes run in a fixed order and
//! an entity consumed by one pass is gone for the rest of the tick. Removal
//! goes through generational handles, so a pair that refers to an entity
//! already destroyed this tick resolves to nothing.

use rand::Rng;
use rand_pcg::Pcg32;

use super::arena::Handle;
use super::state::{BulletOwner, EntityRegistry, GameEvent, PowerUpKind, RunState};
use crate::consts::*;

/// Resolve every interaction for this tick
pub fn run(
    registry: &mut EntityRegistry,
    run: &mut RunState,
    rng: &mut Pcg32,
    now_ms: u64,
    events: &mut Vec<GameEvent>,
) {
    player_bullets_vs_aliens(registry, run, rng, now_ms, events);
    alien_bullets_vs_cannon(registry, run, now_ms, events);
    power_ups_vs_cannon(registry, run, now_ms, events);
}

/// Overlapping (bullet, alien) pairs, computed before any response
fn bullet_alien_pairs(registry: &EntityRegistry) -> Vec<(Handle, Handle)> {
    let mut pairs = Vec::new();
    for (bullet_handle, bullet) in registry.bullets.iter() {
        if bullet.owner != BulletOwner::Player {
            continue;
        }
        for (alien_handle, alien) in registry.aliens.iter() {
            if bullet.rect.overlaps(&alien.rect) {
                pairs.push((bullet_handle, alien_handle));
            }
        }
    }
    pairs
}

fn player_bullets_vs_aliens(
    registry: &mut EntityRegistry,
    run: &mut RunState,
    rng: &mut Pcg32,
    now_ms: u64,
    events: &mut Vec<GameEvent>,
) {
    for (bullet_handle, alien_handle) in bullet_alien_pairs(registry) {
        // A bullet overlapping several aliens damages each of them once
        registry.bullets.remove(bullet_handle);

        let Some(alien) = registry.aliens.get_mut(alien_handle) else {
            continue;
        };
        alien.hp = alien.hp.saturating_sub(1);
        if alien.hp > 0 {
            events.push(GameEvent::AlienHit {
                kind: alien.kind,
                hp_left: alien.hp,
            });
            continue;
        }

        let Some(dead) = registry.aliens.remove(alien_handle) else {
            continue;
        };
        let center = dead.rect.center();
        registry.spawn_explosion(center, now_ms);
        run.award_kill(dead.kind);
        events.push(GameEvent::AlienDestroyed {
            kind: dead.kind,
            center,
        });

        if rng.random_bool(POWERUP_DROP_CHANCE) {
            let kind = if run.level > FIRE_LEVEL_THRESHOLD && rng.random_bool(0.5) {
                PowerUpKind::Shield
            } else {
                PowerUpKind::Ammo
            };
            registry.spawn_power_up(kind, center);
            log::debug!("Dropped {:?} power-up", kind);
        }
    }
}

fn alien_bullets_vs_cannon(
    registry: &mut EntityRegistry,
    run: &mut RunState,
    now_ms: u64,
    events: &mut Vec<GameEvent>,
) {
    let cannon_rect = registry.cannon.rect;
    let hits: Vec<Handle> = registry
        .bullets
        .iter()
        .filter(|(_, b)| b.owner == BulletOwner::Alien && b.rect.overlaps(&cannon_rect))
        .map(|(h, _)| h)
        .collect();
    if hits.is_empty() {
        return;
    }

    // One hit instance per tick no matter how many bullets landed
    let shielded = registry.cannon.shield_active();
    for handle in hits {
        registry.bullets.remove(handle);
    }

    if shielded {
        registry.cannon.consume_shield();
        events.push(GameEvent::ShieldAbsorbed);
    } else {
        run.lose_life();
        registry.spawn_explosion(cannon_rect.center(), now_ms);
        events.push(GameEvent::CannonHit {
            lives_left: run.lives,
        });
    }
}

fn power_ups_vs_cannon(
    registry: &mut EntityRegistry,
    run: &mut RunState,
    now_ms: u64,
    events: &mut Vec<GameEvent>,
) {
    let cannon_rect = registry.cannon.rect;
    let caught: Vec<Handle> = registry
        .power_ups
        .iter()
        .filter(|(_, p)| p.rect.overlaps(&cannon_rect))
        .map(|(h, _)| h)
        .collect();

    for handle in caught {
        let Some(power_up) = registry.power_ups.remove(handle) else {
            continue;
        };
        match power_up.kind {
            PowerUpKind::Ammo => run.add_ammo(POWERUP_AMMO_BONUS),
            PowerUpKind::Shield => {
                if run.level > FIRE_LEVEL_THRESHOLD {
                    registry.cannon.activate_shield(now_ms);
                }
            }
        }
        events.push(GameEvent::PowerUpCollected {
            kind: power_up.kind,
        });
    }
}

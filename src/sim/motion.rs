//! Per-entity self-advance
//!
//! Every entity moves by its own rule; nothing here looks at another entity
//! except the alien-bullet cap that gates alien fire.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::rect::Edge;
use super::state::{AlienBody, Bullet, BulletOwner, Cannon, EntityRegistry, MovePattern};
use crate::consts::*;
use crate::input::LateralIntent;

/// Advance all entities by one tick. Returns how many strong aliens timed out.
pub fn run(
    registry: &mut EntityRegistry,
    lateral: &LateralIntent,
    rng: &mut Pcg32,
    now_ms: u64,
) -> usize {
    advance_bullets(registry);
    let escaped = advance_aliens(registry, rng, now_ms);
    advance_power_ups(registry);
    registry.explosions.retain(|e| !e.expired(now_ms));
    advance_cannon(&mut registry.cannon, lateral, now_ms);
    escaped
}

fn advance_bullets(registry: &mut EntityRegistry) {
    registry.bullets.retain(|bullet| {
        bullet.rect.y += bullet.vy;
        match bullet.owner {
            BulletOwner::Player => bullet.rect.bottom() >= 0.0,
            BulletOwner::Alien => bullet.rect.top() <= SCREEN_HEIGHT,
        }
    });
}

/// Move aliens, expire strong aliens, and let armed aliens fire
fn advance_aliens(registry: &mut EntityRegistry, rng: &mut Pcg32, now_ms: u64) -> usize {
    let mut alien_bullets = registry.alien_bullet_count();
    let mut new_bullets: Vec<Bullet> = Vec::new();
    let mut expired = Vec::new();

    for (handle, alien) in registry.aliens.iter_mut() {
        match &mut alien.body {
            AlienBody::Regular { pattern, phase, fire } => {
                *phase += ALIEN_PHASE_STEP;
                let dx = match pattern {
                    MovePattern::Sine => ALIEN_SWAY_AMPLITUDE * (*phase * 3.0).sin(),
                    MovePattern::Zigzag => ALIEN_SWAY_AMPLITUDE * (*phase * 5.0).sin(),
                    MovePattern::Random => match rng.random_range(0..3) {
                        0 => -2.0,
                        1 => 0.0,
                        _ => 2.0,
                    },
                };
                alien.rect.translate(Vec2::new(dx, ALIEN_DRIFT));
                alien.rect.clamp_x(SCREEN_WIDTH);

                if fire.enabled
                    && alien_bullets < MAX_ALIEN_BULLETS
                    && now_ms.saturating_sub(fire.last_shot_ms) > fire.delay_ms
                {
                    new_bullets.push(Bullet::alien(alien.rect.mid_bottom()));
                    alien_bullets += 1;
                    fire.last_shot_ms = now_ms;
                }
            }
            AlienBody::Strong {
                vx,
                spawn_time_ms,
                lifespan_ms,
            } => {
                alien.rect.x += *vx;
                // Reflect toward the interior so an off-screen entry never stalls
                match alien.rect.clamp_x(SCREEN_WIDTH) {
                    Some(Edge::Left) => *vx = vx.abs(),
                    Some(Edge::Right) => *vx = -vx.abs(),
                    None => {}
                }
                if now_ms.saturating_sub(*spawn_time_ms) > *lifespan_ms {
                    expired.push(handle);
                }
            }
        }
    }

    let mut escaped = 0;
    for handle in expired {
        if registry.aliens.remove(handle).is_some() {
            log::debug!("Strong alien lifespan elapsed");
            escaped += 1;
        }
    }
    for bullet in new_bullets {
        registry.bullets.insert(bullet);
    }
    escaped
}

fn advance_power_ups(registry: &mut EntityRegistry) {
    registry.power_ups.retain(|p| {
        p.rect.y += POWERUP_SPEED;
        p.rect.top() <= SCREEN_HEIGHT
    });
}

/// Keyboard displacement first, then gesture easing, then clamp and shield expiry
pub fn advance_cannon(cannon: &mut Cannon, lateral: &LateralIntent, now_ms: u64) {
    cannon.rect.x += lateral.key_dx;
    if let Some(target) = lateral.target_x {
        let cx = cannon.rect.center_x();
        cannon.rect.set_center_x(cx + (target - cx) * CANNON_SMOOTH);
    }
    cannon.rect.clamp_x(SCREEN_WIDTH);
    cannon.expire_shield(now_ms);
}

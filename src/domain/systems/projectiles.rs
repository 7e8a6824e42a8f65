use crate::domain::state::World;
use crate::domain::tuning::enemy::EnemyTuning;
use crate::domain::tuning::projectile::ProjectileTuning;
use tracing::info;

/// Integrates projectile movement and lifetimes.
pub fn tick_projectiles(world: &mut World, dt: f32) {
    for p in world.projectiles.iter_mut() {
        p.x += p.vx * dt;
        p.y += p.vy * dt;
        p.ttl -= dt;
    }
}

/// Projectile-vs-enemy collision (naive O(P*E); entity counts are tiny).
///
/// Damage is applied exactly once per projectile: the first live enemy hit
/// absorbs it and the projectile is marked expended. The sweep at the end is
/// the single removal pass for this tick.
pub fn resolve_hits(world: &mut World, projectiles: &ProjectileTuning, enemies: &EnemyTuning) {
    let hit_radius = enemies.radius + projectiles.radius;
    let hit_radius_sq = hit_radius * hit_radius;

    for p in world.projectiles.iter_mut() {
        if p.ttl <= 0.0 {
            continue;
        }

        for e in world.enemies.iter_mut() {
            if !e.alive {
                continue;
            }

            let dx = e.x - p.x;
            let dy = e.y - p.y;
            if (dx * dx + dy * dy) <= hit_radius_sq {
                e.take_damage(p.damage);
                info!(
                    target = ?e.kind,
                    damage = p.damage,
                    powered = p.powered,
                    hp = e.hp,
                    "projectile hit"
                );
                p.ttl = 0.0;
                break;
            }
        }
    }

    world.projectiles.retain(|p| p.ttl > 0.0);
}

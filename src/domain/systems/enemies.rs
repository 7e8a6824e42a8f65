use crate::domain::state::{SimEnemy, World};
use crate::domain::tuning::craft::CraftTuning;
use crate::domain::tuning::enemy::EnemyTuning;
use std::f32::consts::FRAC_PI_2;
use tracing::info;

/// Advances every live enemy toward the craft and turns it to face its
/// heading. Facing is presentational; it never affects gameplay.
pub fn tick_enemies(enemies: &mut [SimEnemy], craft_x: f32, craft_y: f32, dt: f32) {
    for e in enemies.iter_mut() {
        if !e.alive {
            continue;
        }

        let dx = craft_x - e.x;
        let dy = craft_y - e.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist <= f32::EPSILON {
            continue;
        }

        let ux = dx / dist;
        let uy = dy / dist;
        let speed = e.kind.move_speed();
        e.x += ux * speed * dt;
        e.y += uy * speed * dt;

        // 0 rad = up, same convention as the craft.
        e.rot = uy.atan2(ux) - FRAC_PI_2;
    }
}

/// Outcome of the enemy-vs-craft contact pass for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    None,
    MatchOver,
}

/// Resolves enemies overlapping the craft.
///
/// With the shield up the enemy dies on contact; without it the match is
/// over and the rest of the pass is moot.
pub fn resolve_craft_contact(
    world: &mut World,
    enemies: &EnemyTuning,
    craft: &CraftTuning,
) -> ContactOutcome {
    let hit_radius = enemies.radius + craft.radius;
    let hit_radius_sq = hit_radius * hit_radius;
    let shielded = world.craft.is_shield_active();

    for e in world.enemies.iter_mut() {
        if !e.alive {
            continue;
        }

        let dx = e.x - world.craft.x;
        let dy = e.y - world.craft.y;
        if (dx * dx + dy * dy) > hit_radius_sq {
            continue;
        }

        if shielded {
            info!(kind = ?e.kind, "shield kill");
            e.destroy();
        } else {
            info!(kind = ?e.kind, "enemy reached unshielded craft");
            return ContactOutcome::MatchOver;
        }
    }

    ContactOutcome::None
}

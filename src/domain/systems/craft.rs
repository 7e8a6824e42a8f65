use crate::domain::cooldown::Cooldown;
use crate::domain::state::{SimProjectile, World};
use crate::domain::tuning::craft::CraftTuning;
use crate::domain::tuning::projectile::ProjectileTuning;
use std::f32::consts::FRAC_PI_2;

/// Advances the craft: target tracking, the automatic fire timer and the
/// shield state machine.
pub fn tick_craft(
    world: &mut World,
    dt: f32,
    craft: &CraftTuning,
    projectile: &ProjectileTuning,
) {
    // Orientation tracks the live target; neutral when untargeted.
    match target_position(world) {
        Some((tx, ty)) => {
            let dx = tx - world.craft.x;
            let dy = ty - world.craft.y;
            world.craft.rot = dy.atan2(dx) - FRAC_PI_2;
        }
        None => world.craft.rot = 0.0,
    }

    world.craft.shield.tick(dt, craft.shield_cooldown);

    world.craft.fire.tick(dt);
    if world.craft.fire.is_ready() {
        fire_projectile(world, false, craft, projectile);
        world.craft.fire = Cooldown::armed(craft.fire_rate);
    }
}

/// Spawns a shot from the craft's rim toward the current target, or straight
/// up when untargeted. Powered shots bypass the fire timer entirely.
pub fn fire_projectile(
    world: &mut World,
    powered: bool,
    craft: &CraftTuning,
    projectile: &ProjectileTuning,
) {
    let (ux, uy) = aim_direction(world);
    let speed = if powered {
        craft.bomb_speed
    } else {
        craft.shot_speed
    };
    let base_damage = if powered {
        craft.bomb_damage
    } else {
        craft.shot_damage
    };

    let id = world.next_projectile_id;
    world.next_projectile_id = id.wrapping_add(1);
    world.projectiles.push(SimProjectile::spawn(
        id,
        world.craft.x + ux * craft.radius,
        world.craft.y + uy * craft.radius,
        ux,
        uy,
        speed,
        base_damage,
        powered,
        projectile.life_time,
    ));
}

fn target_position(world: &World) -> Option<(f32, f32)> {
    let kind = world.craft.target?;
    world.enemy_of_kind(kind).map(|e| (e.x, e.y))
}

fn aim_direction(world: &World) -> (f32, f32) {
    match target_position(world) {
        Some((tx, ty)) => {
            let dx = tx - world.craft.x;
            let dy = ty - world.craft.y;
            let len = (dx * dx + dy * dy).sqrt();
            if len > f32::EPSILON {
                (dx / len, dy / len)
            } else {
                (0.0, 1.0)
            }
        }
        None => (0.0, 1.0),
    }
}

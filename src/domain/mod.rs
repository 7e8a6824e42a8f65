// Domain layer: core simulation types and rules.

pub mod cooldown;
pub mod state;
pub mod systems;
pub mod tuning;

pub use cooldown::Cooldown;
pub use state::{
    Craft, CraftSnapshot, EnemyKind, EnemySnapshot, ProjectileSnapshot, ShieldState, SimEnemy,
    SimProjectile, World,
};

// Gameplay tuning, separate from runtime/server configuration.

pub mod craft;
pub mod enemy;
pub mod projectile;

pub use craft::CraftTuning;
pub use enemy::EnemyTuning;
pub use projectile::ProjectileTuning;

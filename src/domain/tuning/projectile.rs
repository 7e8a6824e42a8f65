/// Gameplay tuning for projectiles.

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Lifetime in seconds before an unspent projectile is despawned.
    pub life_time: f32,

    /// World-space collision radius.
    pub radius: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            life_time: 3.0,
            radius: 5.0,
        }
    }
}

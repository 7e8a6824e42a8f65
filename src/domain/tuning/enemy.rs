use crate::domain::state::EnemyKind;

/// Gameplay tuning for enemies.
///
/// Per-tier health and speed live on `EnemyKind` itself; this covers the
/// spatial parameters of a match.
#[derive(Debug, Clone, Copy)]
pub struct EnemyTuning {
    /// World-space collision radius shared by all tiers.
    pub radius: f32,

    /// One enemy of each tier, preplaced at match start.
    pub layout: [(EnemyKind, f32, f32); 4],
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            radius: 20.0,
            layout: [
                (EnemyKind::Small, -120.0, 160.0),
                (EnemyKind::Medium, -40.0, 200.0),
                (EnemyKind::Elite, 40.0, 200.0),
                (EnemyKind::Boss, 120.0, 240.0),
            ],
        }
    }
}

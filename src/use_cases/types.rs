// Use-case level inputs/outputs for the game loop.

use crate::domain::{CraftSnapshot, EnemyKind, EnemySnapshot, ProjectileSnapshot, ShieldState};

/// Player-issued actions on the craft, resolved by the command router.
#[derive(Debug, Clone)]
pub enum CraftAction {
    ActivateShield,
    FirePowerBomb,
    /// `None` clears the current target.
    SetTarget { kind: Option<EnemyKind> },
    /// Discrete horizontal step; the world clamps the result.
    Move { dx: f32 },
}

/// Everything the world task consumes from its input channel.
#[derive(Debug, Clone)]
pub enum GameEvent {
    Craft(CraftAction),
    /// Full world re-initialization from the starting configuration.
    Restart,
}

/// High-level match lifecycle, published on a watch channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchState {
    MatchRunning,
    MatchEnded,
}

/// Coarse shield phase exposed to the command router for player replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShieldStatus {
    Ready,
    Active,
    Cooling,
}

impl From<ShieldState> for ShieldStatus {
    fn from(state: ShieldState) -> Self {
        match state {
            ShieldState::Ready => ShieldStatus::Ready,
            ShieldState::Active(_) => ShieldStatus::Active,
            ShieldState::Cooling(_) => ShieldStatus::Cooling,
        }
    }
}

/// Per-tick craft state consumed outside the world task.
#[derive(Debug, Clone)]
pub struct CraftStatus {
    pub shield: ShieldStatus,
    pub target: Option<EnemyKind>,
}

impl CraftStatus {
    /// Status of a freshly spawned craft, used to seed the watch channel.
    pub fn initial() -> Self {
        Self {
            shield: ShieldStatus::Ready,
            target: None,
        }
    }
}

/// Snapshot of the world for a given tick.
#[derive(Debug, Clone)]
pub struct WorldUpdate {
    pub tick: u64,
    pub craft: CraftSnapshot,
    pub enemies: Vec<EnemySnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
}

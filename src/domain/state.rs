// Domain-level simulation entities and snapshot types.

use crate::domain::cooldown::Cooldown;
use crate::domain::tuning::craft::CraftTuning;
use crate::domain::tuning::enemy::EnemyTuning;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Enemy threat tiers. Fixed at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Small,
    Medium,
    Elite,
    Boss,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Small,
        EnemyKind::Medium,
        EnemyKind::Elite,
        EnemyKind::Boss,
    ];

    /// Starting health for this tier.
    pub fn health(self) -> f32 {
        match self {
            EnemyKind::Small => 50.0,
            EnemyKind::Medium => 75.0,
            EnemyKind::Elite => 150.0,
            EnemyKind::Boss => 300.0,
        }
    }

    /// Movement speed in world units per second. Lighter tiers are faster.
    pub fn move_speed(self) -> f32 {
        match self {
            EnemyKind::Small => 20.0,
            EnemyKind::Medium => 15.0,
            EnemyKind::Elite => 10.0,
            EnemyKind::Boss => 5.0,
        }
    }

    /// Lowercase name used in targeting keywords and player-facing replies.
    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Small => "small",
            EnemyKind::Medium => "medium",
            EnemyKind::Elite => "elite",
            EnemyKind::Boss => "boss",
        }
    }

    /// Scans lowercased free text for the first tier keyword it mentions.
    pub fn from_keyword(text: &str) -> Option<Self> {
        EnemyKind::ALL
            .into_iter()
            .find(|kind| text.contains(kind.name()))
    }
}

pub struct SimEnemy {
    pub id: u64,
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    pub rot: f32,
    pub hp: f32,
    pub alive: bool,
}

impl SimEnemy {
    pub fn spawn(id: u64, kind: EnemyKind, x: f32, y: f32) -> Self {
        let hp = kind.health();
        info!(?kind, hp, speed = kind.move_speed(), "enemy spawned");
        Self {
            id,
            kind,
            x,
            y,
            rot: 0.0,
            hp,
            alive: true,
        }
    }

    /// Applies damage; health only ever decreases. Dead enemies ignore it.
    pub fn take_damage(&mut self, amount: f32) {
        if !self.alive {
            return;
        }
        self.hp -= amount;
        if self.hp <= 0.0 {
            self.hp = 0.0;
            self.destroy();
        }
    }

    /// One-shot transition to the destroyed state.
    pub fn destroy(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        info!(kind = ?self.kind, id = self.id, "enemy destroyed");
    }
}

pub struct SimProjectile {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub rot: f32,
    pub vx: f32,
    pub vy: f32,
    pub damage: f32,
    pub powered: bool,
    pub ttl: f32,
}

impl SimProjectile {
    /// Builds a projectile from a firing direction.
    ///
    /// Powered shots carry double their base damage. A degenerate direction
    /// falls back to straight up.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        id: u64,
        x: f32,
        y: f32,
        dir_x: f32,
        dir_y: f32,
        speed: f32,
        base_damage: f32,
        powered: bool,
        ttl: f32,
    ) -> Self {
        let len = (dir_x * dir_x + dir_y * dir_y).sqrt();
        let (ux, uy) = if len > f32::EPSILON {
            (dir_x / len, dir_y / len)
        } else {
            (0.0, 1.0)
        };
        let damage = if powered {
            base_damage * 2.0
        } else {
            base_damage
        };
        Self {
            id,
            x,
            y,
            rot: uy.atan2(ux) - std::f32::consts::FRAC_PI_2,
            vx: ux * speed,
            vy: uy * speed,
            damage,
            powered,
            ttl,
        }
    }
}

/// Shield state machine: Ready -> Active -> Cooling -> Ready.
///
/// Activation is only possible from Ready, so "active" and "on cooldown" are
/// mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShieldState {
    Ready,
    Active(Cooldown),
    Cooling(Cooldown),
}

impl ShieldState {
    pub fn is_active(&self) -> bool {
        matches!(self, ShieldState::Active(_))
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ShieldState::Ready)
    }

    /// Arms the shield for `duration` seconds. No-op unless Ready.
    pub fn activate(&mut self, duration: f32) -> bool {
        if !self.is_available() {
            return false;
        }
        *self = ShieldState::Active(Cooldown::armed(duration));
        true
    }

    pub fn tick(&mut self, dt: f32, cooldown_seconds: f32) {
        match self {
            ShieldState::Ready => {}
            ShieldState::Active(window) => {
                window.tick(dt);
                if window.is_ready() {
                    *self = ShieldState::Cooling(Cooldown::armed(cooldown_seconds));
                }
            }
            ShieldState::Cooling(window) => {
                window.tick(dt);
                if window.is_ready() {
                    *self = ShieldState::Ready;
                }
            }
        }
    }
}

/// The player-controlled craft.
///
/// Position only changes through discrete router moves; the per-tick
/// simulation never moves it on its own.
pub struct Craft {
    pub x: f32,
    pub y: f32,
    pub rot: f32,
    pub fire: Cooldown,
    pub shield: ShieldState,
    pub target: Option<EnemyKind>,
}

impl Craft {
    pub fn spawn(tuning: &CraftTuning) -> Self {
        Self {
            x: 0.0,
            y: tuning.spawn_y,
            rot: 0.0,
            // Starts ready so the first automatic shot fires on the first tick.
            fire: Cooldown::ready(),
            shield: ShieldState::Ready,
            target: None,
        }
    }

    pub fn activate_shield(&mut self, tuning: &CraftTuning) -> bool {
        self.shield.activate(tuning.shield_duration)
    }

    pub fn is_shield_active(&self) -> bool {
        self.shield.is_active()
    }

    pub fn is_shield_available(&self) -> bool {
        self.shield.is_available()
    }

    /// Selects the enemy tier to aim at; `None` clears the selection.
    pub fn set_target(&mut self, kind: Option<EnemyKind>) {
        self.target = kind;
    }

    /// Discrete horizontal step, clamped to the playfield bound.
    pub fn move_by(&mut self, dx: f32, tuning: &CraftTuning) {
        self.x = (self.x + dx).clamp(-tuning.move_bound, tuning.move_bound);
    }
}

/// All mutable simulation state for one match.
///
/// Entities keep stable ids for their whole lifetime; destroyed enemies stay
/// in the arena as inert tombstones, expended projectiles are swept once per
/// tick after collision resolution.
pub struct World {
    pub craft: Craft,
    pub enemies: Vec<SimEnemy>,
    pub projectiles: Vec<SimProjectile>,
    pub next_projectile_id: u64,
}

impl World {
    pub fn spawn(enemies: &EnemyTuning, craft: &CraftTuning) -> Self {
        let enemies = enemies
            .layout
            .iter()
            .enumerate()
            .map(|(i, &(kind, x, y))| SimEnemy::spawn(i as u64 + 1, kind, x, y))
            .collect();
        Self {
            craft: Craft::spawn(craft),
            enemies,
            projectiles: Vec::new(),
            next_projectile_id: 1,
        }
    }

    /// The live enemy of the given tier, if any.
    pub fn enemy_of_kind(&self, kind: EnemyKind) -> Option<&SimEnemy> {
        self.enemies.iter().find(|e| e.alive && e.kind == kind)
    }
}

#[derive(Debug, Clone)]
pub struct CraftSnapshot {
    pub x: f32,
    pub y: f32,
    pub rot: f32,
    pub shield_active: bool,
}

#[derive(Debug, Clone)]
pub struct EnemySnapshot {
    pub id: u64,
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    pub rot: f32,
    pub hp: f32,
}

#[derive(Debug, Clone)]
pub struct ProjectileSnapshot {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub rot: f32,
    pub powered: bool,
}

impl From<&Craft> for CraftSnapshot {
    fn from(c: &Craft) -> Self {
        Self {
            x: c.x,
            y: c.y,
            rot: c.rot,
            shield_active: c.is_shield_active(),
        }
    }
}

impl From<&SimEnemy> for EnemySnapshot {
    fn from(e: &SimEnemy) -> Self {
        Self {
            id: e.id,
            kind: e.kind,
            x: e.x,
            y: e.y,
            rot: e.rot,
            hp: e.hp,
        }
    }
}

impl From<&SimProjectile> for ProjectileSnapshot {
    fn from(p: &SimProjectile) -> Self {
        Self {
            id: p.id,
            x: p.x,
            y: p.y,
            rot: p.rot,
            powered: p.powered,
        }
    }
}

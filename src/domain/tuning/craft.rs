/// Gameplay tuning for the player craft.
///
/// Keep this separate from runtime/server configuration (tick rates, buffer
/// sizes, etc.).

#[derive(Debug, Clone, Copy)]
pub struct CraftTuning {
    /// Seconds between automatic standard shots.
    pub fire_rate: f32,

    /// Standard shot speed in units per second.
    pub shot_speed: f32,

    /// Standard shot base damage.
    pub shot_damage: f32,

    /// Power bomb speed in units per second.
    pub bomb_speed: f32,

    /// Power bomb base damage, doubled by the powered-shot rule on spawn.
    pub bomb_damage: f32,

    /// Seconds the shield stays up once activated.
    pub shield_duration: f32,

    /// Seconds after shield expiry before it can be activated again.
    pub shield_cooldown: f32,

    /// Horizontal distance of one discrete move command.
    pub move_step: f32,

    /// The craft's x position is clamped to [-move_bound, move_bound].
    pub move_bound: f32,

    /// Fixed vertical spawn position.
    pub spawn_y: f32,

    /// World-space collision radius (also the projectile spawn offset).
    pub radius: f32,
}

impl Default for CraftTuning {
    fn default() -> Self {
        Self {
            fire_rate: 0.5,
            shot_speed: 300.0,
            shot_damage: 10.0,
            bomb_speed: 450.0,
            bomb_damage: 30.0,
            shield_duration: 5.0,
            shield_cooldown: 10.0,
            move_step: 140.0,
            move_bound: 140.0,
            spawn_y: -180.0,
            radius: 24.0,
        }
    }
}

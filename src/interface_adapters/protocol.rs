// Wire protocol DTOs and conversions for public battle server messages.

use crate::domain::{CraftSnapshot, EnemyKind, EnemySnapshot, ProjectileSnapshot};
use crate::use_cases::{MatchState, WorldUpdate};
use serde::{Deserialize, Serialize};

/// Messages the server sends to the connected client over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Snapshot of the world for a given tick.
    WorldUpdate(WorldUpdateDto),
    // High-level match transitions (running, ended).
    GameState(MatchStateDto),
    // Recognized text for a submitted voice recording.
    Transcript(TranscriptDto),
    // Player-facing reply for a processed command.
    CommandReply(CommandReplyDto),
    // A voice recording that could not be turned into a command.
    VoiceError(VoiceErrorDto),
}

/// Messages the client sends to the server over the WebSocket. Voice
/// recordings travel as binary frames instead.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    // Free-text player command.
    Command(CommandPayload),
    // Cancel the in-flight command, if any.
    Cancel,
    // Rebuild the world from the starting configuration.
    Restart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandPayload {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptDto {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandReplyDto {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceErrorDto {
    // Machine-readable failure class; "silence" is distinct from upstream
    // failures.
    pub kind: &'static str,
    pub message: String,
}

/// Snapshot of the world sent to the client on each tick.
#[derive(Debug, Clone, Serialize)]
pub struct WorldUpdateDto {
    pub tick: u64,
    pub craft: CraftStateDto,
    pub enemies: Vec<EnemyStateDto>,
    pub projectiles: Vec<ProjectileStateDto>,
}

impl From<WorldUpdate> for WorldUpdateDto {
    fn from(update: WorldUpdate) -> Self {
        Self {
            tick: update.tick,
            craft: CraftStateDto::from(&update.craft),
            enemies: update.enemies.iter().map(EnemyStateDto::from).collect(),
            projectiles: update
                .projectiles
                .iter()
                .map(ProjectileStateDto::from)
                .collect(),
        }
    }
}

/// Flattened craft state for wire transmission in world updates.
#[derive(Debug, Clone, Serialize)]
pub struct CraftStateDto {
    pub x: f32,
    pub y: f32,
    pub rot: f32,
    pub shield_active: bool,
}

impl From<&CraftSnapshot> for CraftStateDto {
    fn from(craft: &CraftSnapshot) -> Self {
        Self {
            x: craft.x,
            y: craft.y,
            rot: craft.rot,
            shield_active: craft.shield_active,
        }
    }
}

/// Flattened enemy state for wire transmission in world updates.
#[derive(Debug, Clone, Serialize)]
pub struct EnemyStateDto {
    pub id: u64,
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    pub rot: f32,
    pub hp: f32,
}

impl From<&EnemySnapshot> for EnemyStateDto {
    fn from(enemy: &EnemySnapshot) -> Self {
        Self {
            id: enemy.id,
            kind: enemy.kind,
            x: enemy.x,
            y: enemy.y,
            rot: enemy.rot,
            hp: enemy.hp,
        }
    }
}

/// Flattened projectile state for wire transmission in world updates.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectileStateDto {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub rot: f32,
    pub powered: bool,
}

impl From<&ProjectileSnapshot> for ProjectileStateDto {
    fn from(projectile: &ProjectileSnapshot) -> Self {
        Self {
            id: projectile.id,
            x: projectile.x,
            y: projectile.y,
            rot: projectile.rot,
            powered: projectile.powered,
        }
    }
}

/// Match lifecycle state sent to the client for UI flow.
#[derive(Debug, Clone, Serialize)]
pub enum MatchStateDto {
    MatchRunning,
    MatchEnded,
}

impl From<MatchState> for MatchStateDto {
    fn from(state: MatchState) -> Self {
        match state {
            MatchState::MatchRunning => MatchStateDto::MatchRunning,
            MatchState::MatchEnded => MatchStateDto::MatchEnded,
        }
    }
}

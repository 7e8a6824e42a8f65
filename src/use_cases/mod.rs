// Use cases layer: application workflows for the battle server.

pub mod commands;
pub mod game;
pub mod types;

pub use commands::{CommandOutcome, CommandRouter};
pub use game::{WorldSettings, world_task};
pub use types::{CraftAction, CraftStatus, GameEvent, MatchState, ShieldStatus, WorldUpdate};

use crate::interface_adapters::clients::speech::SpeechClient;
use crate::use_cases::{CommandRouter, CraftStatus, GameEvent, MatchState, WorldUpdate};
use axum::extract::ws::Utf8Bytes;
use std::sync::Arc;
use tokio::sync::{Notify, broadcast, mpsc, watch};

#[derive(Clone)]
pub struct AppState {
    // Events flowing from the network into the game loop.
    pub input_tx: mpsc::Sender<GameEvent>,
    // World updates produced by the game loop (domain structs).
    pub world_tx: broadcast::Sender<WorldUpdate>,
    // Serialized world updates, shared across all connections.
    pub world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    // Latest serialized world update for lag recovery.
    pub world_latest_tx: watch::Sender<Utf8Bytes>,
    // High-level match lifecycle.
    pub match_state_tx: watch::Sender<MatchState>,
    // Per-tick craft status for command replies.
    pub craft_status_tx: watch::Sender<CraftStatus>,
    // Resolves free player text into craft actions.
    pub router: CommandRouter,
    // Turns voice recordings into text.
    pub speech: SpeechClient,
    // Stops the world task on server teardown.
    pub world_shutdown: Arc<Notify>,
}

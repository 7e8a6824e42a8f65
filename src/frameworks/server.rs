// Framework bootstrap for the battle server runtime.

use crate::frameworks::config;
use crate::interface_adapters::clients::llm::LlmClient;
use crate::interface_adapters::clients::speech::SpeechClient;
use crate::interface_adapters::net::{world_update_serializer, ws_handler};
use crate::interface_adapters::state::AppState;
use crate::use_cases::game::{WorldSettings, world_task};
use crate::use_cases::types::{CraftStatus, GameEvent, MatchState, WorldUpdate};
use crate::use_cases::CommandRouter;

use axum::extract::ws::Utf8Bytes;
use axum::{Router, routing::get};
use std::io::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{Notify, broadcast, mpsc, watch};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state()?;

    let app = Router::new().route("/ws", get(ws_handler)).with_state(state);

    tracing::info!(%address, "listening");

    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state() -> Result<Arc<AppState>> {
    let llm_base_url = config::llm_service_url();
    let llm = LlmClient::new(llm_base_url.clone(), config::llm_timeout())
        .map_err(|e| std::io::Error::other(format!("failed to initialize llm client: {e}")))?;
    tracing::debug!(llm_base_url = %llm_base_url, "llm client configured");

    let speech = SpeechClient::new(
        config::speech_service_url(),
        config::speech_api_key(),
        config::speech_timeout(),
    )
    .map_err(|e| std::io::Error::other(format!("failed to initialize speech client: {e}")))?;

    // Channel wiring for the world loop.
    // input_tx/rx: all player events go to the single world task.
    let (input_tx, input_rx) = mpsc::channel::<GameEvent>(config::INPUT_CHANNEL_CAPACITY);
    // world_tx/rx: world updates broadcast to all clients.
    let (world_tx, _world_rx) = broadcast::channel::<WorldUpdate>(config::WORLD_BROADCAST_CAPACITY);
    // world_bytes_tx/rx: serialized world updates shared across all clients.
    let (world_bytes_tx, _world_bytes_rx) =
        broadcast::channel::<Utf8Bytes>(config::WORLD_BROADCAST_CAPACITY);
    let (world_latest_tx, _world_latest_rx) = watch::channel::<Utf8Bytes>(Utf8Bytes::from(""));
    let (match_state_tx, _match_state_rx) =
        watch::channel::<MatchState>(MatchState::MatchRunning);
    let (craft_status_tx, craft_status_rx) = watch::channel::<CraftStatus>(CraftStatus::initial());

    let world_shutdown = Arc::new(Notify::new());

    // Spawn the authoritative world loop.
    tokio::spawn(world_task(
        input_rx,
        world_tx.clone(),
        craft_status_tx.clone(),
        match_state_tx.clone(),
        WorldSettings {
            tick_interval: config::TICK_INTERVAL,
            ..WorldSettings::default()
        },
        Arc::clone(&world_shutdown),
    ));

    // Spawn the world update serializer task in the adapter layer.
    tokio::spawn(world_update_serializer(
        world_tx.subscribe(),
        world_bytes_tx.clone(),
        world_latest_tx.clone(),
    ));

    let router = CommandRouter::new(
        llm,
        input_tx.clone(),
        craft_status_rx,
        crate::domain::tuning::CraftTuning::default().move_step,
    );

    Ok(Arc::new(AppState {
        input_tx,
        world_tx,
        world_bytes_tx,
        world_latest_tx,
        match_state_tx,
        craft_status_tx,
        router,
        speech,
        world_shutdown,
    }))
}

use crate::interface_adapters::audio;
use crate::interface_adapters::clients::speech::SpeechClient;
use crate::interface_adapters::protocol::{
    ClientMessage, CommandReplyDto, ServerMessage, TranscriptDto, VoiceErrorDto, WorldUpdateDto,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{CommandOutcome, CommandRouter, GameEvent, MatchState, WorldUpdate};

use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::sink::SinkExt;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tracing::{Instrument, error, info, info_span, warn};

const REPLY_CHANNEL_CAPACITY: usize = 8;
const MAX_INVALID_JSON: u32 = 10;
const BUSY_REPLY: &str = "Still processing the previous command.";
const CANCELLED_REPLY: &str = "Command cancelled.";

// Connection ids are only for correlating logs.
static CONN_SEQ: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    InputClosed,
    WorldUpdatesClosed,
    MatchStateClosed,
}

/// Serializes each world update once and broadcasts the shared bytes to all
/// connections; the watch channel keeps the latest snapshot for lag recovery.
pub async fn world_update_serializer(
    mut world_rx: broadcast::Receiver<WorldUpdate>,
    world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    world_latest_tx: watch::Sender<Utf8Bytes>,
) {
    loop {
        match world_rx.recv().await {
            Ok(update) => {
                let msg = ServerMessage::WorldUpdate(WorldUpdateDto::from(update));
                let txt = match serde_json::to_string(&msg) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize world update");
                        continue;
                    }
                };

                let bytes = Utf8Bytes::from(txt);
                let _ = world_latest_tx.send(bytes.clone());
                let _ = world_bytes_tx.send(bytes);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(
                    missed = n,
                    "world serializer lagged; skipping to latest update"
                );
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("world updates channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        // Connection-scoped span for correlating logs.
        let conn_id = CONN_SEQ.fetch_add(1, Ordering::Relaxed);
        handle_socket(socket, state).instrument(info_span!("conn", conn_id))
    })
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut ctx = match bootstrap_connection(&mut socket, &state).await {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(error = ?e, "failed to bootstrap connection");
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: close_code::POLICY,
                    reason: "bootstrap failed".into(),
                })))
                .await;
            let _ = socket.close().await;
            return;
        }
    };

    info!("client connected");

    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<(), NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)
}

/// One player message handed to a background dispatch task.
enum CommandInput {
    Text(String),
    Voice(Vec<f32>),
}

/// Progress from a dispatch task back to the connection loop. `finished`
/// releases the one-in-flight command gate.
struct CommandEvent {
    message: ServerMessage,
    finished: bool,
}

struct ConnCtx {
    input_tx: mpsc::Sender<GameEvent>,
    world_bytes_rx: broadcast::Receiver<Utf8Bytes>,
    world_latest_rx: watch::Receiver<Utf8Bytes>,
    match_state_rx: watch::Receiver<MatchState>,
    router: CommandRouter,
    speech: SpeechClient,
    reply_tx: mpsc::Sender<CommandEvent>,
    reply_rx: mpsc::Receiver<CommandEvent>,
    // Wakes the pending dispatch task, which resolves to Cancelled.
    cancel: Arc<Notify>,
    command_in_flight: bool,
    invalid_json: u32,
}

async fn bootstrap_connection(
    socket: &mut WebSocket,
    state: &Arc<AppState>,
) -> Result<ConnCtx, NetError> {
    // Subscribe before any await so the client misses nothing.
    let world_bytes_rx = state.world_bytes_tx.subscribe();
    let world_latest_rx = state.world_latest_tx.subscribe();
    let match_state_rx = state.match_state_tx.subscribe();

    // Tell the client where the match stands right away.
    // Clone as soon as we borrow; never hold a watch borrow across an await.
    let initial_state = match_state_rx.borrow().clone();
    send_message(socket, &ServerMessage::GameState(initial_state.into())).await?;

    let (reply_tx, reply_rx) = mpsc::channel(REPLY_CHANNEL_CAPACITY);

    Ok(ConnCtx {
        input_tx: state.input_tx.clone(),
        world_bytes_rx,
        world_latest_rx,
        match_state_rx,
        router: state.router.clone(),
        speech: state.speech.clone(),
        reply_tx,
        reply_rx,
        cancel: Arc::new(Notify::new()),
        command_in_flight: false,
        invalid_json: 0,
    })
}

enum LoopControl {
    Continue,
    Disconnect,
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    // Split borrows so `tokio::select!` can hold them concurrently.
    let ConnCtx {
        input_tx,
        world_bytes_rx,
        world_latest_rx,
        match_state_rx,
        router,
        speech,
        reply_tx,
        reply_rx,
        cancel,
        command_in_flight,
        invalid_json,
    } = ctx;

    loop {
        let control: LoopControl = tokio::select! {
            // Incoming message from the client.
            incoming = socket.recv() => {
                let Some(incoming) = incoming else {
                    return Ok(());
                };
                let msg = incoming.map_err(NetError::Ws)?;
                handle_incoming(
                    socket,
                    msg,
                    input_tx,
                    router,
                    speech,
                    reply_tx,
                    cancel,
                    command_in_flight,
                    invalid_json,
                )
                .await?
            }

            // World updates, pre-serialized once for all connections.
            world = world_bytes_rx.recv() => {
                match world {
                    Ok(bytes) => {
                        socket.send(Message::Text(bytes)).await.map_err(NetError::Ws)?;
                        LoopControl::Continue
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "world stream lagged; resyncing from latest snapshot");
                        let latest = world_latest_rx.borrow().clone();
                        if !latest.is_empty() {
                            socket.send(Message::Text(latest)).await.map_err(NetError::Ws)?;
                        }
                        LoopControl::Continue
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(NetError::WorldUpdatesClosed);
                    }
                }
            }

            // Match lifecycle transitions.
            changed = match_state_rx.changed() => {
                changed.map_err(|_| NetError::MatchStateClosed)?;
                let state = match_state_rx.borrow().clone();
                send_message(socket, &ServerMessage::GameState(state.into())).await?;
                LoopControl::Continue
            }

            // Progress from the in-flight dispatch task.
            reply = reply_rx.recv() => {
                // A sender half lives in this ctx, so recv never yields None.
                if let Some(event) = reply {
                    if event.finished {
                        *command_in_flight = false;
                    }
                    send_message(socket, &event.message).await?;
                }
                LoopControl::Continue
            }
        };

        if let LoopControl::Disconnect = control {
            return Ok(());
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_incoming(
    socket: &mut WebSocket,
    msg: Message,
    input_tx: &mpsc::Sender<GameEvent>,
    router: &CommandRouter,
    speech: &SpeechClient,
    reply_tx: &mpsc::Sender<CommandEvent>,
    cancel: &Arc<Notify>,
    command_in_flight: &mut bool,
    invalid_json: &mut u32,
) -> Result<LoopControl, NetError> {
    match msg {
        Message::Text(txt) => match serde_json::from_str::<ClientMessage>(txt.as_str()) {
            Ok(ClientMessage::Command(cmd)) => {
                submit_command(
                    socket,
                    CommandInput::Text(cmd.text),
                    router,
                    speech,
                    reply_tx,
                    cancel,
                    command_in_flight,
                )
                .await
            }
            Ok(ClientMessage::Cancel) => {
                cancel.notify_waiters();
                Ok(LoopControl::Continue)
            }
            Ok(ClientMessage::Restart) => {
                input_tx
                    .send(GameEvent::Restart)
                    .await
                    .map_err(|_| NetError::InputClosed)?;
                Ok(LoopControl::Continue)
            }
            Err(e) => {
                *invalid_json += 1;
                warn!(error = %e, count = *invalid_json, "invalid client message");
                if *invalid_json >= MAX_INVALID_JSON {
                    let _ = socket
                        .send(Message::Close(Some(CloseFrame {
                            code: close_code::POLICY,
                            reason: "too many invalid messages".into(),
                        })))
                        .await;
                    return Ok(LoopControl::Disconnect);
                }
                Ok(LoopControl::Continue)
            }
        },
        // Binary frames carry raw captured voice samples (f32 LE PCM).
        Message::Binary(data) => {
            submit_command(
                socket,
                CommandInput::Voice(audio::samples_from_le_bytes(&data)),
                router,
                speech,
                reply_tx,
                cancel,
                command_in_flight,
            )
            .await
        }
        Message::Close(_) => Ok(LoopControl::Disconnect),
        // Pings/pongs are handled by axum.
        _ => Ok(LoopControl::Continue),
    }
}

/// Hands one player message to a background dispatch task, enforcing the
/// one-in-flight rule per connection. The simulation keeps ticking while the
/// external calls run.
async fn submit_command(
    socket: &mut WebSocket,
    input: CommandInput,
    router: &CommandRouter,
    speech: &SpeechClient,
    reply_tx: &mpsc::Sender<CommandEvent>,
    cancel: &Arc<Notify>,
    command_in_flight: &mut bool,
) -> Result<LoopControl, NetError> {
    if *command_in_flight {
        send_message(
            socket,
            &ServerMessage::CommandReply(CommandReplyDto {
                text: BUSY_REPLY.into(),
            }),
        )
        .await?;
        return Ok(LoopControl::Continue);
    }

    *command_in_flight = true;
    let router = router.clone();
    let speech = speech.clone();
    let reply_tx = reply_tx.clone();
    let cancel = Arc::clone(cancel);

    tokio::spawn(async move {
        match input {
            CommandInput::Text(text) => {
                let outcome = router.dispatch(&text, &cancel).await;
                let _ = reply_tx
                    .send(CommandEvent {
                        message: outcome_message(outcome),
                        finished: true,
                    })
                    .await;
            }
            CommandInput::Voice(samples) => {
                let recognized = tokio::select! {
                    _ = cancel.notified() => {
                        let _ = reply_tx
                            .send(CommandEvent {
                                message: outcome_message(CommandOutcome::Cancelled),
                                finished: true,
                            })
                            .await;
                        return;
                    }
                    result = speech.recognize(&samples) => result,
                };

                match recognized {
                    Ok(text) => {
                        let _ = reply_tx
                            .send(CommandEvent {
                                message: ServerMessage::Transcript(TranscriptDto {
                                    text: text.clone(),
                                }),
                                finished: false,
                            })
                            .await;
                        let outcome = router.dispatch(&text, &cancel).await;
                        let _ = reply_tx
                            .send(CommandEvent {
                                message: outcome_message(outcome),
                                finished: true,
                            })
                            .await;
                    }
                    Err(e) => {
                        warn!(kind = e.kind(), "voice recognition failed");
                        let _ = reply_tx
                            .send(CommandEvent {
                                message: ServerMessage::VoiceError(VoiceErrorDto {
                                    kind: e.kind(),
                                    message: e.user_message().into(),
                                }),
                                finished: true,
                            })
                            .await;
                    }
                }
            }
        }
    });

    Ok(LoopControl::Continue)
}

fn outcome_message(outcome: CommandOutcome) -> ServerMessage {
    let text = match outcome {
        CommandOutcome::Reply(text) => text,
        CommandOutcome::Cancelled => CANCELLED_REPLY.into(),
    };
    ServerMessage::CommandReply(CommandReplyDto { text })
}

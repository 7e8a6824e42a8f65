// End-to-end command flow over the WebSocket, against a stub language model.
//
// All mutating traffic lives in one test; the server (and its world) is
// shared across the whole binary.

mod support;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect() -> Socket {
    let base = support::ensure_server();
    let host = base.strip_prefix("http://").unwrap();
    let (socket, _response) = connect_async(format!("ws://{host}/ws"))
        .await
        .expect("ws connect");
    socket
}

async fn send_command(socket: &mut Socket, text: &str) {
    let payload = serde_json::json!({ "type": "Command", "data": { "text": text } });
    socket
        .send(Message::text(payload.to_string()))
        .await
        .expect("send command");
}

// Reads messages until one of the wanted type arrives; world updates stream
// continuously, so everything else is skipped.
async fn wait_for(socket: &mut Socket, wanted: &str) -> Value {
    for _ in 0..2_000 {
        let msg = socket
            .next()
            .await
            .expect("socket open")
            .expect("read message");
        let Message::Text(txt) = msg else {
            continue;
        };
        let value: Value = serde_json::from_str(txt.as_str()).expect("server sends valid JSON");
        if value["type"] == wanted {
            return value;
        }
    }
    panic!("no {wanted} message within bounds");
}

// Waits for a world update matching a predicate.
async fn wait_for_update(socket: &mut Socket, predicate: impl Fn(&Value) -> bool) -> Value {
    for _ in 0..200 {
        let update = wait_for(socket, "WorldUpdate").await;
        if predicate(&update["data"]) {
            return update;
        }
    }
    panic!("no matching world update within bounds");
}

#[tokio::test]
async fn first_message_is_the_match_state() {
    let mut socket = connect().await;

    let first = wait_for(&mut socket, "GameState").await;
    assert_eq!(first["data"], "MatchRunning");

    // World snapshots follow, carrying all four enemies.
    let update = wait_for(&mut socket, "WorldUpdate").await;
    assert_eq!(update["data"]["enemies"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn commands_resolve_through_the_classifier() {
    let mut socket = connect().await;

    // Shield: first activation succeeds.
    send_command(&mut socket, "raise the shield").await;
    let reply = wait_for(&mut socket, "CommandReply").await;
    assert_eq!(reply["data"]["text"], "Shield activated!");

    // Wait until the activation is visible in the world before retrying.
    wait_for_update(&mut socket, |data| {
        data["craft"]["shield_active"] == Value::Bool(true)
    })
    .await;

    send_command(&mut socket, "shield again please").await;
    let reply = wait_for(&mut socket, "CommandReply").await;
    assert_eq!(reply["data"]["text"], "Shield is already active!");

    // Targeting resolves from raw keywords, no classifier involved.
    send_command(&mut socket, "target the boss").await;
    let reply = wait_for(&mut socket, "CommandReply").await;
    assert_eq!(reply["data"]["text"], "Targeting boss enemy");

    // Movement goes through the direction classifier and lands clamped.
    send_command(&mut socket, "move to the left side").await;
    let reply = wait_for(&mut socket, "CommandReply").await;
    assert_eq!(reply["data"]["text"], "Moving spaceship left");
    wait_for_update(&mut socket, |data| {
        data["craft"]["x"].as_f64() == Some(-140.0)
    })
    .await;

    // Anything else falls through to open chat.
    send_command(&mut socket, "how are you holding up?").await;
    let reply = wait_for(&mut socket, "CommandReply").await;
    assert_eq!(reply["data"]["text"], "All systems nominal.");

    // Restart is acknowledged with a fresh match state.
    let payload = serde_json::json!({ "type": "Restart" });
    socket
        .send(Message::text(payload.to_string()))
        .await
        .expect("send restart");
    let state = wait_for(&mut socket, "GameState").await;
    assert_eq!(state["data"], "MatchRunning");

    // And the craft is back at its spawn position.
    wait_for_update(&mut socket, |data| data["craft"]["x"].as_f64() == Some(0.0)).await;
}

// Command routing: free player text to craft actions via the language model.
//
// The router owns no simulation state. Every resolved branch sends at most
// one event into the world task, and only as its final step, so a cancelled
// dispatch never leaves the craft half-mutated.

use crate::domain::EnemyKind;
use crate::interface_adapters::clients::llm::LlmClient;
use crate::use_cases::types::{CraftAction, CraftStatus, GameEvent, ShieldStatus};
use tokio::sync::{Notify, mpsc, watch};
use tracing::{debug, warn};

/// Reply shown when the free-form chat call itself fails.
pub const FALLBACK_REPLY: &str = "I couldn't process that command. Please try again.";

/// Closed set of special commands the classifier may answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandIntent {
    Shield,
    Power,
    NoCommandMentioned,
}

impl CommandIntent {
    pub const LABELS: [&'static str; 3] = ["Shield", "Power", "NoCommandMentioned"];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Shield" => Some(CommandIntent::Shield),
            "Power" => Some(CommandIntent::Power),
            "NoCommandMentioned" => Some(CommandIntent::NoCommandMentioned),
            _ => None,
        }
    }
}

/// Closed set of movement directions the classifier may answer with. Only
/// left/right translate into craft moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionIntent {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    NoDirection,
}

impl DirectionIntent {
    pub const LABELS: [&'static str; 5] =
        ["MoveLeft", "MoveRight", "MoveUp", "MoveDown", "NoDirection"];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "MoveLeft" => Some(DirectionIntent::MoveLeft),
            "MoveRight" => Some(DirectionIntent::MoveRight),
            "MoveUp" => Some(DirectionIntent::MoveUp),
            "MoveDown" => Some(DirectionIntent::MoveDown),
            "NoDirection" => Some(DirectionIntent::NoDirection),
            _ => None,
        }
    }
}

/// Choice prompt for the special-command classification pass.
pub fn command_prompt(message: &str) -> String {
    choice_prompt(message, "command", "commands", &CommandIntent::LABELS)
}

/// Choice prompt for the movement classification pass.
pub fn direction_prompt(message: &str) -> String {
    choice_prompt(message, "direction", "direction", &DirectionIntent::LABELS)
}

fn choice_prompt(message: &str, subject: &str, focus: &str, labels: &[&'static str]) -> String {
    let mut prompt = format!(
        "From the input, which {subject} is mentioned? Choose from the following options:\n\n"
    );
    prompt.push_str(&format!("Input:{message}\n\n"));
    prompt.push_str("Choices:\n");
    for label in labels {
        prompt.push_str(&format!("- {label}\n"));
    }
    prompt.push_str(&format!(
        "\nAnswer directly with the choice, focusing only on {focus}"
    ));
    prompt
}

/// Scans raw text for a targeting request: a targeting keyword plus an enemy
/// tier keyword. Without both, the message falls through to later stages.
pub fn targeting_request(message: &str) -> Option<EnemyKind> {
    let lower = message.to_lowercase();
    if !lower.contains("target") && !lower.contains("aim") {
        return None;
    }
    EnemyKind::from_keyword(&lower)
}

/// Result of one fully processed player message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Player-facing reply text (confirmation, status, or chat response).
    Reply(String),
    /// The dispatch was cancelled before it resolved; nothing was sent.
    Cancelled,
}

#[derive(Clone)]
pub struct CommandRouter {
    llm: LlmClient,
    input_tx: mpsc::Sender<GameEvent>,
    craft_status_rx: watch::Receiver<CraftStatus>,
    move_step: f32,
}

impl CommandRouter {
    pub fn new(
        llm: LlmClient,
        input_tx: mpsc::Sender<GameEvent>,
        craft_status_rx: watch::Receiver<CraftStatus>,
        move_step: f32,
    ) -> Self {
        Self {
            llm,
            input_tx,
            craft_status_rx,
            move_step,
        }
    }

    /// Resolves one player message end to end, racing the cancel token.
    pub async fn dispatch(&self, message: &str, cancel: &Notify) -> CommandOutcome {
        tokio::select! {
            _ = cancel.notified() => {
                debug!("command dispatch cancelled");
                CommandOutcome::Cancelled
            }
            outcome = self.resolve(message) => outcome,
        }
    }

    async fn resolve(&self, message: &str) -> CommandOutcome {
        // Special commands take precedence over targeting, movement and chat.
        match self.classify_command(message).await {
            Some(CommandIntent::Shield) => {
                return CommandOutcome::Reply(self.handle_shield().await);
            }
            Some(CommandIntent::Power) => {
                self.send(CraftAction::FirePowerBomb).await;
                return CommandOutcome::Reply("Firing power bomb!".into());
            }
            Some(CommandIntent::NoCommandMentioned) | None => {}
        }

        if let Some(kind) = targeting_request(message) {
            self.send(CraftAction::SetTarget { kind: Some(kind) }).await;
            return CommandOutcome::Reply(format!("Targeting {} enemy", kind.name()));
        }

        match self.classify_direction(message).await {
            Some(DirectionIntent::MoveLeft) => {
                self.send(CraftAction::Move {
                    dx: -self.move_step,
                })
                .await;
                return CommandOutcome::Reply("Moving spaceship left".into());
            }
            Some(DirectionIntent::MoveRight) => {
                self.send(CraftAction::Move { dx: self.move_step }).await;
                return CommandOutcome::Reply("Moving spaceship right".into());
            }
            _ => {}
        }

        // Open-ended chat is the final fallback; its reply goes out verbatim.
        match self.llm.chat(message).await {
            Ok(reply) => CommandOutcome::Reply(reply),
            Err(e) => {
                warn!(error = ?e, "chat request failed");
                CommandOutcome::Reply(FALLBACK_REPLY.into())
            }
        }
    }

    async fn handle_shield(&self) -> String {
        // Copy out of the watch borrow before any await.
        let shield = self.craft_status_rx.borrow().shield;
        match shield {
            ShieldStatus::Ready => {
                self.send(CraftAction::ActivateShield).await;
                "Shield activated!".into()
            }
            ShieldStatus::Active => "Shield is already active!".into(),
            ShieldStatus::Cooling => "Shield is on cooldown!".into(),
        }
    }

    async fn classify_command(&self, message: &str) -> Option<CommandIntent> {
        match self
            .llm
            .classify(&command_prompt(message), &CommandIntent::LABELS)
            .await
        {
            Ok(Some(label)) => CommandIntent::from_label(label),
            Ok(None) => None,
            Err(e) => {
                // A failed classifier call counts as "no match".
                warn!(error = ?e, "command classification failed");
                None
            }
        }
    }

    async fn classify_direction(&self, message: &str) -> Option<DirectionIntent> {
        match self
            .llm
            .classify(&direction_prompt(message), &DirectionIntent::LABELS)
            .await
        {
            Ok(Some(label)) => DirectionIntent::from_label(label),
            Ok(None) => None,
            Err(e) => {
                warn!(error = ?e, "direction classification failed");
                None
            }
        }
    }

    async fn send(&self, action: CraftAction) {
        if self.input_tx.send(GameEvent::Craft(action)).await.is_err() {
            warn!("world task gone; dropping command action");
        }
    }
}

use crate::domain::state::{EnemySnapshot, ProjectileSnapshot, World};
use crate::domain::systems::enemies::ContactOutcome;
use crate::domain::systems::{craft, enemies, projectiles};
use crate::domain::tuning::{CraftTuning, EnemyTuning, ProjectileTuning};
use crate::use_cases::types::{CraftAction, CraftStatus, GameEvent, MatchState, WorldUpdate};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tracing::{debug, info};

/// Everything the world task needs to build and drive a match.
#[derive(Debug, Clone)]
pub struct WorldSettings {
    /// Fixed tick interval for the game loop.
    pub tick_interval: Duration,
    pub craft: CraftTuning,
    pub enemies: EnemyTuning,
    pub projectiles: ProjectileTuning,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(1000 / 60),
            craft: CraftTuning::default(),
            enemies: EnemyTuning::default(),
            projectiles: ProjectileTuning::default(),
        }
    }
}

/// The authoritative game loop. Sole writer of simulation state.
///
/// Events are drained at the top of each tick; within a tick all movement
/// settles before any collision is evaluated. Once the match ends the world
/// is frozen until a Restart event rebuilds it.
pub async fn world_task(
    mut input_rx: mpsc::Receiver<GameEvent>,
    world_tx: broadcast::Sender<WorldUpdate>,
    craft_status_tx: watch::Sender<CraftStatus>,
    match_state_tx: watch::Sender<MatchState>,
    settings: WorldSettings,
    shutdown: Arc<Notify>,
) {
    let mut tick: u64 = 0;
    let mut world = World::spawn(&settings.enemies, &settings.craft);
    let mut match_state = MatchState::MatchRunning;
    // send_replace keeps the stored value fresh even with no subscriber yet.
    let _ = match_state_tx.send_replace(MatchState::MatchRunning);

    // Drive the fixed-step game loop at the configured tick rate.
    let mut interval = tokio::time::interval(settings.tick_interval);

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                // Exit cleanly when the server shuts the match down.
                break;
            }
            _ = interval.tick() => {}
        }

        while let Ok(ev) = input_rx.try_recv() {
            match ev {
                GameEvent::Craft(action) => {
                    apply_craft_action(&mut world, action, &match_state, &settings);
                }
                GameEvent::Restart => {
                    info!("restarting match");
                    world = World::spawn(&settings.enemies, &settings.craft);
                    match_state = MatchState::MatchRunning;
                    let _ = match_state_tx.send_replace(MatchState::MatchRunning);
                }
            }
        }

        if match_state == MatchState::MatchRunning {
            let dt = settings.tick_interval.as_secs_f32();

            // Movement first; collisions see settled positions.
            enemies::tick_enemies(&mut world.enemies, world.craft.x, world.craft.y, dt);
            craft::tick_craft(&mut world, dt, &settings.craft, &settings.projectiles);
            projectiles::tick_projectiles(&mut world, dt);

            projectiles::resolve_hits(&mut world, &settings.projectiles, &settings.enemies);
            let contact =
                enemies::resolve_craft_contact(&mut world, &settings.enemies, &settings.craft);
            if contact == ContactOutcome::MatchOver {
                // Frozen from here on; in-flight shots must not outlive the match.
                world.projectiles.clear();
                match_state = MatchState::MatchEnded;
                let _ = match_state_tx.send_replace(MatchState::MatchEnded);
                info!("match over");
            }
        }

        tick += 1;
        let _ = craft_status_tx.send_replace(CraftStatus {
            shield: world.craft.shield.into(),
            target: world.craft.target,
        });
        let _ = world_tx.send(snapshot(tick, &world));
    }
}

fn apply_craft_action(
    world: &mut World,
    action: CraftAction,
    match_state: &MatchState,
    settings: &WorldSettings,
) {
    if *match_state == MatchState::MatchEnded {
        // Time is frozen; only Restart gets the player out of this.
        debug!(?action, "dropping craft action after match end");
        return;
    }

    match action {
        CraftAction::ActivateShield => {
            if world.craft.activate_shield(&settings.craft) {
                info!("shield activated");
            } else {
                debug!("shield activation ignored; not ready");
            }
        }
        CraftAction::FirePowerBomb => {
            info!("power bomb fired");
            craft::fire_projectile(world, true, &settings.craft, &settings.projectiles);
        }
        CraftAction::SetTarget { kind } => {
            info!(?kind, "target selected");
            world.craft.set_target(kind);
        }
        CraftAction::Move { dx } => {
            world.craft.move_by(dx, &settings.craft);
        }
    }
}

fn snapshot(tick: u64, world: &World) -> WorldUpdate {
    WorldUpdate {
        tick,
        craft: (&world.craft).into(),
        enemies: world
            .enemies
            .iter()
            .filter(|e| e.alive)
            .map(EnemySnapshot::from)
            .collect(),
        projectiles: world
            .projectiles
            .iter()
            .map(ProjectileSnapshot::from)
            .collect(),
    }
}

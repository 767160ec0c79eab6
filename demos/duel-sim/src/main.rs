//! Scripted two-player duel against an in-memory console host.
//!
//! Run with `RUST_LOG=debug cargo run -p duel-sim` to see the scheduler.

use std::collections::HashMap;
use std::sync::Arc;

use duelyard::config::{parse_arena_data, parse_shared_config};
use duelyard::prelude::*;

const ARENA: &str = r#"{
    "level": "duel1",
    "slots": 2,
    "spawns": ["0,64,0", "12,64,0"],
    "enabled": true,
    "joinsign": ["100,65,100", "lobby"]
}"#;

const SHARED: &str = r#"{
    "hunger": false,
    "kits": {
        "knight": { "chestplate": [307, 0, 1], "0": [267, 0, 1], "1": [322, 0, 2] },
        "archer": { "helmet": [298, 0, 1], "0": [261, 0, 1], "1": [262, 0, 32] }
    }
}"#;

// ---------------------------------------------------------------------------
// Console host
// ---------------------------------------------------------------------------

/// Prints every side effect instead of touching a game world.
struct ConsoleHost {
    spawn: Location,
    tiles: HashMap<(String, (i64, i64, i64)), Tile>,
}

impl ConsoleHost {
    fn new() -> Self {
        let mut tiles = HashMap::new();
        tiles.insert(("lobby".to_string(), (100, 65, 100)), Tile::Sign);
        Self {
            spawn: Location::new("world", Position::new(0.0, 70.0, 0.0)),
            tiles,
        }
    }
}

impl Host for ConsoleHost {
    fn is_world_generated(&self, world: &str) -> bool {
        matches!(world, "duel1" | "lobby" | "world")
    }

    fn is_world_loaded(&self, world: &str) -> bool {
        world != "duel1"
    }

    fn load_world(&mut self, world: &str) -> bool {
        println!("[host] loading level {world}");
        true
    }

    fn teleport(&mut self, player: &PlayerHandle, to: &Location) {
        println!("[host] {} -> {to}", player.name);
    }

    fn clear_inventory(&mut self, _player: &PlayerHandle) {}

    fn equip(&mut self, player: &PlayerHandle, slot: EquipSlot, item: Item) {
        println!("[host] {} gets {item:?} in {slot:?}", player.name);
    }

    fn set_health(&mut self, _player: &PlayerHandle, _health: f32) {}

    fn set_food(&mut self, _player: &PlayerHandle, _food: f32) {}

    fn set_game_mode(&mut self, _player: &PlayerHandle, _mode: GameMode) {}

    fn send_message(&mut self, player: &PlayerHandle, text: &str) {
        println!("[chat -> {}] {text}", player.name);
    }

    fn send_tip(&mut self, player: &PlayerHandle, text: &str) {
        println!("[tip -> {}] {text}", player.name);
    }

    fn send_popup(&mut self, player: &PlayerHandle, text: &str) {
        println!("[popup -> {}] {text}", player.name);
    }

    fn send_title(&mut self, player: &PlayerHandle, title: &str, subtitle: &str) {
        println!("[title -> {}] {title} {subtitle}", player.name);
    }

    fn drop_item(&mut self, at: &Location, item: Item) {
        println!("[host] dropped {item:?} at {at}");
    }

    fn tile_at(&self, world: &str, position: Position) -> Option<Tile> {
        self.tiles
            .get(&(world.to_string(), position.block_coords()))
            .copied()
    }

    fn broadcast_server_message(&mut self, text: &str) {
        println!("[server] {text}");
    }

    fn is_online(&self, _player: &PlayerHandle) -> bool {
        true
    }

    fn default_spawn(&self) -> Location {
        self.spawn.clone()
    }
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

fn click_sign(player: &PlayerHandle) -> HostEvent {
    HostEvent::Interact(InteractEvent {
        player: player.clone(),
        block: Block::new(
            BlockKind::Sign,
            Location::new("lobby", Position::new(100.0, 65.0, 100.0)),
        ),
        cancelled: false,
    })
}

async fn next_event(
    events: &mut tokio::sync::broadcast::Receiver<ArenaEvent>,
) -> Result<ArenaEvent, Box<dyn std::error::Error>> {
    let event = events.recv().await?;
    println!("[event] {}", serde_json::to_string(&event)?);
    Ok(event)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    duelyard::init_tracing("info");

    let mut host = ConsoleHost::new();
    let shared = Arc::new(parse_shared_config(SHARED)?);
    let arena = Arena::new("duel1", parse_arena_data(ARENA)?, shared, &mut host);

    // Ten firings per second so the demo finishes quickly.
    let config = RuntimeConfig {
        driver: DriverConfig::with_period(20, 2),
        ..RuntimeConfig::default()
    };
    let runtime = ArenaRuntime::spawn(arena, host, config);
    let mut events = runtime.subscribe();

    let alice = PlayerHandle::new(1, "Alice");
    let bob = PlayerHandle::new(2, "Bob");
    runtime.dispatch(click_sign(&alice)).await?;
    runtime.dispatch(click_sign(&bob)).await?;
    // A second click is turned away.
    runtime.dispatch(click_sign(&bob)).await?;

    // Wandering off the spawn pad gets corrected.
    runtime
        .dispatch(HostEvent::Move(MoveEvent {
            player: alice.clone(),
            from: Position::new(0.0, 64.0, 0.0),
            to: Position::new(4.0, 64.0, 1.0),
        }))
        .await?;

    loop {
        if let ArenaEvent::MatchStarted { .. } = next_event(&mut events).await? {
            break;
        }
    }

    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    runtime
        .dispatch(HostEvent::Death(DeathEvent {
            player: bob.clone(),
            location: Location::new("duel1", Position::new(6.0, 64.0, 0.0)),
            drops: vec![Item::single(267)],
            death_message: "Bob was slain by Alice".into(),
        }))
        .await?;

    loop {
        if let ArenaEvent::Restarted { .. } = next_event(&mut events).await? {
            break;
        }
    }

    let info = runtime.info().await?;
    tracing::info!(
        arena = %info.name,
        phase = %info.phase,
        players = info.player_count,
        "simulation finished"
    );
    runtime.shutdown().await?;
    Ok(())
}

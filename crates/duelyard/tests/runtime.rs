//! Integration tests for the arena runtime task.
//!
//! Uses Tokio's paused clock: the driver's one-second sleeps resolve as
//! soon as every task is idle, so a full match runs instantly.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use duelyard::prelude::*;
use duelyard::{ArenaError, SetupError};

// =========================================================================
// Helpers
// =========================================================================

#[derive(Default)]
struct Log {
    messages: Vec<(PlayerId, String)>,
    titles: Vec<(PlayerId, String)>,
    teleports: Vec<(PlayerId, Location)>,
}

/// A `Send` host recording chat and teleports into a shared log.
#[derive(Clone, Default)]
struct SharedHost {
    log: Arc<Mutex<Log>>,
}

impl SharedHost {
    fn messages_to(&self, player: u64) -> Vec<String> {
        let log = self.log.lock().unwrap();
        log.messages
            .iter()
            .filter(|(id, _)| *id == PlayerId(player))
            .map(|(_, text)| text.clone())
            .collect()
    }

    fn titles_to(&self, player: u64) -> Vec<String> {
        let log = self.log.lock().unwrap();
        log.titles
            .iter()
            .filter(|(id, _)| *id == PlayerId(player))
            .map(|(_, text)| text.clone())
            .collect()
    }
}

impl Host for SharedHost {
    fn is_world_generated(&self, world: &str) -> bool {
        world == "duel1"
    }
    fn is_world_loaded(&self, _world: &str) -> bool {
        true
    }
    fn load_world(&mut self, _world: &str) -> bool {
        true
    }
    fn teleport(&mut self, player: &PlayerHandle, to: &Location) {
        self.log.lock().unwrap().teleports.push((player.id, to.clone()));
    }
    fn clear_inventory(&mut self, _player: &PlayerHandle) {}
    fn equip(&mut self, _player: &PlayerHandle, _slot: EquipSlot, _item: Item) {}
    fn set_health(&mut self, _player: &PlayerHandle, _health: f32) {}
    fn set_food(&mut self, _player: &PlayerHandle, _food: f32) {}
    fn set_game_mode(&mut self, _player: &PlayerHandle, _mode: GameMode) {}
    fn send_message(&mut self, player: &PlayerHandle, text: &str) {
        self.log.lock().unwrap().messages.push((player.id, text.to_string()));
    }
    fn send_tip(&mut self, _player: &PlayerHandle, _text: &str) {}
    fn send_popup(&mut self, _player: &PlayerHandle, _text: &str) {}
    fn send_title(&mut self, player: &PlayerHandle, title: &str, _subtitle: &str) {
        self.log.lock().unwrap().titles.push((player.id, title.to_string()));
    }
    fn drop_item(&mut self, _at: &Location, _item: Item) {}
    fn tile_at(&self, _world: &str, _position: Position) -> Option<Tile> {
        None
    }
    fn broadcast_server_message(&mut self, _text: &str) {}
    fn is_online(&self, _player: &PlayerHandle) -> bool {
        true
    }
    fn default_spawn(&self) -> Location {
        Location::new("world", Position::new(0.0, 70.0, 0.0))
    }
}

fn player(id: u64) -> PlayerHandle {
    PlayerHandle::new(id, format!("player{id}"))
}

fn two_slot_data() -> ArenaData {
    ArenaData {
        level: Some("duel1".into()),
        slots: 2,
        spawns: vec!["0,64,0".into(), "10,64,0".into()],
        enabled: true,
        joinsign: vec!["100,65,100".into(), "lobby".into()],
    }
}

fn spawn_runtime(data: ArenaData) -> (ArenaRuntime, SharedHost) {
    let mut host = SharedHost::default();
    let shared = Arc::new(SharedConfig::default());
    let arena = Arena::new("duel1", data, shared, &mut host);
    let config = RuntimeConfig {
        driver: DriverConfig {
            initial_jitter_us: 0,
            ..DriverConfig::default()
        },
        ..RuntimeConfig::default()
    };
    let runtime = ArenaRuntime::spawn(arena, host.clone(), config);
    (runtime, host)
}

fn death_of(id: u64) -> HostEvent {
    HostEvent::Death(DeathEvent {
        player: player(id),
        location: Location::new("duel1", Position::new(2.0, 64.0, 0.0)),
        drops: vec![Item::single(267)],
        death_message: format!("player{id} was slain"),
    })
}

// =========================================================================
// Match flow
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_full_match_through_runtime() {
    let (runtime, host) = spawn_runtime(two_slot_data());
    let mut events = runtime.subscribe();
    let started_at = tokio::time::Instant::now();

    assert_eq!(runtime.join(player(1)).await.unwrap().0, 1);
    assert_eq!(runtime.join(player(2)).await.unwrap().0, 2);
    assert!(matches!(events.recv().await.unwrap(), ArenaEvent::Equipped { .. }));
    assert!(matches!(events.recv().await.unwrap(), ArenaEvent::Equipped { .. }));

    let started = events.recv().await.unwrap();
    assert!(matches!(started, ArenaEvent::MatchStarted { ref players, .. } if players.len() == 2));
    assert!(started_at.elapsed() >= Duration::from_secs(10));
    assert_eq!(runtime.info().await.unwrap().phase, Phase::Game);

    let death = runtime.dispatch(death_of(1)).await.unwrap();
    let HostEvent::Death(death) = death else {
        panic!("dispatch changed the event kind");
    };
    assert!(death.drops.is_empty());
    assert!(death.death_message.is_empty());

    let won = events.recv().await.unwrap();
    assert_eq!(
        won,
        ArenaEvent::Won {
            arena: "duel1".into(),
            player: player(2),
        }
    );
    assert_eq!(host.titles_to(2).last().map(String::as_str), Some("YOU WON!"));

    let restarted = events.recv().await.unwrap();
    assert_eq!(restarted, ArenaEvent::Restarted { arena: "duel1".into() });

    let info = runtime.info().await.unwrap();
    assert_eq!(info.phase, Phase::Lobby);
    assert_eq!(info.player_count, 0);
}

#[tokio::test(start_paused = true)]
async fn test_lone_player_waits_in_lobby() {
    let (runtime, _host) = spawn_runtime(two_slot_data());
    runtime.join(player(1)).await.unwrap();

    tokio::time::sleep(Duration::from_secs(60)).await;

    let info = runtime.info().await.unwrap();
    assert_eq!(info.phase, Phase::Lobby);
    assert_eq!(info.player_count, 1);
}

// =========================================================================
// Commands
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_duplicate_join_is_rejected() {
    let (runtime, host) = spawn_runtime(two_slot_data());
    runtime.join(player(1)).await.unwrap();

    let err = runtime.join(player(1)).await.unwrap_err();
    assert_eq!(err.join_rejection(), Some(JoinRejection::AlreadyQueued));
    assert_eq!(
        host.messages_to(1).last().map(String::as_str),
        Some("> You are already in queue!")
    );
    assert_eq!(runtime.info().await.unwrap().player_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_leave_reports_membership() {
    let (runtime, host) = spawn_runtime(two_slot_data());
    runtime.join(player(1)).await.unwrap();

    assert!(runtime.leave(player(1), "Bye!").await.unwrap());
    assert!(!runtime.leave(player(1), "Bye!").await.unwrap());
    assert_eq!(host.messages_to(1).last().map(String::as_str), Some("> Bye!"));
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_cancels_lobby_hunger() {
    let (runtime, _host) = spawn_runtime(two_slot_data());
    runtime.join(player(1)).await.unwrap();

    let event = HostEvent::Exhaust(ExhaustEvent {
        player: player(1),
        cancelled: false,
    });
    let event = runtime.dispatch(event).await.unwrap();
    assert!(matches!(event, HostEvent::Exhaust(ExhaustEvent { cancelled: true, .. })));
}

#[tokio::test(start_paused = true)]
async fn test_enable_reports_setup_errors() {
    let mut broken = two_slot_data();
    broken.spawns.truncate(1);
    let (runtime, host) = spawn_runtime(broken.clone());
    assert!(runtime.info().await.unwrap().setup);

    let err = runtime.enable(Some(broken)).await.unwrap_err();
    assert!(matches!(
        err,
        DuelyardError::Arena(ArenaError::Setup(SetupError::SpawnCountMismatch { slots: 2, spawns: 1 }))
    ));

    runtime.join(player(1)).await.unwrap_err();
    assert_eq!(host.messages_to(1), vec!["> Arena is under setup!"]);

    runtime.enable(Some(two_slot_data())).await.unwrap();
    let info = runtime.info().await.unwrap();
    assert!(!info.setup);
    assert_eq!(info.capacity, 2);
    assert_eq!(runtime.join(player(1)).await.unwrap().0, 1);
}

#[tokio::test(start_paused = true)]
async fn test_enable_with_new_data_sends_players_home() {
    let (runtime, host) = spawn_runtime(two_slot_data());
    runtime.join(player(1)).await.unwrap();

    runtime.enable(Some(two_slot_data())).await.unwrap();

    let log = host.log.lock().unwrap();
    let last = log.teleports.last().unwrap();
    assert_eq!(last.0, PlayerId(1));
    assert_eq!(last.1.world, "world");
    drop(log);
    assert_eq!(runtime.info().await.unwrap().player_count, 0);
}

#[tokio::test(start_paused = true)]
async fn test_enable_during_match_sends_players_home() {
    let (runtime, host) = spawn_runtime(two_slot_data());
    let mut events = runtime.subscribe();
    runtime.join(player(1)).await.unwrap();
    runtime.join(player(2)).await.unwrap();
    loop {
        if let ArenaEvent::MatchStarted { .. } = events.recv().await.unwrap() {
            break;
        }
    }

    runtime.enable(None).await.unwrap();

    let info = runtime.info().await.unwrap();
    assert_eq!(info.phase, Phase::Lobby);
    assert_eq!(info.player_count, 0);
    let log = host.log.lock().unwrap();
    for id in [1, 2] {
        let last = log
            .teleports
            .iter()
            .rev()
            .find(|(player, _)| *player == PlayerId(id))
            .unwrap();
        assert_eq!(last.1.world, "world");
    }
}

#[tokio::test(start_paused = true)]
async fn test_commands_fail_after_shutdown() {
    let (runtime, _host) = spawn_runtime(two_slot_data());
    runtime.shutdown().await.unwrap();

    let err = runtime.info().await.unwrap_err();
    assert!(matches!(err, DuelyardError::Unavailable(ref name) if name == "duel1"));
    assert_eq!(runtime.name(), "duel1");
}

//! Shared fixtures: a recording in-memory host and arena data builders.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use duelyard_arena::{Arena, ArenaData, Kit, KitTable, SharedConfig};
use duelyard_protocol::{
    ArmorPiece, EquipSlot, GameMode, Item, Location, PlayerHandle, PlayerId, Position, Tile,
};

// =========================================================================
// Recording host
// =========================================================================

/// Every side effect the arena asked the host for.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    LoadWorld(String),
    Teleport(PlayerId, Location),
    ClearInventory(PlayerId),
    Equip(PlayerId, EquipSlot, Item),
    Health(PlayerId, f32),
    Food(PlayerId, f32),
    Mode(PlayerId, GameMode),
    Message(PlayerId, String),
    Tip(PlayerId, String),
    Popup(PlayerId, String),
    Title(PlayerId, String, String),
    Drop(Location, Item),
    ServerMessage(String),
}

pub struct RecordingHost {
    pub generated: HashSet<String>,
    pub loaded: HashSet<String>,
    pub offline: HashSet<PlayerId>,
    pub tiles: HashMap<(String, (i64, i64, i64)), Tile>,
    pub calls: Vec<Call>,
}

impl RecordingHost {
    pub fn new() -> Self {
        let mut host = Self {
            generated: ["duel1", "lobby", "world"].iter().map(|s| s.to_string()).collect(),
            loaded: ["lobby", "world"].iter().map(|s| s.to_string()).collect(),
            offline: HashSet::new(),
            tiles: HashMap::new(),
            calls: Vec::new(),
        };
        host.place_tile(&sign_location(), Tile::Sign);
        host
    }

    pub fn place_tile(&mut self, at: &Location, tile: Tile) {
        self.tiles
            .insert((at.world.clone(), at.position.block_coords()), tile);
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn messages_to(&self, player: u64) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Message(id, text) if *id == PlayerId(player) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn tips_to(&self, player: u64) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Tip(id, text) if *id == PlayerId(player) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn titles_to(&self, player: u64) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Title(id, text, _) if *id == PlayerId(player) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn teleports_of(&self, player: u64) -> Vec<Location> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Teleport(id, to) if *id == PlayerId(player) => Some(to.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn equips_of(&self, player: u64) -> Vec<(EquipSlot, Item)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Equip(id, slot, item) if *id == PlayerId(player) => Some((*slot, *item)),
                _ => None,
            })
            .collect()
    }

    pub fn server_messages(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::ServerMessage(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl duelyard_arena::Host for RecordingHost {
    fn is_world_generated(&self, world: &str) -> bool {
        self.generated.contains(world)
    }

    fn is_world_loaded(&self, world: &str) -> bool {
        self.loaded.contains(world)
    }

    fn load_world(&mut self, world: &str) -> bool {
        self.calls.push(Call::LoadWorld(world.to_string()));
        if self.generated.contains(world) {
            self.loaded.insert(world.to_string());
            true
        } else {
            false
        }
    }

    fn teleport(&mut self, player: &PlayerHandle, to: &Location) {
        self.calls.push(Call::Teleport(player.id, to.clone()));
    }

    fn clear_inventory(&mut self, player: &PlayerHandle) {
        self.calls.push(Call::ClearInventory(player.id));
    }

    fn equip(&mut self, player: &PlayerHandle, slot: EquipSlot, item: Item) {
        self.calls.push(Call::Equip(player.id, slot, item));
    }

    fn set_health(&mut self, player: &PlayerHandle, health: f32) {
        self.calls.push(Call::Health(player.id, health));
    }

    fn set_food(&mut self, player: &PlayerHandle, food: f32) {
        self.calls.push(Call::Food(player.id, food));
    }

    fn set_game_mode(&mut self, player: &PlayerHandle, mode: GameMode) {
        self.calls.push(Call::Mode(player.id, mode));
    }

    fn send_message(&mut self, player: &PlayerHandle, text: &str) {
        self.calls.push(Call::Message(player.id, text.to_string()));
    }

    fn send_tip(&mut self, player: &PlayerHandle, text: &str) {
        self.calls.push(Call::Tip(player.id, text.to_string()));
    }

    fn send_popup(&mut self, player: &PlayerHandle, text: &str) {
        self.calls.push(Call::Popup(player.id, text.to_string()));
    }

    fn send_title(&mut self, player: &PlayerHandle, title: &str, subtitle: &str) {
        self.calls
            .push(Call::Title(player.id, title.to_string(), subtitle.to_string()));
    }

    fn drop_item(&mut self, at: &Location, item: Item) {
        self.calls.push(Call::Drop(at.clone(), item));
    }

    fn tile_at(&self, world: &str, position: Position) -> Option<Tile> {
        self.tiles
            .get(&(world.to_string(), position.block_coords()))
            .copied()
    }

    fn broadcast_server_message(&mut self, text: &str) {
        self.calls.push(Call::ServerMessage(text.to_string()));
    }

    fn is_online(&self, player: &PlayerHandle) -> bool {
        !self.offline.contains(&player.id)
    }

    fn default_spawn(&self) -> Location {
        default_spawn()
    }
}

// =========================================================================
// Fixtures
// =========================================================================

pub fn player(id: u64) -> PlayerHandle {
    PlayerHandle::new(id, format!("player{id}"))
}

pub fn default_spawn() -> Location {
    Location::new("world", Position::new(0.0, 70.0, 0.0))
}

pub fn sign_location() -> Location {
    Location::new("lobby", Position::new(100.0, 65.0, 100.0))
}

/// Spawn of slot `n` (1-based) in the fixture data.
pub fn spawn_of(slot: usize) -> Location {
    Location::new("duel1", Position::new(10.0 * (slot - 1) as f64, 64.0, 0.0))
}

/// Valid data with `slots` slots in level `duel1`.
pub fn arena_data(slots: usize) -> ArenaData {
    ArenaData {
        level: Some("duel1".to_string()),
        slots: slots as i64,
        spawns: (1..=slots).map(|n| spawn_of(n).position.to_string()).collect(),
        enabled: true,
        joinsign: vec![sign_location().position.to_string(), "lobby".to_string()],
    }
}

pub fn knight_kit() -> Kit {
    let mut kit = Kit::default();
    kit.armor.insert(ArmorPiece::Chestplate, Item::single(307));
    kit.inventory.insert(0, Item::single(267));
    kit.inventory.insert(1, Item::new(322, 3));
    kit
}

/// Shared config with a single kit, so kit selection is deterministic.
pub fn shared_with_knight() -> Arc<SharedConfig> {
    let mut kits = KitTable::new();
    kits.insert("knight", knight_kit());
    Arc::new(SharedConfig { hunger: false, kits })
}

pub fn shared_without_kits() -> Arc<SharedConfig> {
    Arc::new(SharedConfig::default())
}

pub fn new_arena(host: &mut RecordingHost, slots: usize) -> Arena {
    Arena::new("duel1", arena_data(slots), shared_with_knight(), host)
}

/// Arena with `count` players joined (ids 1..=count).
pub fn arena_with_players(host: &mut RecordingHost, slots: usize, count: u64) -> Arena {
    let mut arena = new_arena(host, slots);
    for id in 1..=count {
        arena.join(host, &player(id)).expect("fixture join");
    }
    arena
}

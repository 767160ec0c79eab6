//! The `Host` trait: everything the arena needs from the game engine.
//!
//! The arena never touches worlds, inventories or chat directly. It asks
//! the host through this trait, which keeps the lifecycle logic testable
//! with an in-memory host and portable across engines.

use duelyard_protocol::{
    EquipSlot, GameMode, Item, Location, MessageKind, PlayerHandle, Position, Tile,
};

/// Capabilities the host engine provides to an arena.
///
/// All calls are synchronous and run on the caller's thread. Methods that
/// act on a player should quietly do nothing if the player has gone
/// offline in the meantime.
pub trait Host {
    /// `true` if the level exists on disk (it may not be loaded).
    fn is_world_generated(&self, world: &str) -> bool;

    /// `true` if the level is currently loaded.
    fn is_world_loaded(&self, world: &str) -> bool;

    /// Loads a level. Returns `false` if it could not be loaded.
    fn load_world(&mut self, world: &str) -> bool;

    /// Moves a player to `to`, switching worlds if needed.
    fn teleport(&mut self, player: &PlayerHandle, to: &Location);

    /// Empties the main, armor and cursor inventories.
    fn clear_inventory(&mut self, player: &PlayerHandle);

    /// Puts `item` into `slot`.
    fn equip(&mut self, player: &PlayerHandle, slot: EquipSlot, item: Item);

    fn set_health(&mut self, player: &PlayerHandle, health: f32);

    fn set_food(&mut self, player: &PlayerHandle, food: f32);

    fn set_game_mode(&mut self, player: &PlayerHandle, mode: GameMode);

    fn send_message(&mut self, player: &PlayerHandle, text: &str);

    fn send_tip(&mut self, player: &PlayerHandle, text: &str);

    fn send_popup(&mut self, player: &PlayerHandle, text: &str);

    fn send_title(&mut self, player: &PlayerHandle, title: &str, subtitle: &str);

    /// Drops `item` into the world at `at`.
    fn drop_item(&mut self, at: &Location, item: Item);

    /// The block entity at a position, if any.
    fn tile_at(&self, world: &str, position: Position) -> Option<Tile>;

    /// Sends a chat line to everyone on the server.
    fn broadcast_server_message(&mut self, text: &str);

    /// `true` while the player is connected.
    fn is_online(&self, player: &PlayerHandle) -> bool;

    /// Spawn point of the host's default world.
    fn default_spawn(&self) -> Location;

    /// Sends `text` on the channel selected by `kind`.
    fn send(&mut self, player: &PlayerHandle, kind: MessageKind, text: &str, subtitle: &str) {
        match kind {
            MessageKind::Message => self.send_message(player, text),
            MessageKind::Tip => self.send_tip(player, text),
            MessageKind::Popup => self.send_popup(player, text),
            MessageKind::Title => self.send_title(player, text, subtitle),
        }
    }
}

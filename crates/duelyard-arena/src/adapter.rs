//! Translation of host engine events into arena calls.
//!
//! The host calls one handler per event type, synchronously. Handlers only
//! act for participants (or for clicks on the arena's join sign). Any
//! other event is left exactly as the host sent it.

use duelyard_protocol::{Block, BlockKind, Item, Location, PlayerHandle, Position};

use crate::{Arena, Death, Host, JoinRejection, Phase};

/// Sent to a player who leaves by switching worlds.
pub const WORLD_CHANGE_NOTICE: &str = "You have left the arena.";

/// A player moved.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveEvent {
    pub player: PlayerHandle,
    pub from: Position,
    pub to: Position,
}

/// A player's hunger is about to drop.
#[derive(Debug, Clone, PartialEq)]
pub struct ExhaustEvent {
    pub player: PlayerHandle,
    /// Set to suppress the hunger change.
    pub cancelled: bool,
}

/// A player clicked a block.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractEvent {
    pub player: PlayerHandle,
    pub block: Block,
    /// Set to suppress the engine's default interaction.
    pub cancelled: bool,
}

/// A player died.
#[derive(Debug, Clone, PartialEq)]
pub struct DeathEvent {
    pub player: PlayerHandle,
    pub location: Location,
    /// Items the engine will drop. Emptied when the arena handles the drop.
    pub drops: Vec<Item>,
    /// Chat line the engine will show. Emptied when the arena announces it.
    pub death_message: String,
}

/// A player is about to respawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RespawnEvent {
    pub player: PlayerHandle,
    /// Where the player will appear. May be overridden.
    pub respawn_location: Location,
}

/// A player disconnected.
#[derive(Debug, Clone, PartialEq)]
pub struct QuitEvent {
    pub player: PlayerHandle,
}

/// A player moved to another world.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldChangeEvent {
    pub player: PlayerHandle,
    pub from: String,
    pub to: String,
}

/// Any host event, for hosts that route through a single entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Move(MoveEvent),
    Exhaust(ExhaustEvent),
    Interact(InteractEvent),
    Death(DeathEvent),
    Respawn(RespawnEvent),
    Quit(QuitEvent),
    WorldChange(WorldChangeEvent),
}

impl HostEvent {
    /// The player the event is about.
    pub fn player(&self) -> &PlayerHandle {
        match self {
            Self::Move(e) => &e.player,
            Self::Exhaust(e) => &e.player,
            Self::Interact(e) => &e.player,
            Self::Death(e) => &e.player,
            Self::Respawn(e) => &e.player,
            Self::Quit(e) => &e.player,
            Self::WorldChange(e) => &e.player,
        }
    }
}

/// Stateless event handlers for one arena.
pub struct EventAdapter;

impl EventAdapter {
    /// Routes `event` to its handler.
    pub fn dispatch<H: Host + ?Sized>(arena: &mut Arena, host: &mut H, event: &mut HostEvent) {
        match event {
            HostEvent::Move(e) => Self::on_move(arena, host, e),
            HostEvent::Exhaust(e) => Self::on_exhaust(arena, e),
            HostEvent::Interact(e) => Self::on_interact(arena, host, e),
            HostEvent::Death(e) => Self::on_death(arena, host, e),
            HostEvent::Respawn(e) => Self::on_respawn(arena, host, e),
            HostEvent::Quit(e) => Self::on_quit(arena, host, e),
            HostEvent::WorldChange(e) => Self::on_world_change(arena, host, e),
        }
    }

    /// Keeps lobby participants on their spawn.
    pub fn on_move<H: Host + ?Sized>(arena: &mut Arena, host: &mut H, event: &MoveEvent) {
        if arena.phase() != Phase::Lobby || !arena.is_participant(event.player.id) {
            return;
        }
        arena.enforce_spawn(host, &event.player, event.to);
    }

    /// Freezes hunger in the lobby unless hunger is enabled globally.
    pub fn on_exhaust(arena: &mut Arena, event: &mut ExhaustEvent) {
        if arena.is_participant(event.player.id)
            && arena.phase() == Phase::Lobby
            && !arena.shared().hunger
        {
            event.cancelled = true;
        }
    }

    /// Blocks lobby chest access and handles join sign clicks.
    pub fn on_interact<H: Host + ?Sized>(arena: &mut Arena, host: &mut H, event: &mut InteractEvent) {
        let block = &event.block;
        if arena.is_participant(event.player.id)
            && block.kind == BlockKind::Chest
            && arena.phase() == Phase::Lobby
        {
            event.cancelled = true;
            return;
        }

        if host
            .tile_at(&block.location.world, block.location.position)
            .is_none()
        {
            return;
        }
        let Some(sign) = arena.join_sign() else {
            return;
        };
        if !sign.matches(&block.location) {
            return;
        }

        match arena.phase() {
            Phase::Game => host.send_message(&event.player, &JoinRejection::InGame.notice()),
            Phase::Restart => host.send_message(&event.player, &JoinRejection::Restarting.notice()),
            Phase::Lobby if arena.is_setup() => {}
            Phase::Lobby => {
                let _ = arena.join(host, &event.player);
            }
        }
    }

    /// Turns a participant's death into a departure.
    pub fn on_death<H: Host + ?Sized>(arena: &mut Arena, host: &mut H, event: &mut DeathEvent) {
        if !arena.is_participant(event.player.id) {
            return;
        }
        let death = Death {
            location: event.location.clone(),
            drops: std::mem::take(&mut event.drops),
            message: std::mem::take(&mut event.death_message),
        };
        arena.leave(host, &event.player, "", Some(death));
    }

    /// Sends players who died in the arena back to the default spawn.
    pub fn on_respawn<H: Host + ?Sized>(arena: &mut Arena, host: &mut H, event: &mut RespawnEvent) {
        if arena.take_pending_respawn(event.player.id) {
            event.respawn_location = host.default_spawn();
        }
    }

    pub fn on_quit<H: Host + ?Sized>(arena: &mut Arena, host: &mut H, event: &QuitEvent) {
        if arena.is_participant(event.player.id) {
            arena.leave(host, &event.player, "", None);
        }
    }

    pub fn on_world_change<H: Host + ?Sized>(
        arena: &mut Arena,
        host: &mut H,
        event: &WorldChangeEvent,
    ) {
        if arena.is_participant(event.player.id) {
            arena.leave(host, &event.player, WORLD_CHANGE_NOTICE, None);
        }
    }
}

//! Arena lifecycle management for Duelyard.
//!
//! One [`Arena`] is one match venue: players join numbered slots in a
//! lobby, a countdown starts the match, the last player standing wins,
//! and the arena settles and reloads into a fresh lobby.
//!
//! # Key types
//!
//! - [`Arena`] — the lifecycle state machine
//! - [`ArenaScheduler`] — countdowns, advanced once per base interval
//! - [`EventAdapter`] — turns host engine events into arena calls
//! - [`Host`] — the trait the game engine implements for the arena
//! - [`ArenaData`] / [`ArenaConfig`] — persisted and validated settings
//! - [`SharedConfig`] / [`KitTable`] — plugin-wide settings and kits
//!
//! Everything here is synchronous and single-threaded; wrap an arena in
//! an actor (see the `duelyard` crate) to drive it from several tasks.

mod adapter;
mod arena;
mod config;
mod error;
mod event;
mod host;
mod kit;
mod scheduler;
mod slots;
mod state;

pub use adapter::{
    DeathEvent, EventAdapter, ExhaustEvent, HostEvent, InteractEvent, MoveEvent, QuitEvent,
    RespawnEvent, WORLD_CHANGE_NOTICE, WorldChangeEvent,
};
pub use arena::{Arena, Death, SPAWN_TOLERANCE};
pub use config::{ArenaConfig, ArenaData, JoinSign};
pub use error::{ArenaError, JoinRejection, SetupError};
pub use event::{ArenaEvent, ArenaInfo};
pub use host::Host;
pub use kit::{Kit, KitTable, SharedConfig, fallback_loadout};
pub use scheduler::{ArenaScheduler, ScheduleConfig, TickOutcome};
pub use slots::{SlotIndex, SpawnSlotTable};
pub use state::{ArenaState, Participant, Phase};

//! # Duelyard
//!
//! Last-player-standing arena minigames for a block-world game server.
//!
//! Players click an arena's join sign, wait on numbered spawn pads while a
//! lobby countdown runs, fight once the match starts, and the last player
//! standing wins. The arena then settles for a few seconds and reloads
//! into a fresh lobby.
//!
//! The game server is abstracted behind the [`Host`] trait. The core
//! ([`Arena`], [`ArenaScheduler`], [`EventAdapter`]) is synchronous;
//! [`ArenaRuntime`] puts one arena into its own Tokio task with a
//! once-per-second driver.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use duelyard::prelude::*;
//!
//! # async fn run(mut host: impl Host + Send + 'static) -> Result<(), DuelyardError> {
//! duelyard::init_tracing("info");
//!
//! let shared = Arc::new(duelyard::config::load_shared_config("config.json")?);
//! let data = duelyard::config::load_arena_file("arenas/duel1.json")?;
//! let arena = Arena::new("duel1", data, shared, &mut host);
//!
//! let runtime = ArenaRuntime::spawn(arena, host, RuntimeConfig::default());
//! let mut events = runtime.subscribe();
//! runtime.join(PlayerHandle::new(1, "Steve")).await?;
//! while let Ok(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
mod error;
mod logging;
mod runtime;

pub use error::DuelyardError;
pub use logging::init_tracing;
pub use runtime::{ArenaRuntime, RuntimeConfig};

pub use duelyard_arena as arena;
pub use duelyard_protocol as protocol;
pub use duelyard_tick as tick;

pub use duelyard_arena::{
    Arena, ArenaData, ArenaError, ArenaEvent, ArenaInfo, ArenaScheduler, EventAdapter, Host,
    HostEvent, JoinRejection, Phase, ScheduleConfig, SetupError, SharedConfig,
};

/// The types most applications need.
pub mod prelude {
    pub use crate::{ArenaRuntime, DuelyardError, RuntimeConfig};
    pub use duelyard_arena::{
        Arena, ArenaData, ArenaEvent, ArenaInfo, ArenaScheduler, DeathEvent, EventAdapter,
        ExhaustEvent, Host, HostEvent, InteractEvent, JoinRejection, KitTable, MoveEvent, Phase,
        QuitEvent, RespawnEvent, ScheduleConfig, SharedConfig, TickOutcome, WorldChangeEvent,
    };
    pub use duelyard_protocol::{
        Block, BlockKind, EquipSlot, GameMode, Item, Location, PlayerHandle, PlayerId, Position,
        Tile,
    };
    pub use duelyard_tick::DriverConfig;
}

//! Shared value types for Duelyard.
//!
//! This crate defines the "vocabulary" that the arena core and the host
//! engine share:
//!
//! - **Types** ([`PlayerId`], [`PlayerHandle`], [`Position`], [`Location`],
//!   [`Tile`], [`Block`], [`MessageKind`], [`GameMode`]) — who is playing
//!   and where things are.
//! - **Items** ([`Item`], [`EquipSlot`], [`ArmorPiece`]) — what gets put
//!   into a player's inventory.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while parsing
//!   the string-coded values found in arena files.
//!
//! # Architecture
//!
//! The protocol layer sits below the arena core. It doesn't know about
//! phases or slots — it only knows how to describe players, places and
//! equipment.
//!
//! ```text
//! Host engine (worlds, players) → Protocol (values) → Arena (lifecycle)
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod error;
mod item;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use error::ProtocolError;
pub use item::{ArmorPiece, EquipSlot, Item, item_ids};
pub use types::{
    Block, BlockKind, GameMode, Location, MessageKind, PlayerHandle, PlayerId,
    Position, Tile,
};

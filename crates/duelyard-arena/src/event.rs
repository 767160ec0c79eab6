//! Outward notifications and status snapshots.

use duelyard_protocol::PlayerHandle;
use serde::{Deserialize, Serialize};

use crate::Phase;

/// Something other subsystems may want to react to.
///
/// Arenas queue these as they happen; the owner drains them with
/// [`Arena::drain_events`](crate::Arena::drain_events).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ArenaEvent {
    /// A player joined and received their kit.
    Equipped {
        arena: String,
        player: PlayerHandle,
        kit: Option<String>,
    },

    /// The lobby countdown ran out and the match began.
    MatchStarted {
        arena: String,
        players: Vec<PlayerHandle>,
    },

    /// The match ended with a single player standing.
    Won { arena: String, player: PlayerHandle },

    /// The arena reloaded into a fresh lobby after a match.
    Restarted { arena: String },
}

impl ArenaEvent {
    /// Name of the arena that produced the event.
    pub fn arena(&self) -> &str {
        match self {
            Self::Equipped { arena, .. }
            | Self::MatchStarted { arena, .. }
            | Self::Won { arena, .. }
            | Self::Restarted { arena } => arena,
        }
    }
}

/// A snapshot of arena metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaInfo {
    pub name: String,
    pub phase: Phase,
    pub player_count: usize,
    pub capacity: usize,
    /// `true` while the arena is in setup mode.
    pub setup: bool,
    pub kit: Option<String>,
}

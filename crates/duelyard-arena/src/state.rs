//! Arena phase machine and participant bookkeeping.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use duelyard_protocol::{PlayerHandle, PlayerId};
use serde::{Deserialize, Serialize};

use crate::SlotIndex;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The lifecycle phase of an arena.
///
/// Phases form a cycle, with no other edges:
///
/// ```text
/// Lobby → Game → Restart → Lobby → ...
/// ```
///
/// - **Lobby**: accepting joins, players held on their spawns while the
///   countdown runs.
/// - **Game**: match in progress; ends when one player (or none) is left.
/// - **Restart**: match over, waiting out the settle delay before the
///   arena reloads into a fresh lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Lobby,
    Game,
    Restart,
}

impl Phase {
    /// The phase that follows this one.
    pub fn next(self) -> Self {
        match self {
            Self::Lobby => Self::Game,
            Self::Game => Self::Restart,
            Self::Restart => Self::Lobby,
        }
    }

    /// Returns `true` if moving to `target` follows the cycle.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == target
    }

    /// Returns `true` if the arena is accepting new players.
    pub fn is_joinable(self) -> bool {
        matches!(self, Self::Lobby)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::Game => write!(f, "Game"),
            Self::Restart => write!(f, "Restart"),
        }
    }
}

// ---------------------------------------------------------------------------
// Participant / ArenaState
// ---------------------------------------------------------------------------

/// A player bound to a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub player: PlayerHandle,
    pub slot: SlotIndex,
}

/// Mutable state of one arena cycle.
///
/// Participants are keyed by [`PlayerId`] in every phase; the slot lives
/// on the [`Participant`] and is only consulted for spawn positions.
/// A new `ArenaState` is created for each cycle instead of clearing the
/// old one.
#[derive(Debug, Clone, Default)]
pub struct ArenaState {
    phase: Phase,
    participants: BTreeMap<PlayerId, Participant>,
    pending_respawn: HashSet<PlayerId>,
    kit: Option<String>,
}

impl ArenaState {
    /// A fresh lobby using `kit`.
    pub fn new(kit: Option<String>) -> Self {
        Self {
            kit,
            ..Self::default()
        }
    }

    /// A fresh lobby that keeps the respawn queue of the previous cycle.
    pub(crate) fn next_cycle(previous: ArenaState, kit: Option<String>) -> Self {
        Self {
            pending_respawn: previous.pending_respawn,
            ..Self::new(kit)
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Name of the kit selected for this cycle.
    pub fn kit(&self) -> Option<&str> {
        self.kit.as_deref()
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.participants.contains_key(&player)
    }

    pub fn participant(&self, player: PlayerId) -> Option<&Participant> {
        self.participants.get(&player)
    }

    /// Participants ordered by player id.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    /// The lowest slot in `1..=capacity` nobody holds.
    pub fn free_slot(&self, capacity: usize) -> Option<SlotIndex> {
        (1..=capacity)
            .map(SlotIndex)
            .find(|slot| self.participants.values().all(|p| p.slot != *slot))
    }

    /// `true` if the player is waiting for a respawn override.
    pub fn is_pending_respawn(&self, player: PlayerId) -> bool {
        self.pending_respawn.contains(&player)
    }

    /// Binds `player` to `slot`.
    ///
    /// Returns `false` without changes if the player is already present or
    /// the slot is taken.
    pub(crate) fn bind(&mut self, player: PlayerHandle, slot: SlotIndex) -> bool {
        if self.contains(player.id) || self.participants.values().any(|p| p.slot == slot) {
            return false;
        }
        self.participants
            .insert(player.id, Participant { player, slot });
        true
    }

    pub(crate) fn remove(&mut self, player: PlayerId) -> Option<Participant> {
        self.participants.remove(&player)
    }

    pub(crate) fn queue_respawn(&mut self, player: PlayerId) {
        self.pending_respawn.insert(player);
    }

    pub(crate) fn take_pending_respawn(&mut self, player: PlayerId) -> bool {
        self.pending_respawn.remove(&player)
    }

    /// Moves to `target` if it is the next phase in the cycle.
    pub(crate) fn advance(&mut self, target: Phase) -> bool {
        if !self.phase.can_transition_to(target) {
            return false;
        }
        self.phase = target;
        true
    }

    /// The players carried into the match.
    ///
    /// Participants are keyed by player id in every phase, so the match
    /// roster is the lobby roster unchanged; this only lists it.
    pub(crate) fn snapshot_for_match(&self) -> Vec<PlayerHandle> {
        self.participants.values().map(|p| p.player.clone()).collect()
    }
}

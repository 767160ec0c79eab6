//! Spawn slots: numbered positions players are bound to while in an arena.

use std::fmt;

use duelyard_protocol::Position;
use serde::{Deserialize, Serialize};

use crate::SetupError;

/// A 1-based slot number.
///
/// Slot `n` uses the `n`-th configured spawn. Displays as `spawn-n`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SlotIndex(pub usize);

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spawn-{}", self.0)
    }
}

/// Fixed-size table of slot → spawn position.
///
/// Built once from the arena data when the arena is enabled and read-only
/// afterwards. Its length is the arena capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnSlotTable {
    spawns: Vec<Position>,
}

impl SpawnSlotTable {
    /// Parses `spawns` and checks the count against `capacity`.
    pub fn new(capacity: usize, spawns: &[String]) -> Result<Self, SetupError> {
        if spawns.len() != capacity {
            return Err(SetupError::SpawnCountMismatch {
                slots: capacity,
                spawns: spawns.len(),
            });
        }
        let spawns = spawns
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                raw.parse::<Position>()
                    .map_err(|source| SetupError::InvalidSpawn { slot: i + 1, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { spawns })
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.spawns.len()
    }

    /// Spawn position for `slot`, or `None` if the slot doesn't exist.
    pub fn spawn(&self, slot: SlotIndex) -> Option<Position> {
        slot.0
            .checked_sub(1)
            .and_then(|i| self.spawns.get(i))
            .copied()
    }

    /// All slots in ascending order.
    pub fn slots(&self) -> impl Iterator<Item = SlotIndex> + '_ {
        (1..=self.spawns.len()).map(SlotIndex)
    }
}

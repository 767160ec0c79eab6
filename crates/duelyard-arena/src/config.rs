//! Arena data (as stored on disk) and its validated form.

use duelyard_protocol::{Location, Position};
use serde::{Deserialize, Serialize};

use crate::{Host, SetupError, SpawnSlotTable};

// ---------------------------------------------------------------------------
// ArenaData
// ---------------------------------------------------------------------------

/// Arena settings exactly as persisted in an arena file.
///
/// Nothing here is trusted: values are checked by [`ArenaConfig::from_data`]
/// when the arena is enabled. Missing fields take the values of a freshly
/// created arena (two slots, no level, disabled).
///
/// ```json
/// {
///   "level": "duel1",
///   "slots": 2,
///   "spawns": ["0,64,0", "10,64,0"],
///   "enabled": true,
///   "joinsign": ["100,65,100", "lobby"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaData {
    /// Level (world) the match is played in.
    pub level: Option<String>,

    /// Number of player slots.
    pub slots: i64,

    /// One `"x,y,z"` spawn per slot, slot 1 first.
    pub spawns: Vec<String>,

    /// Set once the data has passed validation.
    pub enabled: bool,

    /// `["x,y,z", world]` of the sign players click to join.
    pub joinsign: Vec<String>,
}

impl Default for ArenaData {
    fn default() -> Self {
        Self {
            level: None,
            slots: 2,
            spawns: Vec::new(),
            enabled: false,
            joinsign: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// JoinSign
// ---------------------------------------------------------------------------

/// The sign players interact with to join the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSign {
    pub location: Location,
}

impl JoinSign {
    /// Parses the persisted `[coordinate, world]` pair.
    pub fn parse(fields: &[String]) -> Result<Self, SetupError> {
        let [position, world] = fields else {
            return Err(SetupError::MalformedJoinSign(fields.len()));
        };
        let position = position
            .parse::<Position>()
            .map_err(SetupError::InvalidJoinSign)?;
        Ok(Self {
            location: Location::new(world.clone(), position),
        })
    }

    /// `true` if `block` is this sign.
    pub fn matches(&self, block: &Location) -> bool {
        self.location.same_block(block)
    }
}

// ---------------------------------------------------------------------------
// ArenaConfig
// ---------------------------------------------------------------------------

/// Validated, immutable arena configuration.
///
/// Only exists for arenas that passed validation; an arena without one is
/// in setup mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaConfig {
    level: String,
    spawns: SpawnSlotTable,
    join_sign: JoinSign,
}

impl ArenaConfig {
    /// Validates `data` against the host.
    ///
    /// Checks run in order and the first failure is returned: level set,
    /// level generated, positive slot count, spawns matching the slot
    /// count and parseable, join sign well-formed.
    pub fn from_data<H: Host + ?Sized>(data: &ArenaData, host: &H) -> Result<Self, SetupError> {
        let level = data.level.clone().ok_or(SetupError::MissingLevel)?;
        if !host.is_world_generated(&level) {
            return Err(SetupError::LevelNotGenerated(level));
        }
        let capacity = usize::try_from(data.slots)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(SetupError::InvalidSlots(data.slots))?;
        let spawns = SpawnSlotTable::new(capacity, &data.spawns)?;
        let join_sign = JoinSign::parse(&data.joinsign)?;
        Ok(Self {
            level,
            spawns,
            join_sign,
        })
    }

    /// Level the match is played in.
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.spawns.capacity()
    }

    pub fn spawns(&self) -> &SpawnSlotTable {
        &self.spawns
    }

    pub fn join_sign(&self) -> &JoinSign {
        &self.join_sign
    }
}

//! Core value types shared between the arena core and the host engine.
//!
//! These are the values that cross the boundary in both directions: the
//! host hands the arena players and positions inside its events, and the
//! arena hands them back when it asks the host to teleport, message or
//! equip someone.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A stable identifier for a player, assigned by the host.
///
/// A newtype around `u64` so it can't be mixed up with slot numbers or
/// other counters. The arena keys its participant map by this id in every
/// phase, so a player keeps the same identity from lobby to victory.
///
/// `#[serde(transparent)]` makes `PlayerId(42)` serialize as plain `42`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

/// `tracing::info!(player = %id, ...)` prints "P-42".
impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A player as seen by the arena: stable id plus display name.
///
/// The name is only used for messages; lookups always go through `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerHandle {
    pub id: PlayerId,
    pub name: String,
}

impl PlayerHandle {
    /// Creates a handle from an id and a display name.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: PlayerId(id),
            name: name.into(),
        }
    }
}

impl fmt::Display for PlayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Position / Location
// ---------------------------------------------------------------------------

/// A point in a world.
///
/// Arena files store positions as `"x,y,z"` strings, so serde goes
/// through [`FromStr`] / [`fmt::Display`] instead of a struct shape:
/// `Position { x: 1.0, y: 64.0, z: -3.5 }` becomes `"1,64,-3.5"`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    /// Creates a position from its three components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// The integer block coordinates containing this position.
    ///
    /// Two positions name the same block when their block coordinates
    /// are equal, which is how join signs are matched against clicks.
    pub fn block_coords(&self) -> (i64, i64, i64) {
        (
            self.x.floor() as i64,
            self.y.floor() as i64,
            self.z.floor() as i64,
        )
    }
}

impl FromStr for Position {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(ProtocolError::CoordinateArity(s.to_string()));
        }
        let parse = |component: &str| -> Result<f64, ProtocolError> {
            component
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ProtocolError::CoordinateComponent {
                    input: s.to_string(),
                    component: component.to_string(),
                })
        };
        Ok(Self {
            x: parse(parts[0])?,
            y: parse(parts[1])?,
            z: parse(parts[2])?,
        })
    }
}

impl TryFrom<String> for Position {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Position> for String {
    fn from(pos: Position) -> Self {
        pos.to_string()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

/// A position inside a named world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub position: Position,
}

impl Location {
    pub fn new(world: impl Into<String>, position: Position) -> Self {
        Self {
            world: world.into(),
            position,
        }
    }

    /// Same world and same block.
    pub fn same_block(&self, other: &Location) -> bool {
        self.world == other.world
            && self.position.block_coords() == other.position.block_coords()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.position, self.world)
    }
}

// ---------------------------------------------------------------------------
// MessageKind — how a broadcast is shown
// ---------------------------------------------------------------------------

/// The UI channel used to show a broadcast to a player.
///
/// This is a closed set. Hosts that pass raw numeric codes go through
/// [`MessageKind::from_code`], which returns `None` for anything else so
/// the broadcast can be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Regular chat line.
    #[default]
    Message,
    /// Short text above the hotbar.
    Tip,
    /// Popup text in the middle of the screen.
    Popup,
    /// Large title with an optional subtitle.
    Title,
}

impl MessageKind {
    /// Maps the numeric codes used by hosts (0..=3) to a kind.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Message),
            1 => Some(Self::Tip),
            2 => Some(Self::Popup),
            3 => Some(Self::Title),
            _ => None,
        }
    }

    /// The numeric code for this kind.
    pub fn code(self) -> u8 {
        match self {
            Self::Message => 0,
            Self::Tip => 1,
            Self::Popup => 2,
            Self::Title => 3,
        }
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(ProtocolError::UnknownMessageKind(code))
    }
}

// ---------------------------------------------------------------------------
// Game mode, blocks, tiles
// ---------------------------------------------------------------------------

/// Player game mode as understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Survival,
    Creative,
    Adventure,
    Spectator,
}

/// The kind of block a player interacted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Chest,
    Sign,
    /// Any other block, by host block id.
    Other(u16),
}

/// A block in a world, as carried by interaction events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub location: Location,
}

impl Block {
    pub fn new(kind: BlockKind, location: Location) -> Self {
        Self { kind, location }
    }
}

/// A block entity attached to a block (sign text, chest contents, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Sign,
    Chest,
    Other,
}

// =========================================================================
// Tests
// =========================================================================

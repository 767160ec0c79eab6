//! Items and equipment slots.
//!
//! Kits in the configuration describe items as `[itemId, damage, count]`
//! triples. [`Item`] keeps that exact shape on the wire (a JSON array)
//! while giving the fields names in Rust.

use serde::{Deserialize, Serialize};

/// Host item ids used by the built-in fallback kit.
pub mod item_ids {
    pub const IRON_SWORD: u16 = 267;
    pub const DIAMOND_HELMET: u16 = 310;
    pub const DIAMOND_CHESTPLATE: u16 = 311;
    pub const DIAMOND_LEGGINGS: u16 = 312;
    pub const DIAMOND_BOOTS: u16 = 313;
    pub const GOLDEN_APPLE: u16 = 322;
}

/// A stack of items.
///
/// Serialized as `[id, damage, count]`, matching the kit table format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u16, u16, u8)", into = "(u16, u16, u8)")]
pub struct Item {
    pub id: u16,
    pub damage: u16,
    pub count: u8,
}

impl Item {
    /// A stack of `count` items with no damage value.
    pub const fn new(id: u16, count: u8) -> Self {
        Self {
            id,
            damage: 0,
            count,
        }
    }

    /// A single item with no damage value.
    pub const fn single(id: u16) -> Self {
        Self::new(id, 1)
    }
}

impl From<(u16, u16, u8)> for Item {
    fn from((id, damage, count): (u16, u16, u8)) -> Self {
        Self { id, damage, count }
    }
}

impl From<Item> for (u16, u16, u8) {
    fn from(item: Item) -> Self {
        (item.id, item.damage, item.count)
    }
}

/// The four armor positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmorPiece {
    Helmet,
    Chestplate,
    Leggings,
    Boots,
}

impl ArmorPiece {
    /// All pieces, head to feet.
    pub const ALL: [ArmorPiece; 4] = [
        ArmorPiece::Helmet,
        ArmorPiece::Chestplate,
        ArmorPiece::Leggings,
        ArmorPiece::Boots,
    ];

    /// The key used for this piece in kit definitions.
    pub fn key(self) -> &'static str {
        match self {
            Self::Helmet => "helmet",
            Self::Chestplate => "chestplate",
            Self::Leggings => "leggings",
            Self::Boots => "boots",
        }
    }

    /// Parses a kit key back into a piece.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|piece| piece.key() == key)
    }
}

/// Where an item goes when the arena equips a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    /// An armor position.
    Armor(ArmorPiece),
    /// A numbered inventory slot.
    Inventory(u32),
    /// The first free inventory slot.
    FirstFree,
}

//! Kits and the configuration shared by every arena.

use std::collections::BTreeMap;

use duelyard_protocol::{ArmorPiece, EquipSlot, Item, item_ids};
use rand::Rng;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};

/// A named bundle of starting equipment.
///
/// Stored as a flat map: armor keys (`helmet`, `chestplate`, `leggings`,
/// `boots`) and numeric inventory slots, each mapping to an
/// `[itemId, damage, count]` triple. Other keys are ignored.
///
/// ```json
/// { "helmet": [306, 0, 1], "0": [267, 0, 1], "1": [322, 0, 3] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Item>", into = "BTreeMap<String, Item>")]
pub struct Kit {
    pub armor: BTreeMap<ArmorPiece, Item>,
    pub inventory: BTreeMap<u32, Item>,
}

impl Kit {
    /// The items to hand out, armor first, then inventory slots in order.
    pub fn loadout(&self) -> Vec<(EquipSlot, Item)> {
        self.armor
            .iter()
            .map(|(piece, item)| (EquipSlot::Armor(*piece), *item))
            .chain(
                self.inventory
                    .iter()
                    .map(|(slot, item)| (EquipSlot::Inventory(*slot), *item)),
            )
            .collect()
    }
}

impl From<BTreeMap<String, Item>> for Kit {
    fn from(entries: BTreeMap<String, Item>) -> Self {
        let mut kit = Kit::default();
        for (key, item) in entries {
            if let Some(piece) = ArmorPiece::from_key(&key) {
                kit.armor.insert(piece, item);
            } else if let Ok(slot) = key.parse::<u32>() {
                kit.inventory.insert(slot, item);
            } else {
                tracing::warn!(%key, "ignoring unknown kit entry");
            }
        }
        kit
    }
}

impl From<Kit> for BTreeMap<String, Item> {
    fn from(kit: Kit) -> Self {
        kit.armor
            .into_iter()
            .map(|(piece, item)| (piece.key().to_string(), item))
            .chain(
                kit.inventory
                    .into_iter()
                    .map(|(slot, item)| (slot.to_string(), item)),
            )
            .collect()
    }
}

/// Equipment handed out when no kit is selected: full diamond armor, an
/// iron sword and five golden apples.
pub fn fallback_loadout() -> Vec<(EquipSlot, Item)> {
    vec![
        (EquipSlot::Armor(ArmorPiece::Helmet), Item::single(item_ids::DIAMOND_HELMET)),
        (EquipSlot::Armor(ArmorPiece::Chestplate), Item::single(item_ids::DIAMOND_CHESTPLATE)),
        (EquipSlot::Armor(ArmorPiece::Leggings), Item::single(item_ids::DIAMOND_LEGGINGS)),
        (EquipSlot::Armor(ArmorPiece::Boots), Item::single(item_ids::DIAMOND_BOOTS)),
        (EquipSlot::FirstFree, Item::single(item_ids::IRON_SWORD)),
        (EquipSlot::FirstFree, Item::new(item_ids::GOLDEN_APPLE, 5)),
    ]
}

/// All kits, by name, in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KitTable(BTreeMap<String, Kit>);

impl KitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a kit.
    pub fn insert(&mut self, name: impl Into<String>, kit: Kit) {
        self.0.insert(name.into(), kit);
    }

    pub fn get(&self, name: &str) -> Option<&Kit> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A uniformly random kit name, or `None` if the table is empty.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.names().choose(rng)
    }
}

impl FromIterator<(String, Kit)> for KitTable {
    fn from_iter<I: IntoIterator<Item = (String, Kit)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Plugin-wide settings read by every arena.
///
/// Loaded once by the host and handed to arenas as an
/// `Arc<SharedConfig>`; arenas never copy or modify it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedConfig {
    /// When `false`, hunger doesn't drop for players waiting in a lobby.
    pub hunger: bool,

    /// Kits, one of which is picked at random for each arena cycle.
    pub kits: KitTable,
}

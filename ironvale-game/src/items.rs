//! Item catalog: consumables and equipment with composable reward bonuses.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const DEFAULT_ITEMS: &str = include_str!("../assets/items.json");

/// What an item is, which also decides where it can go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Consumable,
    Weapon,
    Armor,
    Shield,
    Accessory,
    Book,
}

impl ItemKind {
    /// The equipment slot this kind occupies, `None` for consumables.
    #[must_use]
    pub const fn slot(self) -> Option<EquipSlot> {
        match self {
            Self::Consumable => None,
            Self::Weapon => Some(EquipSlot::Weapon),
            Self::Armor => Some(EquipSlot::Armor),
            Self::Shield => Some(EquipSlot::Shield),
            Self::Accessory => Some(EquipSlot::Accessory),
            Self::Book => Some(EquipSlot::Book),
        }
    }
}

/// Gear slot on the hero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipSlot {
    Weapon,
    Armor,
    Shield,
    Accessory,
    Book,
}

impl EquipSlot {
    pub const ALL: [Self; 5] = [
        Self::Weapon,
        Self::Armor,
        Self::Shield,
        Self::Accessory,
        Self::Book,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Armor => "armor",
            Self::Shield => "shield",
            Self::Accessory => "accessory",
            Self::Book => "book",
        }
    }
}

impl fmt::Display for EquipSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipSlot {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weapon" => Ok(Self::Weapon),
            "armor" => Ok(Self::Armor),
            "shield" => Ok(Self::Shield),
            "accessory" => Ok(Self::Accessory),
            "book" => Ok(Self::Book),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Reward modifiers contributed by an item while equipped. Flat XP stacks
/// additively; multipliers compose multiplicatively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ItemBonuses {
    #[serde(default)]
    pub xp_flat: f64,
    #[serde(default)]
    pub xp_multiplier: Option<f64>,
    #[serde(default)]
    pub gold_multiplier: Option<f64>,
    #[serde(default)]
    pub event_chance: Option<f64>,
    #[serde(default)]
    pub bad_event_chance: Option<f64>,
}

/// A catalog item definition. Items without a price never appear in the
/// shop; they exist only as drops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub rarity: Rarity,
    #[serde(default)]
    pub price: Option<i64>,
    pub icon: String,
    pub description: String,
    #[serde(default)]
    pub bonuses: Option<ItemBonuses>,
    /// XP granted when a consumable is used.
    #[serde(default)]
    pub use_xp: Option<u64>,
    #[serde(default)]
    pub drop_condition: Option<String>,
}

/// Container for all item definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ItemCatalog {
    pub items: Vec<ItemDef>,
}

impl ItemCatalog {
    #[must_use]
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Load the catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid item data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The embedded default catalog.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static BUILTIN: Lazy<ItemCatalog> = Lazy::new(|| {
            ItemCatalog::from_json(DEFAULT_ITEMS).expect("embedded item catalog is valid JSON")
        });
        &BUILTIN
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ItemDef> {
        self.items.iter().find(|item| item.id == id)
    }
}

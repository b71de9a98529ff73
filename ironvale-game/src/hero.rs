//! The hero aggregate: the single authoritative in-memory view of a player,
//! mutated only by engine transitions and persisted whole or via partial
//! patches.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::catalog::{Archetype, Location};
use crate::constants::STARTING_HP;
use crate::error::GameError;
use crate::items::EquipSlot;
use crate::quests::QuestLog;
use crate::session::Session;

/// Hero class. Class only matters to the generator's category weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroClass {
    Guardian,
    Forca,
    Agilidade,
    Destreza,
    Vigor,
}

impl HeroClass {
    pub const ALL: [Self; 5] = [
        Self::Guardian,
        Self::Forca,
        Self::Agilidade,
        Self::Destreza,
        Self::Vigor,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guardian => "guardian",
            Self::Forca => "forca",
            Self::Agilidade => "agilidade",
            Self::Destreza => "destreza",
            Self::Vigor => "vigor",
        }
    }
}

impl fmt::Display for HeroClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeroClass {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guardian" => Ok(Self::Guardian),
            "forca" => Ok(Self::Forca),
            "agilidade" => Ok(Self::Agilidade),
            "destreza" => Ok(Self::Destreza),
            "vigor" => Ok(Self::Vigor),
            _ => Err(()),
        }
    }
}

/// Persistent numeric state. `xp` is always below the current level
/// threshold; overflow is folded into level-ups at award time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub xp: u64,
    #[serde(default = "default_hp")]
    pub hp: i32,
    #[serde(default)]
    pub gold: i64,
    #[serde(default)]
    pub gems: i64,
    #[serde(default)]
    pub streak: u32,
}

const fn default_hp() -> i32 {
    STARTING_HP
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            xp: 0,
            hp: STARTING_HP,
            gold: 0,
            gems: 0,
            streak: 0,
        }
    }
}

/// Routine split label assigned by a trainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SplitId {
    A,
    B,
    C,
    D,
}

impl SplitId {
    pub const ALL: [Self; 4] = [Self::A, Self::B, Self::C, Self::D];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for SplitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            _ => Err(()),
        }
    }
}

/// One entry in a trainer-assigned routine: either a library reference or a
/// free-text custom exercise narrated through an archetype template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineTask {
    /// Library exercise id; `None` for custom entries.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub meta: String,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default)]
    pub archetype: Archetype,
}

/// Trainer-assigned routine: ordered task lists keyed by split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorkoutRoutine(pub BTreeMap<SplitId, Vec<RoutineTask>>);

impl WorkoutRoutine {
    #[must_use]
    pub fn split(&self, id: SplitId) -> Option<&[RoutineTask]> {
        self.0.get(&id).map(Vec::as_slice)
    }

    /// Splits that actually hold exercises, in label order.
    #[must_use]
    pub fn populated_splits(&self) -> Vec<SplitId> {
        SplitId::ALL
            .into_iter()
            .filter(|id| self.0.get(id).is_some_and(|tasks| !tasks.is_empty()))
            .collect()
    }
}

/// A player's persistent character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    /// Document id; doubles as the owner identity.
    pub id: String,
    pub name: String,
    pub class: HeroClass,
    pub level: u32,
    pub stats: Stats,
    #[serde(default)]
    pub inventory: Vec<String>,
    #[serde(default)]
    pub equipped: BTreeMap<EquipSlot, String>,
    #[serde(default)]
    pub unlocked_maps: BTreeSet<Location>,
    #[serde(default)]
    pub workout_routine: Option<WorkoutRoutine>,
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub current_workout: Option<Session>,
    #[serde(default)]
    pub quest_log: QuestLog,
}

impl Hero {
    /// Create a level-1 hero.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the name is blank or no training
    /// location was selected.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        class: HeroClass,
        unlocked_maps: BTreeSet<Location>,
    ) -> Result<Self, GameError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GameError::EmptyHeroName);
        }
        if unlocked_maps.is_empty() {
            return Err(GameError::NoLocationSelected);
        }
        Ok(Self {
            id: id.into(),
            name,
            class,
            level: 1,
            stats: Stats::default(),
            inventory: Vec::new(),
            equipped: BTreeMap::new(),
            unlocked_maps,
            workout_routine: None,
            guild_id: None,
            current_workout: None,
            quest_log: QuestLog::default(),
        })
    }

    /// Today's session, if the stored one carries today's day stamp.
    #[must_use]
    pub fn session_for(&self, stamp: &str) -> Option<&Session> {
        self.current_workout
            .as_ref()
            .filter(|session| session.is_for(stamp))
    }

    pub fn session_for_mut(&mut self, stamp: &str) -> Option<&mut Session> {
        self.current_workout
            .as_mut()
            .filter(|session| session.is_for(stamp))
    }

    /// Whether the inventory holds at least one instance of an item.
    #[must_use]
    pub fn owns(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|owned| owned == item_id)
    }

    /// Remove exactly one stacked instance of an item. Returns whether an
    /// instance was removed.
    pub fn remove_one(&mut self, item_id: &str) -> bool {
        if let Some(pos) = self.inventory.iter().position(|owned| owned == item_id) {
            self.inventory.remove(pos);
            true
        } else {
            false
        }
    }

    /// Item ids currently equipped, in slot order.
    pub fn equipped_ids(&self) -> impl Iterator<Item = &str> {
        self.equipped.values().map(String::as_str)
    }
}

//! Temple meditation rites: timed focus sessions that award XP and gems.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::progression::{LevelProgress, apply_xp};

const DEFAULT_RITES: &str = include_str!("../assets/rites.json");

/// One meditation rite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiteDef {
    pub id: String,
    pub title: String,
    /// Intended sit length; the engine trusts the caller's timer.
    pub minutes: u32,
    pub xp: u64,
    pub gems: i64,
    pub icon: String,
}

/// Container for all rites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RiteCatalog {
    pub rites: Vec<RiteDef>,
}

impl RiteCatalog {
    #[must_use]
    pub fn empty() -> Self {
        Self { rites: Vec::new() }
    }

    /// Load the catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid rite data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The embedded default catalog.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static BUILTIN: Lazy<RiteCatalog> = Lazy::new(|| {
            RiteCatalog::from_json(DEFAULT_RITES).expect("embedded rite catalog is valid JSON")
        });
        &BUILTIN
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RiteDef> {
        self.rites.iter().find(|rite| rite.id == id)
    }
}

/// Outcome of a completed rite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiteOutcome {
    pub xp_gained: u64,
    pub gems_gained: i64,
    pub progress: LevelProgress,
}

/// Fold a rite's award into the hero's level/xp.
#[must_use]
pub fn complete_rite(rite: &RiteDef, level: u32, xp: u64) -> RiteOutcome {
    RiteOutcome {
        xp_gained: rite.xp,
        gems_gained: rite.gems,
        progress: apply_xp(level, xp, rite.xp),
    }
}

//! Static exercise reference data: the deck-card library feeding the random
//! generator, the exercise library backing trainer/manual modes, and the
//! narrative templates applied to custom routine entries.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const DEFAULT_CARDS: &str = include_str!("../assets/cards.json");
const DEFAULT_EXERCISES: &str = include_str!("../assets/exercises.json");
const DEFAULT_TEMPLATES: &str = include_str!("../assets/templates.json");

/// Movement category used for deck pools and class weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Squat,
    Push,
    Pull,
    Core,
    Cardio,
}

impl Category {
    /// Weight-table walk order. Matches the order category weights are
    /// declared in, so the cumulative scan is stable.
    pub const WEIGHTED_ORDER: [Self; 5] = [
        Self::Push,
        Self::Pull,
        Self::Squat,
        Self::Core,
        Self::Cardio,
    ];

    pub const ALL: [Self; 5] = [
        Self::Squat,
        Self::Push,
        Self::Pull,
        Self::Core,
        Self::Cardio,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Squat => "squat",
            Self::Push => "push",
            Self::Pull => "pull",
            Self::Core => "core",
            Self::Cardio => "cardio",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "squat" => Ok(Self::Squat),
            "push" => Ok(Self::Push),
            "pull" => Ok(Self::Pull),
            "core" => Ok(Self::Core),
            "cardio" => Ok(Self::Cardio),
            _ => Err(()),
        }
    }
}

/// Training location. `Any` only ever appears as a player request; catalog
/// entries list concrete venues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Home,
    Gym,
    Park,
    Any,
}

impl Location {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Gym => "gym",
            Self::Park => "park",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Self::Home),
            "gym" => Ok(Self::Gym),
            "park" => Ok(Self::Park),
            "any" => Ok(Self::Any),
            _ => Err(()),
        }
    }
}

/// Primary muscle group of a library exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Muscle {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
    Cardio,
    Fullbody,
}

/// Training style of a library exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingStyle {
    Strength,
    Hypertrophy,
    Cardio,
    Stretching,
    Functional,
}

/// Narrative archetype for custom (non-library) routine entries.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    #[default]
    HeavyLift,
    FastCardio,
    BalanceCore,
    HighReps,
    Stretching,
}

impl Archetype {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HeavyLift => "heavy_lift",
            Self::FastCardio => "fast_cardio",
            Self::BalanceCore => "balance_core",
            Self::HighReps => "high_reps",
            Self::Stretching => "stretching",
        }
    }

    /// Parse a stored tag, falling back to `HeavyLift` for anything
    /// unrecognized. Unknown archetypes must not fail a whole hero load.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Archetype {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heavy_lift" => Ok(Self::HeavyLift),
            "fast_cardio" => Ok(Self::FastCardio),
            "balance_core" => Ok(Self::BalanceCore),
            "high_reps" => Ok(Self::HighReps),
            "stretching" => Ok(Self::Stretching),
            _ => Err(()),
        }
    }
}

/// One card in the random-generator deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckCard {
    pub category: Category,
    pub title: String,
    pub lore: String,
    pub action: String,
    pub meta: String,
    pub icon: String,
    #[serde(default)]
    pub locations: Vec<Location>,
}

impl DeckCard {
    /// Whether the card can be dealt for the requested venue.
    #[must_use]
    pub fn allows(&self, location: Location) -> bool {
        location == Location::Any || self.locations.contains(&location)
    }
}

/// Container for the deck-card library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CardLibrary {
    pub cards: Vec<DeckCard>,
}

impl CardLibrary {
    /// Create an empty library (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self { cards: Vec::new() }
    }

    /// Load the library from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid card data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The embedded default library.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static BUILTIN: Lazy<CardLibrary> = Lazy::new(|| {
            CardLibrary::from_json(DEFAULT_CARDS).expect("embedded card library is valid JSON")
        });
        &BUILTIN
    }

    /// All cards of one category playable at the given location.
    #[must_use]
    pub fn pool(&self, category: Category, location: Location) -> Vec<DeckCard> {
        self.cards
            .iter()
            .filter(|card| card.category == category && card.allows(location))
            .cloned()
            .collect()
    }
}

/// One entry in the exercise library (trainer/manual modes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDef {
    pub id: String,
    pub name: String,
    pub muscle: Muscle,
    pub style: TrainingStyle,
    #[serde(default)]
    pub locations: Vec<Location>,
    pub rpg_title: String,
    pub rpg_lore: String,
    pub icon: String,
}

/// Container for the exercise library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExerciseLibrary {
    pub exercises: Vec<ExerciseDef>,
}

impl ExerciseLibrary {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            exercises: Vec::new(),
        }
    }

    /// Load the library from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid exercise data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The embedded default library.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static BUILTIN: Lazy<ExerciseLibrary> = Lazy::new(|| {
            ExerciseLibrary::from_json(DEFAULT_EXERCISES)
                .expect("embedded exercise library is valid JSON")
        });
        &BUILTIN
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ExerciseDef> {
        self.exercises.iter().find(|ex| ex.id == id)
    }

    /// Case-insensitive name search, as the manual-builder picker filters.
    #[must_use]
    pub fn search(&self, needle: &str) -> Vec<&ExerciseDef> {
        let needle = needle.to_lowercase();
        self.exercises
            .iter()
            .filter(|ex| ex.name.to_lowercase().contains(&needle))
            .collect()
    }
}

/// Narrative template backing one archetype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpgTemplate {
    pub titles: Vec<String>,
    pub lore: String,
}

/// Archetype-keyed template set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TemplateSet(pub BTreeMap<Archetype, RpgTemplate>);

impl TemplateSet {
    /// Load templates from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid templates.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The embedded default template set.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static BUILTIN: Lazy<TemplateSet> = Lazy::new(|| {
            TemplateSet::from_json(DEFAULT_TEMPLATES)
                .expect("embedded template set is valid JSON")
        });
        &BUILTIN
    }

    /// Template for an archetype, falling back to `HeavyLift`.
    #[must_use]
    pub fn get(&self, archetype: Archetype) -> Option<&RpgTemplate> {
        self.0
            .get(&archetype)
            .or_else(|| self.0.get(&Archetype::HeavyLift))
    }
}

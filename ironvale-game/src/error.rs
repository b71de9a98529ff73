//! Engine error taxonomy.
//!
//! Every failure is user-surfaceable and leaves prior state untouched; the
//! engine never retries and never panics. Secondary-write failures (guild
//! aggregates, watcher fan-out) are swallowed at the boundary instead of
//! becoming variants here.

use thiserror::Error;

use crate::hero::SplitId;

#[derive(Debug, Error)]
pub enum GameError {
    /// Validation: hero creation requires a non-empty display name.
    #[error("hero name must not be empty")]
    EmptyHeroName,

    /// Validation: hero creation requires at least one training location.
    #[error("no training location selected")]
    NoLocationSelected,

    /// Validation: a dungeon cannot be finalized with zero completed missions.
    #[error("complete at least one mission before finishing the dungeon")]
    NothingCompleted,

    /// Validation: the session is finished for the day and rejects mutation.
    #[error("today's dungeon is already finished")]
    SessionFinished,

    /// Validation: no active session exists for today.
    #[error("no dungeon has been generated for today")]
    NoActiveSession,

    /// Validation: exercises can only be appended to a manually built
    /// session.
    #[error("today's dungeon was not built manually")]
    NotManualSession,

    /// Exhaustion: the daily reroll allowance is spent.
    #[error("the dungeon refuses to change again today ({spent} rerolls used)")]
    RerollLimitReached { spent: u8 },

    /// Validation: the requested routine split holds no exercises.
    #[error("routine split {0} is empty")]
    EmptyRoutineSplit(SplitId),

    #[error("hero {0:?} not found")]
    HeroNotFound(String),

    #[error("exercise {0:?} not found in the library")]
    UnknownExercise(String),

    #[error("item {0:?} not found in the catalog")]
    UnknownItem(String),

    #[error("quest {0:?} not found")]
    UnknownQuest(String),

    #[error("rite {0:?} not found")]
    UnknownRite(String),

    /// Validation: only consumables can be used from the inventory.
    #[error("item {0:?} is equipment, not a consumable")]
    NotConsumable(String),

    /// Validation: the hero does not carry the requested item.
    #[error("item {0:?} is not in the inventory")]
    ItemNotOwned(String),

    /// Validation: the quest's completion gate has not elapsed yet.
    #[error("quest {0:?} was already completed today")]
    QuestOnCooldown(String),

    /// A primary write against the remote store failed.
    #[error("store operation failed")]
    Store(#[source] anyhow::Error),
}

impl GameError {
    pub(crate) fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(anyhow::Error::new(err))
    }
}

//! The collaborator store: an opaque remote document database reached
//! through a trait, plus an in-memory reference implementation.
//!
//! Writes are fire-and-forget, last-write-wins. The push subscription and
//! any pull-style listing are deliberately unsynchronized; transient
//! staleness between them is accepted.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::hero::Hero;
use crate::quests::QuestMark;
use crate::session::Session;

/// Counter fields reachable through the atomic-increment operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterField {
    /// Hero streak, bumped by exactly one per finalized day.
    Streak,
    /// Guild weekly XP aggregate.
    GuildWeeklyXp,
}

impl fmt::Display for CounterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Streak => "streak",
            Self::GuildWeeklyXp => "weekly_xp",
        };
        f.write_str(label)
    }
}

/// Partial update of a hero document. Unset fields are left untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HeroPatch {
    pub xp: Option<u64>,
    pub gold: Option<i64>,
    pub gems: Option<i64>,
    pub level: Option<u32>,
    /// Union semantics: each id is added only if not already present.
    #[serde(default)]
    pub inventory_add: Vec<String>,
    /// Remove exactly one stacked instance of this id.
    #[serde(default)]
    pub inventory_remove_one: Option<String>,
    /// Mark the current session finished.
    #[serde(default)]
    pub finish_session: bool,
    /// Quest-log marks to upsert.
    #[serde(default)]
    pub quest_marks: Vec<(String, QuestMark)>,
}

/// Callback invoked with the fresh hero document after every write.
pub type HeroWatcher = Box<dyn Fn(&Hero)>;

/// Handle identifying a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Trait for abstracting the remote document store.
/// Platform-specific implementations should provide this.
pub trait HeroStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Point lookup of a hero by owner identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be reached.
    fn load_hero(&self, hero_id: &str) -> Result<Option<Hero>, Self::Error>;

    /// Create or replace a hero document (character creation).
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails; creation failures are always
    /// surfaced to the user.
    fn save_hero(&self, hero: &Hero) -> Result<(), Self::Error>;

    /// Upsert the hero's current-workout sub-document.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    fn save_session(&self, hero_id: &str, session: &Session) -> Result<(), Self::Error>;

    /// Apply a partial update to a hero document.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    fn patch_hero(&self, hero_id: &str, patch: &HeroPatch) -> Result<(), Self::Error>;

    /// Atomic numeric increment on a hero or guild document.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    fn increment_counter(
        &self,
        entity_id: &str,
        field: CounterField,
        delta: i64,
    ) -> Result<(), Self::Error>;

    /// Push notifications on hero document change.
    ///
    /// # Errors
    ///
    /// Returns an error when the subscription cannot be registered.
    fn subscribe(&self, hero_id: &str, watcher: HeroWatcher) -> Result<SubscriptionId, Self::Error>;
}

/// Error raised by [`MemoryStore`] when failure injection is armed.
#[derive(Debug, thiserror::Error)]
#[error("simulated store failure: {0}")]
pub struct MemoryStoreError(pub &'static str);

#[derive(Default)]
struct MemoryInner {
    heroes: HashMap<String, Hero>,
    guild_weekly_xp: HashMap<String, i64>,
    watchers: HashMap<String, Vec<(SubscriptionId, HeroWatcher)>>,
    next_subscription: u64,
    fail_guild_writes: bool,
}

/// In-memory store double used by the integration suites and available to
/// embedders as a reference implementation.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a hero document.
    pub fn put_hero(&self, hero: Hero) {
        self.inner.borrow_mut().heroes.insert(hero.id.clone(), hero);
    }

    /// Arm or disarm failure injection for guild counter writes.
    pub fn set_fail_guild_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_guild_writes = fail;
    }

    /// Current guild weekly aggregate (pull-style read, test support).
    #[must_use]
    pub fn guild_weekly_xp(&self, guild_id: &str) -> i64 {
        self.inner
            .borrow()
            .guild_weekly_xp
            .get(guild_id)
            .copied()
            .unwrap_or(0)
    }

    // Watchers are change-feed observers; they must not write back through
    // the store from inside the callback.
    fn notify(&self, hero_id: &str) {
        let hero = self.inner.borrow().heroes.get(hero_id).cloned();
        let Some(hero) = hero else { return };
        let inner = self.inner.borrow();
        if let Some(entries) = inner.watchers.get(hero_id) {
            for (_, watcher) in entries {
                watcher(&hero);
            }
        }
    }
}

impl HeroStore for MemoryStore {
    type Error = MemoryStoreError;

    fn load_hero(&self, hero_id: &str) -> Result<Option<Hero>, Self::Error> {
        Ok(self.inner.borrow().heroes.get(hero_id).cloned())
    }

    fn save_hero(&self, hero: &Hero) -> Result<(), Self::Error> {
        self.inner
            .borrow_mut()
            .heroes
            .insert(hero.id.clone(), hero.clone());
        self.notify(&hero.id);
        Ok(())
    }

    fn save_session(&self, hero_id: &str, session: &Session) -> Result<(), Self::Error> {
        {
            let mut inner = self.inner.borrow_mut();
            let hero = inner
                .heroes
                .get_mut(hero_id)
                .ok_or(MemoryStoreError("hero missing"))?;
            hero.current_workout = Some(session.clone());
        }
        self.notify(hero_id);
        Ok(())
    }

    fn patch_hero(&self, hero_id: &str, patch: &HeroPatch) -> Result<(), Self::Error> {
        {
            let mut inner = self.inner.borrow_mut();
            let hero = inner
                .heroes
                .get_mut(hero_id)
                .ok_or(MemoryStoreError("hero missing"))?;

            if let Some(xp) = patch.xp {
                hero.stats.xp = xp;
            }
            if let Some(gold) = patch.gold {
                hero.stats.gold = gold;
            }
            if let Some(gems) = patch.gems {
                hero.stats.gems = gems;
            }
            if let Some(level) = patch.level {
                hero.level = level;
            }
            for id in &patch.inventory_add {
                if !hero.inventory.contains(id) {
                    hero.inventory.push(id.clone());
                }
            }
            if let Some(id) = &patch.inventory_remove_one {
                hero.remove_one(id);
            }
            if patch.finish_session
                && let Some(session) = hero.current_workout.as_mut()
            {
                session.is_finished = true;
            }
            for (quest_id, mark) in &patch.quest_marks {
                hero.quest_log.0.insert(quest_id.clone(), *mark);
            }
        }
        self.notify(hero_id);
        Ok(())
    }

    fn increment_counter(
        &self,
        entity_id: &str,
        field: CounterField,
        delta: i64,
    ) -> Result<(), Self::Error> {
        match field {
            CounterField::Streak => {
                {
                    let mut inner = self.inner.borrow_mut();
                    let hero = inner
                        .heroes
                        .get_mut(entity_id)
                        .ok_or(MemoryStoreError("hero missing"))?;
                    let bumped = i64::from(hero.stats.streak) + delta;
                    hero.stats.streak = u32::try_from(bumped.max(0)).unwrap_or(0);
                }
                self.notify(entity_id);
            }
            CounterField::GuildWeeklyXp => {
                let mut inner = self.inner.borrow_mut();
                if inner.fail_guild_writes {
                    return Err(MemoryStoreError("guild write rejected"));
                }
                *inner
                    .guild_weekly_xp
                    .entry(entity_id.to_string())
                    .or_default() += delta;
            }
        }
        Ok(())
    }

    fn subscribe(&self, hero_id: &str, watcher: HeroWatcher) -> Result<SubscriptionId, Self::Error> {
        let mut inner = self.inner.borrow_mut();
        inner.next_subscription += 1;
        let id = SubscriptionId(inner.next_subscription);
        inner
            .watchers
            .entry(hero_id.to_string())
            .or_default()
            .push((id, watcher));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Location;
    use crate::hero::HeroClass;
    use std::cell::Cell;

    fn hero(id: &str) -> Hero {
        Hero::new(
            id,
            "Aldric",
            HeroClass::Vigor,
            [Location::Home].into_iter().collect(),
        )
        .unwrap()
    }

    #[test]
    fn patch_applies_partial_updates() {
        let store = MemoryStore::new();
        store.put_hero(hero("uid-1"));

        let patch = HeroPatch {
            xp: Some(42),
            gold: Some(120),
            level: Some(3),
            inventory_add: vec![String::from("medal_discipline")],
            ..HeroPatch::default()
        };
        store.patch_hero("uid-1", &patch).unwrap();

        let loaded = store.load_hero("uid-1").unwrap().unwrap();
        assert_eq!(loaded.stats.xp, 42);
        assert_eq!(loaded.stats.gold, 120);
        assert_eq!(loaded.level, 3);
        assert_eq!(loaded.inventory, vec![String::from("medal_discipline")]);
        assert_eq!(loaded.stats.gems, 0, "unset fields stay untouched");

        // Union semantics: adding again is a no-op.
        store.patch_hero("uid-1", &patch).unwrap();
        let loaded = store.load_hero("uid-1").unwrap().unwrap();
        assert_eq!(loaded.inventory.len(), 1);
    }

    #[test]
    fn counters_increment_atomically() {
        let store = MemoryStore::new();
        store.put_hero(hero("uid-1"));

        store
            .increment_counter("uid-1", CounterField::Streak, 1)
            .unwrap();
        store
            .increment_counter("guild-9", CounterField::GuildWeeklyXp, 250)
            .unwrap();
        store
            .increment_counter("guild-9", CounterField::GuildWeeklyXp, 50)
            .unwrap();

        assert_eq!(store.load_hero("uid-1").unwrap().unwrap().stats.streak, 1);
        assert_eq!(store.guild_weekly_xp("guild-9"), 300);
    }

    #[test]
    fn guild_failure_injection_only_hits_guild_writes() {
        let store = MemoryStore::new();
        store.put_hero(hero("uid-1"));
        store.set_fail_guild_writes(true);

        assert!(
            store
                .increment_counter("guild-9", CounterField::GuildWeeklyXp, 10)
                .is_err()
        );
        assert!(
            store
                .increment_counter("uid-1", CounterField::Streak, 1)
                .is_ok()
        );
    }

    #[test]
    fn subscription_sees_every_write() {
        let store = MemoryStore::new();
        store.put_hero(hero("uid-1"));

        let seen = Rc::new(Cell::new(0_u32));
        let seen_by_watcher = Rc::clone(&seen);
        store
            .subscribe(
                "uid-1",
                Box::new(move |_| seen_by_watcher.set(seen_by_watcher.get() + 1)),
            )
            .unwrap();

        store
            .patch_hero("uid-1", &HeroPatch::default())
            .unwrap();
        store
            .increment_counter("uid-1", CounterField::Streak, 1)
            .unwrap();
        assert_eq!(seen.get(), 2);
    }
}

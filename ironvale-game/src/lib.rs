//! Ironvale Game Engine
//!
//! Platform-agnostic core game logic for the Ironvale fitness RPG.
//! This crate provides all game mechanics without UI or platform-specific
//! dependencies: workout generation from a weighted card deck, the daily
//! session state machine, and the progression engine that turns a finished
//! session into XP, gold, levels and drops.

pub mod boss;
pub mod catalog;
pub mod constants;
pub mod deck;
pub mod error;
pub mod generator;
pub mod hero;
pub mod items;
pub mod numbers;
pub mod progression;
pub mod quests;
pub mod session;
pub mod store;
pub mod temple;
pub mod weights;

// Re-export commonly used types
pub use boss::{BossConfig, generate_boss};
pub use catalog::{
    Archetype, CardLibrary, Category, DeckCard, ExerciseDef, ExerciseLibrary, Location, Muscle,
    RpgTemplate, TemplateSet, TrainingStyle,
};
pub use deck::Deck;
pub use error::GameError;
pub use generator::{
    RandomWorkoutRequest, TrainerWorkoutRequest, generate_random, generate_trainer,
};
pub use hero::{Hero, HeroClass, RoutineTask, SplitId, Stats, WorkoutRoutine};
pub use items::{EquipSlot, ItemBonuses, ItemCatalog, ItemDef, ItemKind, Rarity};
pub use progression::{
    ConsumableOutcome, EquipBonuses, FinalizeSummary, LevelProgress, apply_xp, equipment_bonuses,
    finalize_session, level_threshold,
};
pub use quests::{QuestAvailability, QuestCatalog, QuestDef, QuestLog, QuestMark, QuestOutcome};
pub use session::{
    BossDecision, BossEvent, BossKind, ConfigPrompt, Mission, Session, SessionPhase, Zone,
    day_stamp,
};
pub use store::{
    CounterField, HeroPatch, HeroStore, HeroWatcher, MemoryStore, MemoryStoreError, SubscriptionId,
};
pub use temple::{RiteCatalog, RiteDef, RiteOutcome, complete_rite};
pub use weights::{CategoryWeights, WeightTable};

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;

use crate::constants::{
    LOG_BOSS_DEFEAT, LOG_BOSS_VICTORY, LOG_DROP_FOUND, LOG_DUNGEON_FINISHED,
    LOG_GUILD_SYNC_FAILED, LOG_LEVEL_UP, LOG_SESSION_MANUAL,
};

/// Main engine façade: owns the catalogs and injected configuration and
/// drives every state transition, persisting through the store trait.
///
/// The hero passed to each operation is the authoritative in-memory
/// aggregate; the engine mutates it and mirrors the change to the store.
pub struct GameEngine<S>
where
    S: HeroStore,
{
    store: S,
    cards: CardLibrary,
    exercises: ExerciseLibrary,
    templates: TemplateSet,
    items: ItemCatalog,
    quests: QuestCatalog,
    rites: RiteCatalog,
    weights: WeightTable,
    boss_cfg: BossConfig,
}

impl<S> GameEngine<S>
where
    S: HeroStore,
{
    /// Create an engine over the embedded catalogs and default tuning.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_config(store, WeightTable::default(), BossConfig::default())
    }

    /// Create an engine with injected weight/boss configuration.
    #[must_use]
    pub fn with_config(store: S, weights: WeightTable, boss_cfg: BossConfig) -> Self {
        Self {
            store,
            cards: CardLibrary::builtin().clone(),
            exercises: ExerciseLibrary::builtin().clone(),
            templates: TemplateSet::builtin().clone(),
            items: ItemCatalog::builtin().clone(),
            quests: QuestCatalog::builtin().clone(),
            rites: RiteCatalog::builtin().clone(),
            weights,
            boss_cfg,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn exercises(&self) -> &ExerciseLibrary {
        &self.exercises
    }

    #[must_use]
    pub const fn items(&self) -> &ItemCatalog {
        &self.items
    }

    #[must_use]
    pub const fn quests(&self) -> &QuestCatalog {
        &self.quests
    }

    #[must_use]
    pub const fn rites(&self) -> &RiteCatalog {
        &self.rites
    }

    /// Create and persist a level-1 hero.
    ///
    /// # Errors
    ///
    /// Validation errors for a blank name or empty location set; store
    /// errors are surfaced (creation is a primary write).
    pub fn create_hero(
        &self,
        id: impl Into<String>,
        name: impl Into<String>,
        class: HeroClass,
        unlocked_maps: std::collections::BTreeSet<Location>,
    ) -> Result<Hero, GameError> {
        let hero = Hero::new(id, name, class, unlocked_maps)?;
        self.store.save_hero(&hero).map_err(GameError::store)?;
        Ok(hero)
    }

    /// Point lookup of a hero by owner identity.
    ///
    /// # Errors
    ///
    /// `HeroNotFound` when no document exists; store errors are surfaced.
    pub fn load_hero(&self, hero_id: &str) -> Result<Hero, GameError> {
        self.store
            .load_hero(hero_id)
            .map_err(GameError::store)?
            .ok_or_else(|| GameError::HeroNotFound(hero_id.to_string()))
    }

    /// Derive the session lifecycle phase for today. A stored session whose
    /// date stamp is not today's is stale and sends the hero back to
    /// configuration, discarding its completion state.
    #[must_use]
    pub fn session_phase(&self, hero: &Hero, today: NaiveDate) -> SessionPhase {
        let stamp = day_stamp(today);
        match hero.session_for(&stamp) {
            Some(session) if session.is_finished => SessionPhase::Finished,
            Some(_) => SessionPhase::Active,
            None => {
                let prompt = if hero.workout_routine.is_some() {
                    ConfigPrompt::SplitSelect
                } else {
                    ConfigPrompt::LocationSelect
                };
                SessionPhase::Configuring(prompt)
            }
        }
    }

    /// Deal a random session for today, spending a reroll when one already
    /// exists.
    ///
    /// # Errors
    ///
    /// `RerollLimitReached` once the daily allowance is spent; store errors
    /// are surfaced. The prior session survives any failure.
    pub fn generate_random_workout<R: Rng>(
        &self,
        hero: &mut Hero,
        location: Location,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<(), GameError> {
        let stamp = day_stamp(today);
        let request = RandomWorkoutRequest {
            library: &self.cards,
            weights: &self.weights,
            boss_cfg: &self.boss_cfg,
            class: hero.class,
            location,
            streak: hero.stats.streak,
            today: &stamp,
            prior: hero.session_for(&stamp),
        };
        let session = generate_random(&request, rng)?;
        self.store
            .save_session(&hero.id, &session)
            .map_err(GameError::store)?;
        hero.current_workout = Some(session);
        Ok(())
    }

    /// Replay a trainer routine split as today's session. Never spends a
    /// reroll.
    ///
    /// # Errors
    ///
    /// `EmptyRoutineSplit` when the hero has no routine or the split is
    /// empty; store errors are surfaced.
    pub fn generate_trainer_workout<R: Rng>(
        &self,
        hero: &mut Hero,
        split: SplitId,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<(), GameError> {
        let stamp = day_stamp(today);
        let routine = hero
            .workout_routine
            .as_ref()
            .ok_or(GameError::EmptyRoutineSplit(split))?;
        let request = TrainerWorkoutRequest {
            library: &self.exercises,
            templates: &self.templates,
            boss_cfg: &self.boss_cfg,
            routine,
            split,
            streak: hero.stats.streak,
            today: &stamp,
            prior_reroll_count: hero
                .session_for(&stamp)
                .map_or(0, |session| session.reroll_count),
        };
        let session = generate_trainer(&request, rng)?;
        self.store
            .save_session(&hero.id, &session)
            .map_err(GameError::store)?;
        hero.current_workout = Some(session);
        Ok(())
    }

    /// Start an empty manual session for today.
    ///
    /// # Errors
    ///
    /// Store errors are surfaced.
    pub fn start_manual_session(
        &self,
        hero: &mut Hero,
        today: NaiveDate,
    ) -> Result<(), GameError> {
        let stamp = day_stamp(today);
        let reroll_count = hero
            .session_for(&stamp)
            .map_or(0, |session| session.reroll_count);
        let mut session = Session::new_manual(stamp, reroll_count);
        session.push_log(LOG_SESSION_MANUAL);
        self.store
            .save_session(&hero.id, &session)
            .map_err(GameError::store)?;
        hero.current_workout = Some(session);
        Ok(())
    }

    /// Append a library exercise to today's manual session.
    ///
    /// # Errors
    ///
    /// `UnknownExercise`, `NoActiveSession`, `NotManualSession`,
    /// `SessionFinished`; store errors are surfaced.
    pub fn add_manual_exercise(
        &self,
        hero: &mut Hero,
        exercise_id: &str,
        today: NaiveDate,
    ) -> Result<u32, GameError> {
        let exercise = self
            .exercises
            .get(exercise_id)
            .ok_or_else(|| GameError::UnknownExercise(exercise_id.to_string()))?
            .clone();
        let stamp = day_stamp(today);
        let hero_id = hero.id.clone();
        let session = hero
            .session_for_mut(&stamp)
            .ok_or(GameError::NoActiveSession)?;
        if !session.is_trainer {
            return Err(GameError::NotManualSession);
        }
        let mission_id = session
            .add_manual_mission(&exercise)
            .ok_or(GameError::SessionFinished)?;
        let snapshot = session.clone();
        self.store
            .save_session(&hero_id, &snapshot)
            .map_err(GameError::store)?;
        Ok(mission_id)
    }

    /// Flip completion for a mission. Finished sessions and unknown ids are
    /// no-ops (`Ok(false)`), matching the state-machine contract.
    ///
    /// # Errors
    ///
    /// `NoActiveSession` when today has no session; store errors surfaced.
    pub fn toggle_mission(
        &self,
        hero: &mut Hero,
        mission_id: u32,
        today: NaiveDate,
    ) -> Result<bool, GameError> {
        let stamp = day_stamp(today);
        let hero_id = hero.id.clone();
        let session = hero
            .session_for_mut(&stamp)
            .ok_or(GameError::NoActiveSession)?;
        if !session.toggle_mission(mission_id) {
            return Ok(false);
        }
        let snapshot = session.clone();
        self.store
            .save_session(&hero_id, &snapshot)
            .map_err(GameError::store)?;
        Ok(true)
    }

    /// Record the boss decision; the first decision wins. No-ops return
    /// `Ok(false)`.
    ///
    /// # Errors
    ///
    /// `NoActiveSession` when today has no session; store errors surfaced.
    pub fn decide_boss(
        &self,
        hero: &mut Hero,
        decision: BossDecision,
        today: NaiveDate,
    ) -> Result<bool, GameError> {
        let stamp = day_stamp(today);
        let hero_id = hero.id.clone();
        let session = hero
            .session_for_mut(&stamp)
            .ok_or(GameError::NoActiveSession)?;
        if !session.decide_boss(decision) {
            return Ok(false);
        }
        let snapshot = session.clone();
        self.store
            .save_session(&hero_id, &snapshot)
            .map_err(GameError::store)?;
        Ok(true)
    }

    /// Finalize today's session: compute rewards, persist the hero patch,
    /// bump the streak and contribute to the guild weekly aggregate.
    ///
    /// The guild write is fire-and-forget: its failure is logged and never
    /// rolls back the hero update.
    ///
    /// # Errors
    ///
    /// `NoActiveSession`, `SessionFinished`, `NothingCompleted`; hero-side
    /// store failures are surfaced (primary write).
    pub fn finalize_dungeon(
        &self,
        hero: &mut Hero,
        today: NaiveDate,
    ) -> Result<FinalizeSummary, GameError> {
        let stamp = day_stamp(today);
        let summary = {
            let session = hero.session_for(&stamp).ok_or(GameError::NoActiveSession)?;
            finalize_session(session, hero, &self.items)?
        };

        let patch = HeroPatch {
            xp: Some(summary.progress.xp),
            gold: Some(hero.stats.gold + summary.gold_gained),
            level: Some(summary.progress.level),
            inventory_add: summary.drops.clone(),
            finish_session: true,
            ..HeroPatch::default()
        };
        self.store
            .patch_hero(&hero.id, &patch)
            .map_err(GameError::store)?;
        self.store
            .increment_counter(&hero.id, CounterField::Streak, 1)
            .map_err(GameError::store)?;

        let mut guild_sync_failed = false;
        if let Some(guild_id) = hero.guild_id.clone() {
            let delta = i64::try_from(summary.xp_gained).unwrap_or(i64::MAX);
            if let Err(err) =
                self.store
                    .increment_counter(&guild_id, CounterField::GuildWeeklyXp, delta)
            {
                log::warn!("guild weekly-xp contribution dropped for {guild_id}: {err}");
                guild_sync_failed = true;
            }
        }

        // Mirror the persisted result into the aggregate.
        hero.stats.xp = summary.progress.xp;
        hero.stats.gold += summary.gold_gained;
        hero.stats.streak = summary.next_streak;
        hero.level = summary.progress.level;
        for drop in &summary.drops {
            if !hero.owns(drop) {
                hero.inventory.push(drop.clone());
            }
        }
        if let Some(session) = hero.session_for_mut(&stamp) {
            session.is_finished = true;
            session.push_log(LOG_DUNGEON_FINISHED);
            if summary.progress.leveled_up {
                session.push_log(LOG_LEVEL_UP);
            }
            if !summary.drops.is_empty() {
                session.push_log(LOG_DROP_FOUND);
            }
            if session.boss.is_some() {
                session.push_log(if summary.boss_victory {
                    LOG_BOSS_VICTORY
                } else {
                    LOG_BOSS_DEFEAT
                });
            }
            if guild_sync_failed {
                session.push_log(LOG_GUILD_SYNC_FAILED);
            }
        }

        Ok(summary)
    }

    /// Complete a recurring side-quest. XP always pays; gold only when its
    /// cooldown has expired.
    ///
    /// # Errors
    ///
    /// `UnknownQuest`, `QuestOnCooldown`; store errors are surfaced.
    pub fn complete_quest(
        &self,
        hero: &mut Hero,
        quest_id: &str,
        now: DateTime<Utc>,
    ) -> Result<QuestOutcome, GameError> {
        let def = self
            .quests
            .get(quest_id)
            .ok_or_else(|| GameError::UnknownQuest(quest_id.to_string()))?;
        let outcome = quests::complete_quest(
            def,
            hero.quest_log.mark(quest_id),
            now,
            hero.level,
            hero.stats.xp,
        )?;

        hero.quest_log.record(quest_id, now, outcome.gold_paid);
        let mark = *hero
            .quest_log
            .mark(quest_id)
            .unwrap_or(&QuestMark::default());
        let patch = HeroPatch {
            xp: Some(outcome.progress.xp),
            gold: outcome
                .gold_paid
                .then(|| hero.stats.gold + outcome.gold_gained),
            level: Some(outcome.progress.level),
            quest_marks: vec![(quest_id.to_string(), mark)],
            ..HeroPatch::default()
        };
        self.store
            .patch_hero(&hero.id, &patch)
            .map_err(GameError::store)?;

        hero.stats.xp = outcome.progress.xp;
        hero.stats.gold += outcome.gold_gained;
        hero.level = outcome.progress.level;
        Ok(outcome)
    }

    /// Complete a temple rite, granting XP and gems.
    ///
    /// # Errors
    ///
    /// `UnknownRite`; store errors are surfaced.
    pub fn complete_rite(&self, hero: &mut Hero, rite_id: &str) -> Result<RiteOutcome, GameError> {
        let rite = self
            .rites
            .get(rite_id)
            .ok_or_else(|| GameError::UnknownRite(rite_id.to_string()))?;
        let outcome = temple::complete_rite(rite, hero.level, hero.stats.xp);

        let patch = HeroPatch {
            xp: Some(outcome.progress.xp),
            gems: Some(hero.stats.gems + outcome.gems_gained),
            level: Some(outcome.progress.level),
            ..HeroPatch::default()
        };
        self.store
            .patch_hero(&hero.id, &patch)
            .map_err(GameError::store)?;

        hero.stats.xp = outcome.progress.xp;
        hero.stats.gems += outcome.gems_gained;
        hero.level = outcome.progress.level;
        Ok(outcome)
    }

    /// Drink a consumable: remove one stacked instance and fold its XP
    /// grant into the hero.
    ///
    /// # Errors
    ///
    /// `UnknownItem`, `NotConsumable`, `ItemNotOwned`; store errors are
    /// surfaced.
    pub fn use_consumable(
        &self,
        hero: &mut Hero,
        item_id: &str,
    ) -> Result<ConsumableOutcome, GameError> {
        let item = self
            .items
            .get(item_id)
            .ok_or_else(|| GameError::UnknownItem(item_id.to_string()))?;
        if item.kind != ItemKind::Consumable {
            return Err(GameError::NotConsumable(item_id.to_string()));
        }
        if !hero.owns(item_id) {
            return Err(GameError::ItemNotOwned(item_id.to_string()));
        }

        let xp_gained = item.use_xp.unwrap_or(0);
        let progress = apply_xp(hero.level, hero.stats.xp, xp_gained);

        let patch = HeroPatch {
            xp: Some(progress.xp),
            level: Some(progress.level),
            inventory_remove_one: Some(item_id.to_string()),
            ..HeroPatch::default()
        };
        self.store
            .patch_hero(&hero.id, &patch)
            .map_err(GameError::store)?;

        hero.remove_one(item_id);
        hero.stats.xp = progress.xp;
        hero.level = progress.level;
        Ok(ConsumableOutcome {
            xp_gained,
            progress,
        })
    }

    /// Register a push watcher for a hero document. The watcher is an
    /// external change feed; it must not mutate the aggregate directly.
    ///
    /// # Errors
    ///
    /// Store errors are surfaced.
    pub fn watch_hero(
        &self,
        hero_id: &str,
        watcher: HeroWatcher,
    ) -> Result<SubscriptionId, GameError> {
        self.store
            .subscribe(hero_id, watcher)
            .map_err(GameError::store)
    }
}

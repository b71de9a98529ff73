//! Workout generation: composes a full day's session.
//!
//! Random mode deals eight cards across three reward tiers using
//! class-weighted category picks; trainer mode replays a stored routine
//! split; manual mode starts empty and fills one exercise at a time.

use rand::Rng;
use smallvec::SmallVec;

use crate::boss::{BossConfig, generate_boss};
use crate::catalog::{CardLibrary, Category, ExerciseLibrary, Location, TemplateSet};
use crate::constants::{
    DEBUG_ENV_VAR, LOG_BOSS_SPAWNED, LOG_SESSION_GENERATED, LOG_SESSION_REROLLED, MAX_REROLLS,
    RANDOM_DRAW_COUNT,
};
use crate::deck::Deck;
use crate::error::GameError;
use crate::hero::{HeroClass, SplitId, WorkoutRoutine};
use crate::session::{Mission, Session, Zone};
use crate::weights::WeightTable;

#[cfg(debug_assertions)]
fn debug_log_enabled() -> bool {
    matches!(std::env::var(DEBUG_ENV_VAR), Ok(val) if val != "0")
}

#[cfg(not(debug_assertions))]
const fn debug_log_enabled() -> bool {
    false
}

/// Inputs for a random-mode generation pass.
pub struct RandomWorkoutRequest<'a> {
    pub library: &'a CardLibrary,
    pub weights: &'a WeightTable,
    pub boss_cfg: &'a BossConfig,
    pub class: HeroClass,
    pub location: Location,
    pub streak: u32,
    /// Today's day stamp; becomes the session date.
    pub today: &'a str,
    /// Today's stored session, if one exists. Regenerating a non-empty
    /// session consumes a reroll.
    pub prior: Option<&'a Session>,
}

/// Deal a full random session.
///
/// # Errors
///
/// Returns [`GameError::RerollLimitReached`] when today's reroll allowance
/// is spent; the prior session is left untouched.
pub fn generate_random<R: Rng>(
    request: &RandomWorkoutRequest<'_>,
    rng: &mut R,
) -> Result<Session, GameError> {
    let reroll_count = next_reroll_count(request.prior)?;
    let is_reroll = reroll_count > 0 && request.prior.is_some_and(|s| !s.missions.is_empty());

    let mut deck = Deck::build(request.library, request.location);
    let mut missions: SmallVec<[Mission; 8]> = SmallVec::new();

    let plan: [(Option<Category>, Zone); RANDOM_DRAW_COUNT] = [
        (Some(Category::Cardio), Zone::Zone1),
        (None, Zone::Zone1),
        (None, Zone::Zone1),
        (None, Zone::Zone2),
        (None, Zone::Zone2),
        (None, Zone::Zone3),
        (None, Zone::Zone3),
        (Some(Category::Core), Zone::Zone3),
    ];

    for (slot, (fixed, zone)) in plan.into_iter().enumerate() {
        let category = fixed
            .unwrap_or_else(|| request.weights.pick_category(request.class, rng));
        let id = u32::try_from(slot).unwrap_or(0) + 1;
        if let Some(mission) = deck.draw(category, zone, id, rng) {
            missions.push(mission);
        }
    }

    if debug_log_enabled() {
        println!(
            "Workout generation | class:{} location:{} dealt:{} reroll:{}",
            request.class,
            request.location,
            missions.len(),
            reroll_count
        );
    }

    let boss = generate_boss(request.streak, request.boss_cfg, rng);

    let mut session =
        Session::new_random(request.today.to_string(), missions, boss, reroll_count);
    session.push_log(if is_reroll {
        LOG_SESSION_REROLLED
    } else {
        LOG_SESSION_GENERATED
    });
    if session.boss.is_some() {
        session.push_log(LOG_BOSS_SPAWNED);
    }
    Ok(session)
}

fn next_reroll_count(prior: Option<&Session>) -> Result<u8, GameError> {
    match prior {
        Some(session) if !session.missions.is_empty() => {
            if session.reroll_count >= MAX_REROLLS {
                return Err(GameError::RerollLimitReached {
                    spent: session.reroll_count,
                });
            }
            Ok(session.reroll_count + 1)
        }
        Some(session) => Ok(session.reroll_count),
        None => Ok(0),
    }
}

/// Inputs for a trainer-mode generation pass.
pub struct TrainerWorkoutRequest<'a> {
    pub library: &'a ExerciseLibrary,
    pub templates: &'a TemplateSet,
    pub boss_cfg: &'a BossConfig,
    pub routine: &'a WorkoutRoutine,
    pub split: SplitId,
    pub streak: u32,
    pub today: &'a str,
    /// Trainer sessions never spend rerolls; the prior counter is carried.
    pub prior_reroll_count: u8,
}

/// Replay a stored routine split as today's session.
///
/// # Errors
///
/// Returns [`GameError::EmptyRoutineSplit`] when the split holds nothing.
pub fn generate_trainer<R: Rng>(
    request: &TrainerWorkoutRequest<'_>,
    rng: &mut R,
) -> Result<Session, GameError> {
    let tasks = request
        .routine
        .split(request.split)
        .filter(|tasks| !tasks.is_empty())
        .ok_or(GameError::EmptyRoutineSplit(request.split))?;

    let (xp, gold) = Zone::Trainer.rewards();
    let mut missions: SmallVec<[Mission; 8]> = SmallVec::new();
    for (index, task) in tasks.iter().enumerate() {
        let mut title = String::from("Focused Training");
        let mut lore = String::from("Follow the instructions.");
        let mut icon = String::from("dumbbell");

        if task.is_custom {
            if let Some(template) = request.templates.get(task.archetype) {
                if !template.titles.is_empty() {
                    title = template.titles[rng.gen_range(0..template.titles.len())].clone();
                }
                lore = template.lore.clone();
            }
            icon = String::from("notebook-edit");
        } else if let Some(def) = task.id.as_deref().and_then(|id| request.library.get(id)) {
            title = def.rpg_title.clone();
            lore = def.rpg_lore.clone();
            icon = def.icon.clone();
        }

        missions.push(Mission {
            id: u32::try_from(index).unwrap_or(0) + 1,
            title,
            lore,
            action: task.name.clone(),
            meta: task.meta.clone(),
            xp,
            gold,
            zone: Zone::Trainer,
            icon,
        });
    }

    let boss = generate_boss(request.streak, request.boss_cfg, rng);

    let mut session = Session::new_trainer(
        request.today.to_string(),
        missions,
        boss,
        request.prior_reroll_count,
    );
    session.push_log(LOG_SESSION_GENERATED);
    if session.boss.is_some() {
        session.push_log(LOG_BOSS_SPAWNED);
    }
    Ok(session)
}

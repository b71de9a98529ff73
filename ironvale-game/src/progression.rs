//! Reward computation for a finalized session: zone sums, boss resolution,
//! equipment bonus composition, the level-up loop and drop resolution.
//!
//! Everything here is pure; the engine persists the results.

use serde::{Deserialize, Serialize};

use crate::constants::{LEVEL_XP_STEP, MEDAL_DISCIPLINE, STREAK_DROP_CYCLE, SWORD_DEMON};
use crate::error::GameError;
use crate::hero::Hero;
use crate::items::ItemCatalog;
use crate::numbers::round_f64_to_i64;
use crate::session::{BossDecision, BossKind, Session, Zone};

/// XP required to leave the given level.
#[must_use]
pub fn level_threshold(level: u32) -> u64 {
    u64::from(level) * LEVEL_XP_STEP
}

/// Result of folding an XP award into level/xp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    pub xp: u64,
    pub leveled_up: bool,
}

/// Run the level-up loop: fold `gain` into `xp`, carrying overflow into
/// level-ups. Terminates because the threshold grows with each level while
/// the pool is finite; afterwards `xp < level * 100` always holds.
#[must_use]
pub fn apply_xp(level: u32, xp: u64, gain: u64) -> LevelProgress {
    let mut level = level.max(1);
    let mut xp = xp.saturating_add(gain);
    let mut leveled_up = false;
    while xp >= level_threshold(level) {
        xp -= level_threshold(level);
        level += 1;
        leveled_up = true;
    }
    LevelProgress {
        level,
        xp,
        leveled_up,
    }
}

/// Composed equipment modifiers: flat XP stacks additively, multipliers
/// compose multiplicatively from 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquipBonuses {
    pub xp_flat: f64,
    pub xp_multiplier: f64,
    pub gold_multiplier: f64,
}

impl Default for EquipBonuses {
    fn default() -> Self {
        Self {
            xp_flat: 0.0,
            xp_multiplier: 1.0,
            gold_multiplier: 1.0,
        }
    }
}

/// Fold bonuses over equipped item ids. Ids without a catalog entry or
/// without bonuses contribute nothing.
pub fn equipment_bonuses<'a>(
    equipped: impl Iterator<Item = &'a str>,
    catalog: &ItemCatalog,
) -> EquipBonuses {
    let mut folded = EquipBonuses::default();
    for id in equipped {
        let Some(bonuses) = catalog.get(id).and_then(|item| item.bonuses.as_ref()) else {
            continue;
        };
        folded.xp_flat += bonuses.xp_flat;
        if let Some(mult) = bonuses.xp_multiplier {
            folded.xp_multiplier *= mult;
        }
        if let Some(mult) = bonuses.gold_multiplier {
            folded.gold_multiplier *= mult;
        }
    }
    folded
}

/// Outcome of drinking a consumable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumableOutcome {
    pub xp_gained: u64,
    pub progress: LevelProgress,
}

/// Everything finalize decided, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeSummary {
    pub xp_gained: u64,
    pub gold_gained: i64,
    pub boss_victory: bool,
    pub drops: Vec<String>,
    pub next_streak: u32,
    pub progress: LevelProgress,
}

/// Compute the day's rewards for an active session.
///
/// # Errors
///
/// Rejects finished sessions and sessions with zero completed missions; in
/// both cases nothing changes.
pub fn finalize_session(
    session: &Session,
    hero: &Hero,
    catalog: &ItemCatalog,
) -> Result<FinalizeSummary, GameError> {
    if session.is_finished {
        return Err(GameError::SessionFinished);
    }
    if session.completed.is_empty() {
        return Err(GameError::NothingCompleted);
    }

    // Fleeing a blocker makes zone3 content unscorable. The generator never
    // deals a blocker today; sessions that carry one are still honored.
    let zone3_blocked = session
        .boss
        .as_ref()
        .is_some_and(|boss| boss.kind == BossKind::Blocker)
        && session.boss_decision == Some(BossDecision::Flee);

    let mut sum_xp: u64 = 0;
    let mut sum_gold: i64 = 0;
    for mission in &session.missions {
        if !session.completed.contains(&mission.id) {
            continue;
        }
        if !session.is_trainer && mission.zone == Zone::Zone3 && zone3_blocked {
            continue;
        }
        sum_xp += u64::from(mission.xp);
        sum_gold += i64::from(mission.gold);
    }

    let mut boss_victory = false;
    if let Some(boss) = &session.boss {
        let won = match boss.kind {
            BossKind::Major => session.completed.len() == session.missions.len(),
            BossKind::Rare | BossKind::Blocker => {
                session.boss_decision == Some(BossDecision::Fight)
            }
        };
        if won {
            sum_xp += u64::from(boss.bonus_xp);
            sum_gold += i64::from(boss.bonus_gold);
            boss_victory = true;
        }
    }

    let bonuses = equipment_bonuses(hero.equipped_ids(), catalog);
    #[allow(clippy::cast_precision_loss)]
    let completed_count = session.completed.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let xp_gained = {
        let raw = (sum_xp as f64 + bonuses.xp_flat * completed_count) * bonuses.xp_multiplier;
        u64::try_from(round_f64_to_i64(raw)).unwrap_or(0)
    };
    #[allow(clippy::cast_precision_loss)]
    let gold_gained = round_f64_to_i64(sum_gold as f64 * bonuses.gold_multiplier);

    let progress = apply_xp(hero.level, hero.stats.xp, xp_gained);
    let next_streak = hero.stats.streak + 1;

    let mut drops = Vec::new();
    if next_streak % STREAK_DROP_CYCLE == 0 && !hero.owns(MEDAL_DISCIPLINE) {
        drops.push(String::from(MEDAL_DISCIPLINE));
    }
    let major_won = boss_victory
        && session
            .boss
            .as_ref()
            .is_some_and(|boss| boss.kind == BossKind::Major);
    if major_won && !hero.owns(SWORD_DEMON) {
        drops.push(String::from(SWORD_DEMON));
    }

    Ok(FinalizeSummary {
        xp_gained,
        gold_gained,
        boss_victory,
        drops,
        next_streak,
        progress,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Location;
    use crate::hero::HeroClass;
    use crate::items::EquipSlot;
    use crate::session::{BossEvent, Mission};
    use smallvec::smallvec;
    use std::collections::BTreeSet;

    fn mission(id: u32, zone: Zone) -> Mission {
        let (xp, gold) = zone.rewards();
        Mission {
            id,
            title: format!("Mission {id}"),
            lore: String::new(),
            action: String::from("Push-up"),
            meta: String::from("3x12"),
            xp,
            gold,
            zone,
            icon: String::from("dumbbell"),
        }
    }

    fn hero() -> Hero {
        Hero::new(
            "uid-1",
            "Aldric",
            HeroClass::Forca,
            [Location::Gym].into_iter().collect(),
        )
        .unwrap()
    }

    fn boss(kind: BossKind, bonus_xp: u32, bonus_gold: u32) -> BossEvent {
        BossEvent {
            kind,
            name: String::from("Boss"),
            description: String::new(),
            bonus_xp,
            bonus_gold,
            fight_condition: String::new(),
            flee_condition: String::new(),
        }
    }

    fn session_with(
        missions: smallvec::SmallVec<[Mission; 8]>,
        completed: &[u32],
        boss: Option<BossEvent>,
    ) -> Session {
        let mut session = Session::new_random(String::from("2025-03-01"), missions, boss, 0);
        session.completed = completed.iter().copied().collect::<BTreeSet<_>>();
        session
    }

    #[test]
    fn level_loop_terminates_and_keeps_invariant() {
        let progress = apply_xp(1, 0, 0);
        assert_eq!((progress.level, progress.xp), (1, 0));
        assert!(!progress.leveled_up);

        let progress = apply_xp(1, 90, 20);
        assert_eq!((progress.level, progress.xp), (2, 10));
        assert!(progress.leveled_up);

        // A huge award crosses many levels in one call.
        let progress = apply_xp(1, 0, 1_000);
        assert!(progress.level >= 4);
        assert!(progress.xp < level_threshold(progress.level));
    }

    #[test]
    fn equipment_bonuses_compose_additively_and_multiplicatively() {
        let catalog = ItemCatalog::from_json(
            r#"{"items": [
                {"id": "a", "name": "A", "kind": "weapon", "rarity": "common",
                 "icon": "sword", "description": "", "bonuses": {"xp_multiplier": 1.1}},
                {"id": "b", "name": "B", "kind": "armor", "rarity": "common",
                 "icon": "tshirt-crew", "description": "", "bonuses": {"xp_multiplier": 1.2}},
                {"id": "c", "name": "C", "kind": "shield", "rarity": "common",
                 "icon": "shield", "description": "", "bonuses": {"xp_flat": 5}}
            ]}"#,
        )
        .unwrap();

        let mut hero = hero();
        hero.equipped.insert(EquipSlot::Weapon, String::from("a"));
        hero.equipped.insert(EquipSlot::Armor, String::from("b"));
        hero.equipped.insert(EquipSlot::Shield, String::from("c"));
        hero.equipped
            .insert(EquipSlot::Accessory, String::from("missing-from-catalog"));

        let mut session = session_with(
            smallvec![mission(1, Zone::Zone1), mission(2, Zone::Zone1)],
            &[1, 2],
            None,
        );
        // Pin the base sum at 40 xp across the two completed missions.
        session.missions[0].xp = 25;
        session.missions[1].xp = 15;

        let summary = finalize_session(&session, &hero, &catalog).unwrap();
        // round((40 + 5*2) * 1.1 * 1.2) = round(66.0) = 66
        assert_eq!(summary.xp_gained, 66);
    }

    #[test]
    fn major_boss_requires_every_mission() {
        let catalog = ItemCatalog::empty();
        let hero = hero();
        let missions: smallvec::SmallVec<[Mission; 8]> = smallvec![
            mission(1, Zone::Zone1),
            mission(2, Zone::Zone2),
            mission(3, Zone::Zone3),
        ];

        let partial = session_with(
            missions.clone(),
            &[1, 2],
            Some(boss(BossKind::Major, 500, 200)),
        );
        let summary = finalize_session(&partial, &hero, &catalog).unwrap();
        assert!(!summary.boss_victory, "2 of 3 completed wins nothing");
        assert_eq!(summary.xp_gained, 45);

        let full = session_with(missions, &[1, 2, 3], Some(boss(BossKind::Major, 500, 200)));
        let summary = finalize_session(&full, &hero, &catalog).unwrap();
        assert!(summary.boss_victory);
        assert_eq!(summary.xp_gained, 15 + 30 + 40 + 500);
        assert!(summary.drops.contains(&String::from(SWORD_DEMON)));
    }

    #[test]
    fn rare_boss_pays_on_fight_decision_only() {
        let catalog = ItemCatalog::empty();
        let hero = hero();
        let missions: smallvec::SmallVec<[Mission; 8]> = smallvec![mission(1, Zone::Zone1)];

        let mut fought = session_with(
            missions.clone(),
            &[1],
            Some(boss(BossKind::Rare, 100, 50)),
        );
        fought.boss_decision = Some(BossDecision::Fight);
        let summary = finalize_session(&fought, &hero, &catalog).unwrap();
        assert!(summary.boss_victory);
        assert_eq!(summary.xp_gained, 115);

        let undecided = session_with(missions, &[1], Some(boss(BossKind::Rare, 100, 50)));
        let summary = finalize_session(&undecided, &hero, &catalog).unwrap();
        assert!(!summary.boss_victory, "no decision means no bonus, no penalty");
        assert_eq!(summary.xp_gained, 15);
    }

    #[test]
    fn fleeing_a_blocker_voids_zone3_rewards() {
        let catalog = ItemCatalog::empty();
        let hero = hero();
        let missions: smallvec::SmallVec<[Mission; 8]> =
            smallvec![mission(1, Zone::Zone1), mission(2, Zone::Zone3)];

        let mut fled = session_with(
            missions.clone(),
            &[1, 2],
            Some(boss(BossKind::Blocker, 0, 0)),
        );
        fled.boss_decision = Some(BossDecision::Flee);
        let summary = finalize_session(&fled, &hero, &catalog).unwrap();
        assert_eq!(summary.xp_gained, 15, "zone3 xp is withheld");
        assert_eq!(summary.gold_gained, 5);

        // Trainer sessions are never blocked regardless of zone labels.
        let mut trainer = session_with(missions, &[1, 2], Some(boss(BossKind::Blocker, 0, 0)));
        trainer.is_trainer = true;
        trainer.boss_decision = Some(BossDecision::Flee);
        let summary = finalize_session(&trainer, &hero, &catalog).unwrap();
        assert_eq!(summary.xp_gained, 55);
    }

    #[test]
    fn streak_drop_is_idempotent() {
        let catalog = ItemCatalog::empty();
        let mut hero = hero();
        hero.stats.streak = 9;

        let session = session_with(smallvec![mission(1, Zone::Zone1)], &[1], None);
        let summary = finalize_session(&session, &hero, &catalog).unwrap();
        assert_eq!(summary.next_streak, 10);
        assert_eq!(summary.drops, vec![String::from(MEDAL_DISCIPLINE)]);

        hero.inventory.push(String::from(MEDAL_DISCIPLINE));
        let summary = finalize_session(&session, &hero, &catalog).unwrap();
        assert!(summary.drops.is_empty(), "the medal never drops twice");
    }

    #[test]
    fn guards_reject_finished_and_empty_sessions() {
        let catalog = ItemCatalog::empty();
        let hero = hero();

        let mut finished = session_with(smallvec![mission(1, Zone::Zone1)], &[1], None);
        finished.is_finished = true;
        assert!(matches!(
            finalize_session(&finished, &hero, &catalog),
            Err(GameError::SessionFinished)
        ));

        let untouched = session_with(smallvec![mission(1, Zone::Zone1)], &[], None);
        assert!(matches!(
            finalize_session(&untouched, &hero, &catalog),
            Err(GameError::NothingCompleted)
        ));
    }
}

//! The daily dungeon session: instantiated missions, completion state, boss
//! encounter and the reroll counter. A session is only valid for the calendar
//! day it was generated on; validity is exact string equality on the stored
//! day stamp.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::fmt;

use crate::catalog::ExerciseDef;
use crate::constants::{
    MANUAL_REWARD, TRAINER_REWARD, ZONE1_REWARD, ZONE2_REWARD, ZONE3_REWARD,
};

/// Reward bracket of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Zone1,
    Zone2,
    Zone3,
    Manual,
    Trainer,
}

impl Zone {
    /// Canonical (xp, gold) pair for the bracket.
    #[must_use]
    pub const fn rewards(self) -> (u32, u32) {
        match self {
            Self::Zone1 => ZONE1_REWARD,
            Self::Zone2 => ZONE2_REWARD,
            Self::Zone3 => ZONE3_REWARD,
            Self::Manual => MANUAL_REWARD,
            Self::Trainer => TRAINER_REWARD,
        }
    }

    /// Brackets produced by the random generator (as opposed to the flat
    /// manual/trainer pricing).
    #[must_use]
    pub const fn is_random_tier(self) -> bool {
        matches!(self, Self::Zone1 | Self::Zone2 | Self::Zone3)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Zone1 => "zone1",
            Self::Zone2 => "zone2",
            Self::Zone3 => "zone3",
            Self::Manual => "manual",
            Self::Trainer => "trainer",
        };
        f.write_str(label)
    }
}

/// One instantiated exercise task. Derived from catalog data at generation
/// time; catalog changes never retroactively affect a generated mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: u32,
    pub title: String,
    pub lore: String,
    pub action: String,
    pub meta: String,
    pub xp: u32,
    pub gold: u32,
    pub zone: Zone,
    pub icon: String,
}

/// Boss archetype. `Blocker` is never produced by the generator; the variant
/// exists because finalize honors it for sessions that carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BossKind {
    #[serde(rename = "boss_major")]
    Major,
    Rare,
    Blocker,
}

/// The player's recorded answer to a boss encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BossDecision {
    Fight,
    Flee,
}

/// At most one boss spawns per session. Immutable after generation except
/// for the player's recorded decision, which lives on the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossEvent {
    pub kind: BossKind,
    pub name: String,
    pub description: String,
    pub bonus_xp: u32,
    pub bonus_gold: u32,
    pub fight_condition: String,
    pub flee_condition: String,
}

/// Day stamp used for session validity. A session is valid iff its stored
/// stamp equals today's stamp exactly.
#[must_use]
pub fn day_stamp(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The mutable record of today's workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub date: String,
    pub missions: SmallVec<[Mission; 8]>,
    #[serde(default)]
    pub completed: BTreeSet<u32>,
    #[serde(default)]
    pub boss: Option<BossEvent>,
    #[serde(default)]
    pub boss_decision: Option<BossDecision>,
    #[serde(default)]
    pub is_finished: bool,
    #[serde(default)]
    pub is_trainer: bool,
    #[serde(default)]
    pub reroll_count: u8,
    #[serde(default)]
    pub logs: Vec<String>,
}

impl Session {
    #[must_use]
    pub fn new_random(
        date: String,
        missions: SmallVec<[Mission; 8]>,
        boss: Option<BossEvent>,
        reroll_count: u8,
    ) -> Self {
        Self {
            date,
            missions,
            completed: BTreeSet::new(),
            boss,
            boss_decision: None,
            is_finished: false,
            is_trainer: false,
            reroll_count,
            logs: Vec::new(),
        }
    }

    #[must_use]
    pub fn new_trainer(
        date: String,
        missions: SmallVec<[Mission; 8]>,
        boss: Option<BossEvent>,
        reroll_count: u8,
    ) -> Self {
        Self {
            is_trainer: true,
            ..Self::new_random(date, missions, boss, reroll_count)
        }
    }

    /// Start an empty manual session. The mission list fills one exercise at
    /// a time; the prior reroll counter is carried, not spent.
    #[must_use]
    pub fn new_manual(date: String, reroll_count: u8) -> Self {
        Self {
            is_trainer: true,
            ..Self::new_random(date, SmallVec::new(), None, reroll_count)
        }
    }

    /// Whether this session belongs to the given day stamp.
    #[must_use]
    pub fn is_for(&self, stamp: &str) -> bool {
        self.date == stamp
    }

    #[must_use]
    pub fn mission(&self, id: u32) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// All missions completed, the major-boss win condition.
    #[must_use]
    pub fn all_completed(&self) -> bool {
        !self.missions.is_empty() && self.completed.len() == self.missions.len()
    }

    /// Flip completion for a mission id. Returns whether anything changed;
    /// finished sessions and unknown ids are no-ops.
    pub fn toggle_mission(&mut self, id: u32) -> bool {
        if self.is_finished || self.mission(id).is_none() {
            return false;
        }
        if !self.completed.remove(&id) {
            self.completed.insert(id);
        }
        true
    }

    /// Record the boss decision. One-shot: the first decision wins. Returns
    /// whether the decision was recorded.
    pub fn decide_boss(&mut self, decision: BossDecision) -> bool {
        if self.is_finished || self.boss.is_none() || self.boss_decision.is_some() {
            return false;
        }
        self.boss_decision = Some(decision);
        true
    }

    /// Append a manual mission built from a library exercise. Returns the
    /// new mission id, or `None` when the session is finished.
    pub fn add_manual_mission(&mut self, exercise: &ExerciseDef) -> Option<u32> {
        if self.is_finished {
            return None;
        }
        let id = u32::try_from(self.missions.len()).unwrap_or(u32::MAX).saturating_add(1);
        let (xp, gold) = Zone::Manual.rewards();
        self.missions.push(Mission {
            id,
            title: exercise.rpg_title.clone(),
            lore: exercise.rpg_lore.clone(),
            action: exercise.name.clone(),
            meta: String::from("3x12"),
            xp,
            gold,
            zone: Zone::Manual,
            icon: exercise.icon.clone(),
        });
        Some(id)
    }

    pub fn push_log(&mut self, key: &str) {
        self.logs.push(String::from(key));
    }
}

/// Which configuration prompt a hero without a valid session should see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigPrompt {
    /// The hero has an assigned routine; offer the split picker first.
    SplitSelect,
    /// No routine; offer the location picker.
    LocationSelect,
}

/// Derived lifecycle state of today's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Configuring(ConfigPrompt),
    Active,
    Finished,
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

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

    fn rare_boss() -> BossEvent {
        BossEvent {
            kind: BossKind::Rare,
            name: String::from("Shadow Assassin"),
            description: String::from("An enemy wants to steal your gold."),
            bonus_xp: 100,
            bonus_gold: 50,
            fight_condition: String::from("Complete 5 missions."),
            flee_condition: String::from("Flee."),
        }
    }

    #[test]
    fn zone_rewards_match_canonical_pairs() {
        assert_eq!(Zone::Zone1.rewards(), (15, 5));
        assert_eq!(Zone::Zone2.rewards(), (30, 12));
        assert_eq!(Zone::Zone3.rewards(), (40, 20));
        assert_eq!(Zone::Manual.rewards(), (50, 25));
        assert_eq!(Zone::Trainer.rewards(), (60, 30));
    }

    #[test]
    fn toggle_flips_and_respects_finished() {
        let mut session = Session::new_random(
            String::from("2025-03-01"),
            smallvec![mission(1, Zone::Zone1), mission(2, Zone::Zone2)],
            None,
            0,
        );

        assert!(session.toggle_mission(1));
        assert!(session.completed.contains(&1));
        assert!(session.toggle_mission(1));
        assert!(!session.completed.contains(&1));
        assert!(!session.toggle_mission(99), "unknown ids are no-ops");

        session.toggle_mission(2);
        session.is_finished = true;
        assert!(!session.toggle_mission(2));
        assert!(session.completed.contains(&2), "finished state is frozen");
    }

    #[test]
    fn boss_decision_is_one_shot() {
        let mut session = Session::new_random(
            String::from("2025-03-01"),
            smallvec![mission(1, Zone::Zone1)],
            Some(rare_boss()),
            0,
        );

        assert!(session.decide_boss(BossDecision::Flee));
        assert!(!session.decide_boss(BossDecision::Fight));
        assert_eq!(session.boss_decision, Some(BossDecision::Flee));
    }

    #[test]
    fn decision_without_boss_is_rejected() {
        let mut session = Session::new_random(
            String::from("2025-03-01"),
            smallvec![mission(1, Zone::Zone1)],
            None,
            0,
        );
        assert!(!session.decide_boss(BossDecision::Fight));
        assert_eq!(session.boss_decision, None);
    }

    #[test]
    fn manual_missions_number_from_one() {
        let exercise = crate::catalog::ExerciseLibrary::builtin()
            .get("push_up")
            .unwrap()
            .clone();
        let mut session = Session::new_manual(String::from("2025-03-01"), 2);
        assert!(session.is_trainer);
        assert_eq!(session.reroll_count, 2, "manual mode preserves the counter");

        assert_eq!(session.add_manual_mission(&exercise), Some(1));
        assert_eq!(session.add_manual_mission(&exercise), Some(2));
        let first = session.mission(1).unwrap();
        assert_eq!((first.xp, first.gold), (50, 25));
        assert_eq!(first.zone, Zone::Manual);

        session.is_finished = true;
        assert_eq!(session.add_manual_mission(&exercise), None);
    }

    #[test]
    fn day_stamp_is_stable() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(day_stamp(date), "2025-03-01");
        let session = Session::new_manual(day_stamp(date), 0);
        assert!(session.is_for("2025-03-01"));
        assert!(!session.is_for("2025-03-02"));
    }

    #[test]
    fn session_round_trips_through_json() {
        let mut session = Session::new_random(
            String::from("2025-03-01"),
            smallvec![mission(1, Zone::Zone1), mission(2, Zone::Zone3)],
            Some(rare_boss()),
            1,
        );
        session.toggle_mission(2);
        session.decide_boss(BossDecision::Fight);

        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"rare\""), "boss kind serializes lowercase");
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}

//! Recurring side-quests with two independent cooldowns: a ~20-hour
//! completion gate ("do it again tomorrow") and a longer per-quest gold
//! cooldown. Completing inside the gold window still pays XP; the gold is
//! withheld and the remaining days surfaced.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{HOURS_PER_DAY, QUEST_COMPLETION_GATE_HOURS};
use crate::error::GameError;
use crate::progression::{LevelProgress, apply_xp};

const DEFAULT_QUESTS: &str = include_str!("../assets/quests.json");

/// A recurring side-quest definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDef {
    pub id: String,
    pub title: String,
    pub desc: String,
    pub xp: u64,
    pub gold: i64,
    pub icon: String,
    /// Gold is paid at most once per this many days.
    pub gold_cooldown_days: u32,
}

/// Container for all quest definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuestCatalog {
    pub quests: Vec<QuestDef>,
}

impl QuestCatalog {
    #[must_use]
    pub fn empty() -> Self {
        Self { quests: Vec::new() }
    }

    /// Load the catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid quest data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The embedded default catalog.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static BUILTIN: Lazy<QuestCatalog> = Lazy::new(|| {
            QuestCatalog::from_json(DEFAULT_QUESTS).expect("embedded quest catalog is valid JSON")
        });
        &BUILTIN
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&QuestDef> {
        self.quests.iter().find(|quest| quest.id == id)
    }
}

/// Per-quest completion timestamps on a hero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuestMark {
    #[serde(default)]
    pub last_done: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_gold: Option<DateTime<Utc>>,
}

/// Quest-id keyed log of marks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuestLog(pub BTreeMap<String, QuestMark>);

impl QuestLog {
    #[must_use]
    pub fn mark(&self, quest_id: &str) -> Option<&QuestMark> {
        self.0.get(quest_id)
    }

    pub fn record(&mut self, quest_id: &str, now: DateTime<Utc>, gold_paid: bool) {
        let entry = self.0.entry(quest_id.to_string()).or_default();
        entry.last_done = Some(now);
        if gold_paid {
            entry.last_gold = Some(now);
        }
    }
}

/// What a quest currently offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestAvailability {
    pub can_complete: bool,
    pub gold_ready: bool,
    /// Whole days until the gold cooldown expires; 0 when ready.
    pub gold_days_left: u32,
}

/// Evaluate both cooldowns against the wall-clock `now`.
#[must_use]
pub fn availability(
    def: &QuestDef,
    mark: Option<&QuestMark>,
    now: DateTime<Utc>,
) -> QuestAvailability {
    let Some(mark) = mark else {
        return QuestAvailability {
            can_complete: true,
            gold_ready: true,
            gold_days_left: 0,
        };
    };

    let can_complete = mark.last_done.is_none_or(|done| {
        let hours = elapsed_hours(done, now);
        hours >= QUEST_COMPLETION_GATE_HOURS
    });

    let (gold_ready, gold_days_left) = match mark.last_gold {
        None => (true, 0),
        Some(gold) => {
            let days = elapsed_hours(gold, now) / HOURS_PER_DAY;
            let cooldown = f64::from(def.gold_cooldown_days);
            if days >= cooldown {
                (true, 0)
            } else {
                let left = (cooldown - days).ceil();
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let left = if left > 0.0 { left as u32 } else { 0 };
                (false, left)
            }
        }
    };

    QuestAvailability {
        can_complete,
        gold_ready,
        gold_days_left,
    }
}

fn elapsed_hours(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let seconds = (to - from).num_seconds() as f64;
    seconds / 3600.0
}

/// Outcome of completing a quest: XP always, gold only when its cooldown
/// has expired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestOutcome {
    pub xp_gained: u64,
    pub gold_gained: i64,
    /// Whether the gold cooldown had expired and gold was paid out.
    pub gold_paid: bool,
    pub gold_days_left: u32,
    pub progress: LevelProgress,
}

/// Complete a quest, running the shared level loop on the XP award.
///
/// # Errors
///
/// Returns [`GameError::QuestOnCooldown`] when the completion gate has not
/// elapsed; no state is changed.
pub fn complete_quest(
    def: &QuestDef,
    mark: Option<&QuestMark>,
    now: DateTime<Utc>,
    level: u32,
    xp: u64,
) -> Result<QuestOutcome, GameError> {
    let status = availability(def, mark, now);
    if !status.can_complete {
        return Err(GameError::QuestOnCooldown(def.id.clone()));
    }

    let progress = apply_xp(level, xp, def.xp);
    let gold_gained = if status.gold_ready { def.gold } else { 0 };

    Ok(QuestOutcome {
        xp_gained: def.xp,
        gold_gained,
        gold_paid: status.gold_ready,
        gold_days_left: status.gold_days_left,
        progress,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn quest() -> QuestDef {
        QuestDef {
            id: String::from("drink_water"),
            title: String::from("Hydration"),
            desc: String::from("Drink 2L of water."),
            xp: 20,
            gold: 15,
            icon: String::from("water"),
            gold_cooldown_days: 3,
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn fresh_quest_is_fully_available() {
        let status = availability(&quest(), None, at(1, 9));
        assert!(status.can_complete);
        assert!(status.gold_ready);
        assert_eq!(status.gold_days_left, 0);
    }

    #[test]
    fn completion_gate_opens_after_twenty_hours() {
        let def = quest();
        let mark = QuestMark {
            last_done: Some(at(1, 9)),
            last_gold: Some(at(1, 9)),
        };

        let early = availability(&def, Some(&mark), at(2, 4));
        assert!(!early.can_complete, "19h elapsed is still gated");

        let later = availability(&def, Some(&mark), at(2, 6));
        assert!(later.can_complete, "21h elapsed passes the gate");
        assert!(!later.gold_ready);
        assert_eq!(later.gold_days_left, 3);
    }

    #[test]
    fn gold_cooldown_counts_down_in_days() {
        let def = quest();
        let mark = QuestMark {
            last_done: Some(at(1, 9)),
            last_gold: Some(at(1, 9)),
        };

        let day_after = availability(&def, Some(&mark), at(2, 10));
        assert_eq!(day_after.gold_days_left, 2);

        let ready = availability(&def, Some(&mark), at(4, 10));
        assert!(ready.gold_ready);
        assert_eq!(ready.gold_days_left, 0);
    }

    #[test]
    fn completing_early_is_rejected_without_changes() {
        let def = quest();
        let mark = QuestMark {
            last_done: Some(at(1, 9)),
            last_gold: None,
        };
        let err = complete_quest(&def, Some(&mark), at(1, 20), 1, 0).unwrap_err();
        assert!(matches!(err, GameError::QuestOnCooldown(_)));
    }

    #[test]
    fn completing_inside_gold_window_pays_xp_only() {
        let def = quest();
        let mark = QuestMark {
            last_done: Some(at(1, 9)),
            last_gold: Some(at(1, 9)),
        };
        let outcome = complete_quest(&def, Some(&mark), at(2, 10), 1, 90).unwrap();
        assert_eq!(outcome.xp_gained, 20);
        assert_eq!(outcome.gold_gained, 0);
        assert_eq!(outcome.gold_days_left, 2);
        assert!(outcome.progress.leveled_up, "90 + 20 crosses level 1's 100");
        assert_eq!(outcome.progress.level, 2);
        assert_eq!(outcome.progress.xp, 10);
    }

    #[test]
    fn builtin_catalog_has_all_four_quests() {
        let catalog = QuestCatalog::builtin();
        assert_eq!(catalog.quests.len(), 4);
        assert_eq!(catalog.get("eat_clean").unwrap().gold_cooldown_days, 4);
        assert!(catalog.get("unknown").is_none());
    }
}

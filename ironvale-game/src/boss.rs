//! Boss encounter generation.
//!
//! Called once per session generation; regenerating the session replaces
//! any prior boss. A guaranteed major boss appears on the streak cadence,
//! otherwise a rare encounter spawns with small probability.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    MAJOR_BOSS_BONUS, MAJOR_BOSS_CYCLE, RARE_BOSS_BONUS, RARE_BOSS_FIGHT_GOAL,
    RARE_BOSS_ROLL_THRESHOLD,
};
use crate::session::{BossEvent, BossKind};

/// Boss cadence and reward configuration, injected into the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossConfig {
    /// Every N-th streak day spawns the major boss.
    pub major_cycle: u32,
    /// A uniform [0, 1) draw above this threshold spawns a rare boss.
    pub rare_roll_threshold: f64,
    pub major_bonus_xp: u32,
    pub major_bonus_gold: u32,
    pub rare_bonus_xp: u32,
    pub rare_bonus_gold: u32,
}

impl Default for BossConfig {
    fn default() -> Self {
        let (major_bonus_xp, major_bonus_gold) = MAJOR_BOSS_BONUS;
        let (rare_bonus_xp, rare_bonus_gold) = RARE_BOSS_BONUS;
        Self {
            major_cycle: MAJOR_BOSS_CYCLE,
            rare_roll_threshold: RARE_BOSS_ROLL_THRESHOLD,
            major_bonus_xp,
            major_bonus_gold,
            rare_bonus_xp,
            rare_bonus_gold,
        }
    }
}

/// Roll today's boss, if any.
pub fn generate_boss<R: Rng>(streak: u32, cfg: &BossConfig, rng: &mut R) -> Option<BossEvent> {
    let cycle = cfg.major_cycle.max(1);
    if (streak + 1) % cycle == 0 {
        return Some(BossEvent {
            kind: BossKind::Major,
            name: String::from("Demon Lord"),
            description: String::from("The Guardian of the Cycle has awakened!"),
            bonus_xp: cfg.major_bonus_xp,
            bonus_gold: cfg.major_bonus_gold,
            fight_condition: String::from("Complete 100% of the missions."),
            flee_condition: String::from("Impossible to flee."),
        });
    }

    if rng.gen_range(0.0..1.0) > cfg.rare_roll_threshold {
        return Some(BossEvent {
            kind: BossKind::Rare,
            name: String::from("Shadow Assassin"),
            description: String::from("An enemy wants to steal your gold."),
            bonus_xp: cfg.rare_bonus_xp,
            bonus_gold: cfg.rare_bonus_gold,
            fight_condition: format!("Complete {RARE_BOSS_FIGHT_GOAL} missions."),
            flee_condition: String::from("Flee."),
        });
    }

    None
}

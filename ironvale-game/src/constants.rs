//! Centralized balance and tuning constants for Ironvale game logic.
//!
//! These values define the deterministic math for the reward economy.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

// Logging keys -------------------------------------------------------------
pub(crate) const DEBUG_ENV_VAR: &str = "IRONVALE_DEBUG_LOGS";
pub(crate) const LOG_SESSION_GENERATED: &str = "log.session.generated";
pub(crate) const LOG_SESSION_REROLLED: &str = "log.session.rerolled";
pub(crate) const LOG_SESSION_MANUAL: &str = "log.session.manual";
pub(crate) const LOG_BOSS_SPAWNED: &str = "log.boss.spawned";
pub(crate) const LOG_BOSS_VICTORY: &str = "log.boss.victory";
pub(crate) const LOG_BOSS_DEFEAT: &str = "log.boss.defeat";
pub(crate) const LOG_DUNGEON_FINISHED: &str = "log.dungeon.finished";
pub(crate) const LOG_LEVEL_UP: &str = "log.level-up";
pub(crate) const LOG_DROP_FOUND: &str = "log.drop.found";
pub(crate) const LOG_GUILD_SYNC_FAILED: &str = "log.guild.sync-failed";

// Mission reward zones -----------------------------------------------------
pub(crate) const ZONE1_REWARD: (u32, u32) = (15, 5);
pub(crate) const ZONE2_REWARD: (u32, u32) = (30, 12);
pub(crate) const ZONE3_REWARD: (u32, u32) = (40, 20);
pub(crate) const MANUAL_REWARD: (u32, u32) = (50, 25);
pub(crate) const TRAINER_REWARD: (u32, u32) = (60, 30);

// Random-mode draw plan ----------------------------------------------------
pub(crate) const RANDOM_DRAW_COUNT: usize = 8;
pub(crate) const MAX_REROLLS: u8 = 3;
pub(crate) const WEIGHT_ROLL_SPAN: f64 = 100.0;

// Boss cadence -------------------------------------------------------------
pub(crate) const MAJOR_BOSS_CYCLE: u32 = 30;
pub(crate) const RARE_BOSS_ROLL_THRESHOLD: f64 = 0.85;
pub(crate) const MAJOR_BOSS_BONUS: (u32, u32) = (500, 200);
pub(crate) const RARE_BOSS_BONUS: (u32, u32) = (100, 50);
pub(crate) const RARE_BOSS_FIGHT_GOAL: u32 = 5;

// Progression --------------------------------------------------------------
pub(crate) const LEVEL_XP_STEP: u64 = 100;
pub(crate) const STREAK_DROP_CYCLE: u32 = 10;
pub(crate) const MEDAL_DISCIPLINE: &str = "medal_discipline";
pub(crate) const SWORD_DEMON: &str = "sword_demon";

// Hero defaults ------------------------------------------------------------
pub(crate) const STARTING_HP: i32 = 100;

// Quest cooldowns ----------------------------------------------------------
pub(crate) const QUEST_COMPLETION_GATE_HOURS: f64 = 20.0;
pub(crate) const HOURS_PER_DAY: f64 = 24.0;

//! Achievements: a fixed catalogue unlocked from lifetime stats

mod checker;
mod definitions;
mod manager;

pub use checker::check_achievements;
pub use definitions::{ACHIEVEMENTS, Achievement, AchievementId, Condition, StatMetric};
pub use manager::{AchievementEngine, AchievementStatus, UnlockedAchievement};

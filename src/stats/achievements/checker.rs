//! Achievement checking logic
//!
//! Pure evaluation of the catalogue against a stats snapshot.

use std::collections::BTreeSet;

use super::definitions::{ACHIEVEMENTS, AchievementId};
use crate::stats::models::LifetimeStats;

/// Ids whose condition holds for `stats` and that are not already unlocked,
/// in catalogue order.
pub fn check_achievements(
    stats: &LifetimeStats,
    unlocked: &BTreeSet<AchievementId>,
) -> Vec<AchievementId> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| !unlocked.contains(&a.id))
        .filter(|a| a.condition.holds(stats))
        .map(|a| a.id)
        .collect()
}

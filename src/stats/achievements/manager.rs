//! Achievement engine - lifetime stats and unlock bookkeeping
//!
//! Owns the player's [`LifetimeStats`] and the set of unlocked achievement
//! ids, both persisted through a [`KvStore`]. Unlocks are permanent: once an
//! id is in the set it is never evaluated or reported again, and resetting
//! the stats leaves it in place.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::checker::check_achievements;
use super::definitions::{ACHIEVEMENTS, Achievement, AchievementId};
use crate::stats::models::{LifetimeStats, StatsUpdate};
use crate::stats::store::{ACHIEVEMENTS_KEY, KvStore, STATS_KEY, load_json, save_json};

/// An achievement that was just unlocked
#[derive(Debug, Clone)]
pub struct UnlockedAchievement {
    pub achievement: &'static Achievement,
    /// Unlock time, ms since epoch
    pub unlocked_at: i64,
}

/// Catalogue entry together with its unlock flag
#[derive(Debug, Clone)]
pub struct AchievementStatus {
    pub achievement: &'static Achievement,
    pub unlocked: bool,
}

pub struct AchievementEngine {
    store: Arc<dyn KvStore>,
    stats: LifetimeStats,
    unlocked: BTreeSet<AchievementId>,
}

impl AchievementEngine {
    /// Load stats and unlocks from `store`; anything missing or malformed
    /// starts from defaults.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        let stats = load_json::<LifetimeStats>(store.as_ref(), STATS_KEY).unwrap_or_default();

        let unlocked: BTreeSet<AchievementId> =
            load_json::<Vec<String>>(store.as_ref(), ACHIEVEMENTS_KEY)
                .unwrap_or_default()
                .iter()
                .filter_map(|id| {
                    let parsed = AchievementId::from_str(id);
                    if parsed.is_none() {
                        debug!("Ignoring unknown achievement id '{}'", id);
                    }
                    parsed
                })
                .collect();

        debug!(
            games_played = stats.games_played,
            unlocked = unlocked.len(),
            "Loaded achievement progress"
        );

        Self {
            store,
            stats,
            unlocked,
        }
    }

    /// Merge `update` into the lifetime stats, persist them, and unlock every
    /// achievement whose condition now holds.
    ///
    /// Returns only the achievements unlocked by this call, in catalogue order.
    pub fn apply_stats_update(&mut self, update: &StatsUpdate) -> Vec<UnlockedAchievement> {
        self.stats.apply(update);
        self.save_stats();

        let newly_unlocked = check_achievements(&self.stats, &self.unlocked);
        if newly_unlocked.is_empty() {
            return Vec::new();
        }

        let now = Utc::now().timestamp_millis();
        let unlocked: Vec<UnlockedAchievement> = newly_unlocked
            .into_iter()
            .map(|id| {
                self.unlocked.insert(id);
                let achievement = Achievement::get(id);
                info!("Achievement unlocked: {} ({})", achievement.title, id.as_str());
                UnlockedAchievement {
                    achievement,
                    unlocked_at: now,
                }
            })
            .collect();

        self.save_unlocked();
        unlocked
    }

    /// Snapshot of the lifetime stats
    pub fn stats(&self) -> LifetimeStats {
        self.stats
    }

    /// Every catalogue entry with its unlock flag, in catalogue order
    pub fn achievements(&self) -> Vec<AchievementStatus> {
        ACHIEVEMENTS
            .iter()
            .map(|achievement| AchievementStatus {
                achievement,
                unlocked: self.unlocked.contains(&achievement.id),
            })
            .collect()
    }

    pub fn unlocked_achievements(&self) -> Vec<&'static Achievement> {
        ACHIEVEMENTS
            .iter()
            .filter(|a| self.unlocked.contains(&a.id))
            .collect()
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.unlocked.contains(&id)
    }

    /// Get count of unlocked achievements
    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    /// Zero every stat. Unlocked achievements stay unlocked.
    pub fn reset(&mut self) {
        self.stats = LifetimeStats::default();
        self.save_stats();
        info!("Lifetime stats reset");
    }

    fn save_stats(&self) {
        save_json(self.store.as_ref(), STATS_KEY, &self.stats);
    }

    fn save_unlocked(&self) {
        let ids: Vec<&str> = self.unlocked.iter().map(|id| id.as_str()).collect();
        save_json(self.store.as_ref(), ACHIEVEMENTS_KEY, &ids);
    }
}

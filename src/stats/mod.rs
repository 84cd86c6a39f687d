//! Player progression that outlives a single game
//!
//! Lifetime stats, achievement unlocks and daily challenges, persisted as JSON
//! documents through a [`KvStore`] (SQLite by default, `~/.memgrid/progress.db`).
//!
//! # Usage
//!
//! ```ignore
//! let store: Arc<dyn KvStore> = Arc::new(SqliteStore::open_default()?);
//!
//! let mut achievements = AchievementEngine::new(store.clone());
//! let unlocked = achievements.apply_stats_update(&StatsUpdate::default().max_level(10));
//!
//! let mut challenges = ChallengeScheduler::new(store, Arc::new(SystemClock));
//! let completed = challenges.record_progress(ObjectiveType::Score, 5200);
//! ```

pub mod achievements;
pub mod challenges;
mod db;
mod models;
mod store;

pub use db::SqliteStore;
pub use models::{LifetimeStats, StatsUpdate};
pub use store::{
    ACHIEVEMENTS_KEY, CHALLENGES_KEY, KvStore, MemoryStore, STATS_KEY, load_json, save_json,
};

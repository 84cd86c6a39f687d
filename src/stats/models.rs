//! Lifetime statistics records

use serde::{Deserialize, Serialize};

/// Cumulative player statistics, persisted across sessions.
///
/// Stored as camelCase JSON. Missing fields decode as zero so older or
/// partial records still load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LifetimeStats {
    pub games_played: u64,
    pub total_score: u64,
    pub max_level: u32,
    pub max_combo: u32,
    pub perfect_games: u64,
    pub current_streak: u32,
}

/// Partial update; every `Some` field overwrites the stored value.
///
/// The merge is a plain overwrite. Callers pass already-maximized values for
/// `max_level` and `max_combo`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsUpdate {
    pub games_played: Option<u64>,
    pub total_score: Option<u64>,
    pub max_level: Option<u32>,
    pub max_combo: Option<u32>,
    pub perfect_games: Option<u64>,
    pub current_streak: Option<u32>,
}

impl StatsUpdate {
    pub fn games_played(mut self, value: u64) -> Self {
        self.games_played = Some(value);
        self
    }

    pub fn total_score(mut self, value: u64) -> Self {
        self.total_score = Some(value);
        self
    }

    pub fn max_level(mut self, value: u32) -> Self {
        self.max_level = Some(value);
        self
    }

    pub fn max_combo(mut self, value: u32) -> Self {
        self.max_combo = Some(value);
        self
    }

    pub fn perfect_games(mut self, value: u64) -> Self {
        self.perfect_games = Some(value);
        self
    }

    pub fn current_streak(mut self, value: u32) -> Self {
        self.current_streak = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl LifetimeStats {
    /// Overwrite the fields present in `update`
    pub fn apply(&mut self, update: &StatsUpdate) {
        if let Some(v) = update.games_played {
            self.games_played = v;
        }
        if let Some(v) = update.total_score {
            self.total_score = v;
        }
        if let Some(v) = update.max_level {
            self.max_level = v;
        }
        if let Some(v) = update.max_combo {
            self.max_combo = v;
        }
        if let Some(v) = update.perfect_games {
            self.perfect_games = v;
        }
        if let Some(v) = update.current_streak {
            self.current_streak = v;
        }
    }
}

//! Achievement definitions and metadata
//!
//! The catalogue is fixed. Unlocks are persisted by string id, so ids must
//! never change once shipped.

use serde::{Deserialize, Serialize};

use crate::stats::models::LifetimeStats;

/// Unique identifier for each achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AchievementId {
    FirstWin,
    ComboMaster,
    Level10,
    PerfectGame,
    Streak3,
}

impl AchievementId {
    /// Get the string ID for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstWin => "first_win",
            Self::ComboMaster => "combo_master",
            Self::Level10 => "level_10",
            Self::PerfectGame => "perfect_game",
            Self::Streak3 => "streak_3",
        }
    }

    /// Parse from a stored string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "first_win" => Some(Self::FirstWin),
            "combo_master" => Some(Self::ComboMaster),
            "level_10" => Some(Self::Level10),
            "perfect_game" => Some(Self::PerfectGame),
            "streak_3" => Some(Self::Streak3),
            _ => None,
        }
    }

    /// Get all achievement IDs in catalogue order
    pub fn all() -> &'static [AchievementId] {
        &[
            Self::FirstWin,
            Self::ComboMaster,
            Self::Level10,
            Self::PerfectGame,
            Self::Streak3,
        ]
    }
}

impl Serialize for AchievementId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AchievementId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown achievement id: {s}")))
    }
}

/// Lifetime statistic an unlock rule looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatMetric {
    GamesPlayed,
    TotalScore,
    MaxLevel,
    MaxCombo,
    PerfectGames,
    CurrentStreak,
}

impl StatMetric {
    /// Read this metric out of a stats record
    pub fn read(&self, stats: &LifetimeStats) -> u64 {
        match self {
            Self::GamesPlayed => stats.games_played,
            Self::TotalScore => stats.total_score,
            Self::MaxLevel => u64::from(stats.max_level),
            Self::MaxCombo => u64::from(stats.max_combo),
            Self::PerfectGames => stats.perfect_games,
            Self::CurrentStreak => u64::from(stats.current_streak),
        }
    }
}

/// Unlock rule: `metric >= at_least`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub metric: StatMetric,
    pub at_least: u64,
}

impl Condition {
    pub const fn new(metric: StatMetric, at_least: u64) -> Self {
        Self { metric, at_least }
    }

    pub fn holds(&self, stats: &LifetimeStats) -> bool {
        self.metric.read(stats) >= self.at_least
    }
}

/// Achievement definition with all metadata
#[derive(Debug, Clone, Serialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub condition: Condition,
}

/// All achievement definitions, in evaluation order
pub static ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: AchievementId::FirstWin,
        title: "First Victory",
        description: "Win your first game",
        icon: "🎯",
        condition: Condition::new(StatMetric::CurrentStreak, 1),
    },
    Achievement {
        id: AchievementId::ComboMaster,
        title: "Combo Master",
        description: "Achieve a 5x combo streak",
        icon: "🔥",
        condition: Condition::new(StatMetric::MaxCombo, 5),
    },
    Achievement {
        id: AchievementId::Level10,
        title: "Memory Champion",
        description: "Reach level 10",
        icon: "👑",
        condition: Condition::new(StatMetric::MaxLevel, 10),
    },
    Achievement {
        id: AchievementId::PerfectGame,
        title: "Perfectionist",
        description: "Complete a game without mistakes",
        icon: "💎",
        condition: Condition::new(StatMetric::PerfectGames, 1),
    },
    Achievement {
        id: AchievementId::Streak3,
        title: "On Fire",
        description: "Win 3 games in a row",
        icon: "🌟",
        condition: Condition::new(StatMetric::CurrentStreak, 3),
    },
];

impl Achievement {
    /// Get achievement definition by ID
    pub fn get(id: AchievementId) -> &'static Achievement {
        // `all()` and ACHIEVEMENTS list the same ids in the same order
        &ACHIEVEMENTS[id as usize]
    }

    /// Get total number of achievements
    pub fn total_count() -> usize {
        ACHIEVEMENTS.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_matches_ids() {
        assert_eq!(ACHIEVEMENTS.len(), AchievementId::all().len());
        for (def, id) in ACHIEVEMENTS.iter().zip(AchievementId::all()) {
            assert_eq!(def.id, *id);
            assert_eq!(Achievement::get(*id).id, *id);
        }
    }

    #[test]
    fn test_ids_roundtrip_through_strings() {
        for id in AchievementId::all() {
            assert_eq!(AchievementId::from_str(id.as_str()), Some(*id));
        }
        assert_eq!(AchievementId::from_str("level_11"), None);
    }

    #[test]
    fn test_ids_are_stable() {
        let ids: Vec<&str> = AchievementId::all().iter().map(|id| id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["first_win", "combo_master", "level_10", "perfect_game", "streak_3"]
        );
    }

    #[test]
    fn test_condition_threshold() {
        let rule = Condition::new(StatMetric::MaxCombo, 5);
        let mut stats = LifetimeStats {
            max_combo: 4,
            ..Default::default()
        };
        assert!(!rule.holds(&stats));
        stats.max_combo = 5;
        assert!(rule.holds(&stats));
    }

    #[test]
    fn test_condition_serializes_as_data() {
        let json = serde_json::to_value(Condition::new(StatMetric::CurrentStreak, 3)).unwrap();
        assert_eq!(json["metric"], "current_streak");
        assert_eq!(json["at_least"], 3);
    }
}

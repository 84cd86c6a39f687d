//! Daily challenge records and the template catalogue

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a challenge measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveType {
    Score,
    Level,
    Combo,
    Perfect,
    Speed,
}

impl ObjectiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Level => "level",
            Self::Combo => "combo",
            Self::Perfect => "perfect",
            Self::Speed => "speed",
        }
    }
}

/// Measurable target of a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    #[serde(rename = "type")]
    pub kind: ObjectiveType,
    pub target: u64,
    /// Seconds allowed, for speed objectives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardType {
    Theme,
    Powerup,
    Achievement,
    Bonus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RewardValue {
    Number(u64),
    Text(Cow<'static, str>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    #[serde(rename = "type")]
    pub kind: RewardType,
    pub value: RewardValue,
}

/// Lifecycle position of a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeState {
    Active,
    Completed,
    Expired,
}

/// One day's objective, as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyChallenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub objective: Objective,
    pub reward: Reward,
    /// Exclusive end of the challenge's day
    pub expires_at: DateTime<Utc>,
    pub completed: bool,
    /// Best value observed so far; never decreases
    pub progress: u64,
}

impl DailyChallenge {
    /// Completion wins over expiry: a finished challenge stays completed.
    pub fn state(&self, now: DateTime<Utc>) -> ChallengeState {
        if self.completed {
            ChallengeState::Completed
        } else if self.expires_at <= now {
            ChallengeState::Expired
        } else {
            ChallengeState::Active
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.state(now) == ChallengeState::Active
    }

    /// Fraction of the target reached, capped at 1.0
    pub fn progress_ratio(&self) -> f64 {
        if self.objective.target == 0 {
            return 1.0;
        }
        (self.progress as f64 / self.objective.target as f64).min(1.0)
    }
}

/// Blueprint a daily challenge is instantiated from
#[derive(Debug, Clone)]
pub struct ChallengeTemplate {
    pub title: &'static str,
    /// May contain `{target}`, replaced by the objective's target
    pub description: &'static str,
    pub objective: Objective,
    pub reward: Reward,
}

impl ChallengeTemplate {
    pub fn render_description(&self) -> String {
        self.description
            .replace("{target}", &self.objective.target.to_string())
    }

    pub fn instantiate(&self, id: String, expires_at: DateTime<Utc>) -> DailyChallenge {
        DailyChallenge {
            id,
            title: self.title.to_string(),
            description: self.render_description(),
            objective: self.objective,
            reward: self.reward.clone(),
            expires_at,
            completed: false,
            progress: 0,
        }
    }
}

/// All challenge templates; one is drawn per day
pub static CHALLENGE_TEMPLATES: &[ChallengeTemplate] = &[
    ChallengeTemplate {
        title: "Score Sprint",
        description: "Reach a score of {target} points",
        objective: Objective {
            kind: ObjectiveType::Score,
            target: 5000,
            time_limit: None,
        },
        reward: Reward {
            kind: RewardType::Bonus,
            value: RewardValue::Number(100),
        },
    },
    ChallengeTemplate {
        title: "Level Master",
        description: "Reach level {target}",
        objective: Objective {
            kind: ObjectiveType::Level,
            target: 8,
            time_limit: None,
        },
        reward: Reward {
            kind: RewardType::Theme,
            value: RewardValue::Text(Cow::Borrowed("rainbow")),
        },
    },
    ChallengeTemplate {
        title: "Combo King",
        description: "Achieve a {target}x combo",
        objective: Objective {
            kind: ObjectiveType::Combo,
            target: 15,
            time_limit: None,
        },
        reward: Reward {
            kind: RewardType::Powerup,
            value: RewardValue::Text(Cow::Borrowed("slow_motion")),
        },
    },
    ChallengeTemplate {
        title: "Perfect Memory",
        description: "Complete {target} perfect sequences",
        objective: Objective {
            kind: ObjectiveType::Perfect,
            target: 3,
            time_limit: None,
        },
        reward: Reward {
            kind: RewardType::Achievement,
            value: RewardValue::Text(Cow::Borrowed("perfect_memory")),
        },
    },
    ChallengeTemplate {
        title: "Speed Demon",
        description: "Complete level 5 in under {target} seconds",
        objective: Objective {
            kind: ObjectiveType::Speed,
            target: 30,
            time_limit: Some(30),
        },
        reward: Reward {
            kind: RewardType::Powerup,
            value: RewardValue::Text(Cow::Borrowed("time_freeze")),
        },
    },
];

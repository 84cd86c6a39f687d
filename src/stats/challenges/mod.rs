//! Daily challenges: one time-boxed objective per local calendar day

mod clock;
mod definitions;
mod scheduler;

pub use clock::{Clock, FixedClock, SystemClock, day_window, local_midnight};
pub use definitions::{
    CHALLENGE_TEMPLATES, ChallengeState, ChallengeTemplate, DailyChallenge, Objective,
    ObjectiveType, Reward, RewardType, RewardValue,
};
pub use scheduler::ChallengeScheduler;

//! Score and combo tracking
//!
//! Derived purely from the stream of round outcomes. Lives next to the engine
//! rather than inside it so the state machine carries no scoring rules.

use super::engine::Outcome;

/// Default combo multiplier cap
pub const DEFAULT_COMBO_CAP: u32 = 5;

/// Running score, combo and high score for one game attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreTracker {
    combo_cap: u32,
    score: u64,
    combo: u32,
    max_combo: u32,
    high_score: u64,
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self::new(DEFAULT_COMBO_CAP)
    }
}

impl ScoreTracker {
    pub fn new(combo_cap: u32) -> Self {
        Self {
            combo_cap,
            score: 0,
            combo: 0,
            max_combo: 0,
            high_score: 0,
        }
    }

    /// Seed the high score from a previous session
    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.high_score = high_score;
        self
    }

    /// Fold one outcome into the running totals.
    ///
    /// `level_before` is the level the round was played at, i.e. before a
    /// `Complete` incremented it. Returns the points this outcome earned.
    pub fn record(&mut self, outcome: Outcome, level_before: u32) -> u64 {
        match outcome {
            Outcome::Wrong => {
                self.combo = 0;
                self.settle();
                0
            }
            Outcome::Correct => {
                self.bump_combo();
                0
            }
            Outcome::Complete => {
                self.bump_combo();
                let points = u64::from(level_before) * u64::from(self.combo.min(self.combo_cap));
                self.score += points;
                points
            }
        }
    }

    /// Raise the high score to the running score if it is higher
    pub fn settle(&mut self) {
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    fn bump_combo(&mut self) {
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
    }

    /// Clear the attempt; the high score is kept
    pub fn reset(&mut self) {
        self.combo = 0;
        self.score = 0;
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Best combo seen since this tracker was created
    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn combo_cap(&self) -> u32 {
        self.combo_cap
    }
}

//! Full game loop
//!
//! [`MemoryGame`] wires a [`SessionEngine`] to a [`ScoreTracker`] and to the
//! player's long-lived [`Progress`], turning every accepted click into a list
//! of [`GameEvent`]s for the presentation layer.
//!
//! A completed round immediately starts the next, one level higher. A wrong
//! click ends the game; [`MemoryGame::finish`] ends it voluntarily. Ending a
//! game with at least one cleared level counts as a win. Ending it through
//! `finish` without a mistake also counts as a perfect game.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::GameConfig;
use crate::game::{CellSource, GameError, GameView, Outcome, RoundId, ScoreTracker, SessionEngine};
use crate::stats::achievements::{AchievementEngine, UnlockedAchievement};
use crate::stats::challenges::{ChallengeScheduler, Clock, DailyChallenge, ObjectiveType};
use crate::stats::{KvStore, StatsUpdate};

/// Long-lived player progression
pub struct Progress {
    pub achievements: AchievementEngine,
    pub challenges: ChallengeScheduler,
}

impl Progress {
    /// Load achievements and challenges from `store`
    pub fn open(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            achievements: AchievementEngine::new(store.clone()),
            challenges: ChallengeScheduler::new(store, clock),
        }
    }
}

/// Something the presentation layer may want to show, play or animate
#[derive(Debug, Clone)]
pub enum GameEvent {
    RoundStarted {
        round: RoundId,
        level: u32,
    },
    Round {
        outcome: Outcome,
        /// Level the round was played at
        level: u32,
        points: u64,
        score: u64,
        combo: u32,
    },
    AchievementUnlocked(UnlockedAchievement),
    /// A new day's challenge was provisioned
    ChallengeIssued(DailyChallenge),
    ChallengeCompleted(DailyChallenge),
    GameOver {
        score: u64,
        levels_cleared: u32,
        perfect: bool,
        new_high_score: bool,
    },
}

pub struct MemoryGame<S: CellSource, V: GameView> {
    engine: SessionEngine<S, V>,
    score: ScoreTracker,
    progress: Progress,
    speed_level: u32,
    levels_cleared: u32,
    started_at: Duration,
    high_score_at_start: u64,
    in_progress: bool,
}

impl<S: CellSource, V: GameView> MemoryGame<S, V> {
    pub fn new(engine: SessionEngine<S, V>, progress: Progress) -> Self {
        let config: &GameConfig = engine.config();
        let score = ScoreTracker::new(config.combo_cap);
        let speed_level = config.speed_level;
        Self {
            engine,
            score,
            progress,
            speed_level,
            levels_cleared: 0,
            started_at: Duration::ZERO,
            high_score_at_start: 0,
            in_progress: false,
        }
    }

    /// Seed the high score carried between games
    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.score = self.score.clone().with_high_score(high_score);
        self
    }

    /// Start a fresh attempt at level 1.
    ///
    /// An attempt still in progress is ended first, the same way a wrong
    /// click would end it. If the local day rolled over since the last game,
    /// today's challenge is provisioned.
    pub fn start(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.in_progress {
            events.extend(self.end_game(false));
        }
        if let Some(challenge) = self.progress.challenges.ensure_today_challenge() {
            events.push(GameEvent::ChallengeIssued(challenge));
        }

        self.engine.reset();
        self.score.reset();
        self.levels_cleared = 0;
        self.started_at = self.engine.clock();
        self.high_score_at_start = self.score.high_score();
        self.in_progress = true;

        let round = self.engine.start_game();
        events.push(GameEvent::RoundStarted {
            round,
            level: self.engine.level(),
        });
        events
    }

    /// Let game time pass; reveals and the switch to input fire from here.
    pub fn advance(&mut self, by: Duration) -> usize {
        self.engine.advance(by)
    }

    /// Handle one player click.
    pub fn submit(&mut self, cell: u8) -> Result<Vec<GameEvent>, GameError> {
        let level = self.engine.level();
        let outcome = self.engine.submit_input(cell)?;
        let points = self.score.record(outcome, level);

        let mut events = vec![GameEvent::Round {
            outcome,
            level,
            points,
            score: self.score.score(),
            combo: self.score.combo(),
        }];

        match outcome {
            Outcome::Correct => {
                self.push_challenges(&mut events, ObjectiveType::Combo, self.score.combo().into());
            }
            Outcome::Complete => {
                self.levels_cleared += 1;
                self.on_level_cleared(level, &mut events);

                let round = self.engine.start_game();
                events.push(GameEvent::RoundStarted {
                    round,
                    level: self.engine.level(),
                });
            }
            Outcome::Wrong => {
                events.extend(self.end_game(false));
            }
        }

        Ok(events)
    }

    /// End the current game without a mistake.
    ///
    /// Does nothing when no game is in progress.
    pub fn finish(&mut self) -> Vec<GameEvent> {
        if !self.in_progress {
            return Vec::new();
        }
        let events = self.end_game(true);
        self.engine.reset();
        events
    }

    fn on_level_cleared(&mut self, level: u32, events: &mut Vec<GameEvent>) {
        let combo = self.score.combo();
        let stats = self.progress.achievements.stats();
        let update = StatsUpdate::default()
            .max_level(stats.max_level.max(level))
            .max_combo(stats.max_combo.max(combo));
        self.push_unlocks(events, &update);

        self.push_challenges(events, ObjectiveType::Combo, combo.into());
        self.push_challenges(events, ObjectiveType::Score, self.score.score());
        self.push_challenges(events, ObjectiveType::Level, self.engine.level().into());
        self.push_challenges(events, ObjectiveType::Perfect, self.levels_cleared.into());

        let elapsed = self.engine.clock().saturating_sub(self.started_at);
        let completed = self
            .progress
            .challenges
            .record_timed_clear(level, elapsed, self.speed_level);
        events.extend(completed.into_iter().map(GameEvent::ChallengeCompleted));
    }

    fn end_game(&mut self, voluntary: bool) -> Vec<GameEvent> {
        self.in_progress = false;
        self.score.settle();

        let won = self.levels_cleared > 0;
        let perfect = voluntary && won;
        let stats = self.progress.achievements.stats();
        let update = StatsUpdate::default()
            .games_played(stats.games_played + 1)
            .total_score(stats.total_score + self.score.score())
            .current_streak(if won { stats.current_streak + 1 } else { 0 })
            .perfect_games(stats.perfect_games + u64::from(perfect));

        info!(
            score = self.score.score(),
            levels_cleared = self.levels_cleared,
            perfect,
            "Game over"
        );

        let mut events = Vec::new();
        self.push_unlocks(&mut events, &update);
        events.push(GameEvent::GameOver {
            score: self.score.score(),
            levels_cleared: self.levels_cleared,
            perfect,
            new_high_score: self.score.score() > self.high_score_at_start,
        });
        events
    }

    fn push_unlocks(&mut self, events: &mut Vec<GameEvent>, update: &StatsUpdate) {
        let unlocked = self.progress.achievements.apply_stats_update(update);
        events.extend(unlocked.into_iter().map(GameEvent::AchievementUnlocked));
    }

    fn push_challenges(&mut self, events: &mut Vec<GameEvent>, kind: ObjectiveType, value: u64) {
        let completed = self.progress.challenges.record_progress(kind, value);
        events.extend(completed.into_iter().map(GameEvent::ChallengeCompleted));
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn levels_cleared(&self) -> u32 {
        self.levels_cleared
    }

    pub fn engine(&self) -> &SessionEngine<S, V> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SessionEngine<S, V> {
        &mut self.engine
    }

    pub fn score(&self) -> &ScoreTracker {
        &self.score
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }

    pub fn into_progress(self) -> Progress {
        self.progress
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::game::{Phase, RecordingView, ScriptedCells};
    use crate::stats::MemoryStore;
    use crate::stats::achievements::AchievementId;
    use crate::stats::challenges::FixedClock;

    type TestGame = MemoryGame<ScriptedCells, RecordingView>;

    fn game(cells: Vec<u8>) -> (Arc<MemoryStore>, TestGame) {
        let (store, _, game) = game_with_clock(cells);
        (store, game)
    }

    fn game_with_clock(cells: Vec<u8>) -> (Arc<MemoryStore>, Arc<FixedClock>, TestGame) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(
            Local.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).earliest().unwrap(),
        ));
        let progress = Progress {
            achievements: AchievementEngine::new(store.clone()),
            challenges: ChallengeScheduler::with_rng(
                store.clone(),
                clock.clone(),
                StdRng::seed_from_u64(7),
            ),
        };
        let engine = SessionEngine::new(
            GameConfig::default(),
            ScriptedCells::new(cells),
            RecordingView::new(),
        );
        (store, clock, MemoryGame::new(engine, progress))
    }

    /// Run the reveal until the board accepts input
    fn open_input(game: &mut TestGame) {
        while game.engine().phase() != Phase::Input {
            game.advance(Duration::from_millis(100));
        }
    }

    fn clear_round(game: &mut TestGame) -> Vec<GameEvent> {
        open_input(game);
        let sequence = game.engine().sequence().to_vec();
        let mut events = Vec::new();
        for cell in sequence {
            events.extend(game.submit(cell).unwrap());
        }
        events
    }

    fn unlocked(events: &[GameEvent]) -> Vec<AchievementId> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::AchievementUnlocked(u) => Some(u.achievement.id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_reports_first_round() {
        let (_, mut game) = game(vec![4]);
        let events = game.start();
        assert!(matches!(
            events.as_slice(),
            [GameEvent::RoundStarted { level: 1, .. }]
        ));
        assert!(game.is_in_progress());
    }

    #[test]
    fn test_clearing_a_round_scores_and_starts_next() {
        let (_, mut game) = game(vec![2, 6]);
        game.start();

        let events = clear_round(&mut game);
        assert!(matches!(
            events.first(),
            Some(GameEvent::Round {
                outcome: Outcome::Complete,
                level: 1,
                points: 1,
                ..
            })
        ));
        assert!(matches!(
            events.last(),
            Some(GameEvent::RoundStarted { level: 2, .. })
        ));
        assert_eq!(game.levels_cleared(), 1);
        assert_eq!(game.engine().sequence().len(), 2);
        assert_eq!(game.progress().achievements.stats().max_level, 1);
    }

    #[test]
    fn test_wrong_click_ends_game() {
        let (_, mut game) = game(vec![0, 1]);
        game.start();
        clear_round(&mut game);
        open_input(&mut game);

        let events = game.submit(8).unwrap();
        assert!(matches!(
            events.first(),
            Some(GameEvent::Round {
                outcome: Outcome::Wrong,
                ..
            })
        ));
        assert!(matches!(
            events.last(),
            Some(GameEvent::GameOver {
                score: 1,
                levels_cleared: 1,
                perfect: false,
                new_high_score: true,
            })
        ));
        assert_eq!(unlocked(&events), vec![AchievementId::FirstWin]);
        assert!(!game.is_in_progress());

        let stats = game.progress().achievements.stats();
        assert_eq!(stats.games_played, 1);
        assert_eq!(stats.total_score, 1);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.perfect_games, 0);

        assert_eq!(game.submit(0).unwrap_err(), GameError::RoundOver);
    }

    #[test]
    fn test_losing_without_clearing_breaks_streak() {
        let (_, mut game) = game(vec![3]);
        game.start();
        clear_round(&mut game);
        game.finish();
        assert_eq!(game.progress().achievements.stats().current_streak, 1);

        game.start();
        open_input(&mut game);
        game.submit(5).unwrap();
        let stats = game.progress().achievements.stats();
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.games_played, 2);
    }

    #[test]
    fn test_finish_counts_perfect_game() {
        let (_, mut game) = game(vec![7]);
        game.start();
        clear_round(&mut game);

        let events = game.finish();
        assert_eq!(
            unlocked(&events),
            vec![AchievementId::FirstWin, AchievementId::PerfectGame]
        );
        assert!(matches!(
            events.last(),
            Some(GameEvent::GameOver { perfect: true, .. })
        ));
        assert_eq!(game.score().high_score(), 1);
        assert!(game.engine().pending_events().next().is_none());
        assert!(game.finish().is_empty());
    }

    #[test]
    fn test_finish_without_cleared_level_is_not_a_win() {
        let (_, mut game) = game(vec![7]);
        game.start();
        let events = game.finish();
        assert!(unlocked(&events).is_empty());
        assert!(matches!(
            events.last(),
            Some(GameEvent::GameOver {
                perfect: false,
                new_high_score: false,
                ..
            })
        ));
    }

    #[test]
    fn test_submit_before_reveal_finishes_is_rejected() {
        let (_, mut game) = game(vec![1]);
        game.start();
        assert_eq!(
            game.submit(1).unwrap_err(),
            GameError::NotAcceptingInput {
                phase: Phase::Showing
            }
        );
    }

    #[test]
    fn test_progress_survives_reload() {
        let (store, mut game) = game(vec![4]);
        game.start();
        clear_round(&mut game);
        game.finish();
        drop(game);

        let clock = Arc::new(FixedClock::new(
            Local.with_ymd_and_hms(2026, 10, 16, 20, 0, 0).earliest().unwrap(),
        ));
        let progress = Progress::open(store, clock);
        assert_eq!(progress.achievements.stats().games_played, 1);
        assert!(progress.achievements.is_unlocked(AchievementId::PerfectGame));
        assert_eq!(progress.challenges.challenges().len(), 1);
    }

    #[test]
    fn test_restart_mid_game_ends_running_attempt() {
        let (_, mut game) = game(vec![2]);
        game.start();
        clear_round(&mut game);

        let events = game.start();
        assert!(matches!(
            events.as_slice(),
            [
                GameEvent::AchievementUnlocked(_),
                GameEvent::GameOver {
                    levels_cleared: 1,
                    perfect: false,
                    ..
                },
                GameEvent::RoundStarted { level: 1, .. },
            ]
        ));
        let stats = game.progress().achievements.stats();
        assert_eq!(stats.games_played, 1);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(game.score().high_score(), 1);

        // Abandoning before clearing anything breaks the streak
        game.start();
        let stats = game.progress().achievements.stats();
        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.current_streak, 0);
        assert!(game.is_in_progress());
    }

    #[test]
    fn test_start_after_midnight_issues_new_challenge() {
        let (_, clock, mut game) = game_with_clock(vec![1]);
        let first = game.start();
        assert!(!first.iter().any(|e| matches!(e, GameEvent::ChallengeIssued(_))));
        game.finish();

        clock.set(Local.with_ymd_and_hms(2026, 10, 17, 0, 5, 0).earliest().unwrap());
        let events = game.start();
        let issued: Vec<&DailyChallenge> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ChallengeIssued(c) => Some(c),
                _ => None,
            })
            .collect();
        assert_eq!(issued.len(), 1);
        assert_eq!(game.progress().challenges.active_challenges(), vec![issued[0].clone()]);

        game.finish();
        let again = game.start();
        assert!(!again.iter().any(|e| matches!(e, GameEvent::ChallengeIssued(_))));
    }
}

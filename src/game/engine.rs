//! Session engine - the per-game state machine
//!
//! ```text
//!   Waiting ──start_game──▶ Showing ──(schedule: OpenInput)──▶ Input
//!      ▲                       ▲                                 │
//!      └──────── reset ────────┴────────── start_game ───────────┘
//! ```
//!
//! Reveals are planned on a logical clock that only moves when the caller
//! advances it, either directly or through [`super::driver::play_reveal`].

use std::time::Duration;

use tracing::{debug, info};

use super::error::GameError;
use super::schedule::{RevealSchedule, RoundId, ScheduledAction, ScheduledEvent};
use super::sequence::{CELL_COUNT, CellSource, SequenceGenerator};
use super::view::{GameView, HighlightPhase, NullView};
use crate::config::GameConfig;

/// Position of the session in its state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No sequence; nothing scheduled
    Waiting,
    /// Sequence is being replayed, input is ignored
    Showing,
    /// Waiting for the player to reproduce the sequence
    Input,
}

/// Result of one accepted submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Matches so far, sequence not finished
    Correct,
    /// Mismatch; the level is back to 1
    Wrong,
    /// Whole sequence matched; the level went up by one
    Complete,
}

/// Owns one game attempt: sequence, player progress, level and phase
pub struct SessionEngine<S: CellSource = SequenceGenerator, V: GameView = NullView> {
    config: GameConfig,
    cells: S,
    view: V,
    sequence: Vec<u8>,
    player_input: Vec<u8>,
    level: u32,
    phase: Phase,
    resolved: Option<Outcome>,
    clock: Duration,
    last_round: RoundId,
    schedule: RevealSchedule,
}

impl SessionEngine {
    /// Engine with random cells and no view attached
    pub fn with_defaults() -> Self {
        Self::new(
            GameConfig::default(),
            SequenceGenerator::from_entropy(),
            NullView,
        )
    }
}

impl<S: CellSource, V: GameView> SessionEngine<S, V> {
    pub fn new(config: GameConfig, cells: S, view: V) -> Self {
        Self {
            config,
            cells,
            view,
            sequence: Vec::new(),
            player_input: Vec::new(),
            level: 1,
            phase: Phase::Waiting,
            resolved: None,
            clock: Duration::ZERO,
            last_round: 0,
            schedule: RevealSchedule::default(),
        }
    }

    /// Start a round at the current level.
    ///
    /// Any reveal still pending from an earlier round is cancelled first.
    /// Returns the id of the new round.
    pub fn start_game(&mut self) -> RoundId {
        self.cancel_pending();

        self.sequence.clear();
        self.player_input.clear();
        self.resolved = None;
        for _ in 0..self.level {
            self.sequence.push(self.cells.next_cell());
        }

        self.last_round += 1;
        self.phase = Phase::Showing;
        self.schedule = RevealSchedule::plan(
            self.last_round,
            &self.sequence,
            self.clock,
            self.config.reveal_interval(),
            self.config.trailing_pause(),
        );

        info!(
            round = self.last_round,
            level = self.level,
            "Round started, showing {} cells",
            self.sequence.len()
        );
        self.last_round
    }

    /// Submit one player click.
    ///
    /// Only valid in the input phase of an unresolved round. A rejected call
    /// does not change any state.
    pub fn submit_input(&mut self, cell: u8) -> Result<Outcome, GameError> {
        if self.phase != Phase::Input {
            return Err(GameError::NotAcceptingInput { phase: self.phase });
        }
        if cell >= CELL_COUNT {
            return Err(GameError::CellOutOfRange { cell });
        }
        if self.resolved.is_some() {
            return Err(GameError::RoundOver);
        }

        let position = self.player_input.len();
        self.player_input.push(cell);
        let hold = HighlightPhase::Press.hold(&self.config);
        self.view.highlight(cell, HighlightPhase::Press, hold);

        let outcome = if self.sequence.get(position) != Some(&cell) {
            self.level = 1;
            Outcome::Wrong
        } else if self.player_input.len() == self.sequence.len() {
            self.level += 1;
            Outcome::Complete
        } else {
            Outcome::Correct
        };

        if outcome != Outcome::Correct {
            self.resolved = Some(outcome);
            debug!(round = self.last_round, ?outcome, level = self.level, "Round resolved");
        }
        Ok(outcome)
    }

    /// Back to `Waiting` at level 1 with nothing scheduled
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.sequence.clear();
        self.player_input.clear();
        self.resolved = None;
        self.level = 1;
        self.phase = Phase::Waiting;
    }

    /// Move the logical clock forward and fire what became due.
    ///
    /// Returns the number of scheduled actions fired.
    pub fn advance(&mut self, by: Duration) -> usize {
        let target = self.clock.saturating_add(by);
        self.advance_to(target)
    }

    /// Move the logical clock to `at` (never backwards) and fire what became due.
    pub fn advance_to(&mut self, at: Duration) -> usize {
        if at > self.clock {
            self.clock = at;
        }

        let mut fired = 0;
        while let Some(event) = self.schedule.pop_due(self.clock) {
            self.fire(event);
            fired += 1;
        }
        fired
    }

    fn fire(&mut self, event: ScheduledEvent) {
        match event.action {
            ScheduledAction::Reveal { cell, .. } => {
                let hold = HighlightPhase::Reveal.hold(&self.config);
                self.view.highlight(cell, HighlightPhase::Reveal, hold);
            }
            ScheduledAction::OpenInput => {
                self.phase = Phase::Input;
                debug!(round = event.round, "Sequence shown, accepting input");
                self.view.sequence_ready();
            }
        }
    }

    fn cancel_pending(&mut self) {
        let dropped = self.schedule.cancel();
        if dropped > 0 {
            debug!(round = self.last_round, dropped, "Cancelled pending reveal");
        }
    }

    /// Force the level used by the next `start_game` (minimum 1)
    pub fn set_level(&mut self, level: u32) {
        self.level = level.max(1);
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn player_input(&self) -> &[u8] {
        &self.player_input
    }

    /// Outcome that closed the current round, if it is closed
    pub fn resolved(&self) -> Option<Outcome> {
        self.resolved
    }

    /// Current logical time
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Id of the most recently started round (0 before the first)
    pub fn round(&self) -> RoundId {
        self.last_round
    }

    /// When the next scheduled action is due
    pub fn next_deadline(&self) -> Option<Duration> {
        self.schedule.next_deadline()
    }

    pub fn pending_events(&self) -> impl Iterator<Item = &ScheduledEvent> {
        self.schedule.iter()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}

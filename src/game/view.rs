//! Render boundary
//!
//! The engine never looks at presentation state. It tells a [`GameView`]
//! which cell to light and when the player may start clicking.

use std::time::Duration;

use crate::config::GameConfig;

/// Why a cell is being lit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightPhase {
    /// Part of the sequence being shown to the player
    Reveal,
    /// An accepted player click
    Press,
}

impl HighlightPhase {
    /// How long the view should keep the cell lit
    pub fn hold(&self, config: &GameConfig) -> Duration {
        match self {
            Self::Reveal => config.reveal_hold(),
            Self::Press => config.press_hold(),
        }
    }
}

/// Presentation collaborator driven by the engine
pub trait GameView {
    /// Called once per reveal step and once per accepted click.
    ///
    /// The cell should stay lit for `hold`, then revert.
    fn highlight(&mut self, cell: u8, phase: HighlightPhase, hold: Duration);

    /// Called exactly once per round, when the session enters the input phase.
    fn sequence_ready(&mut self);
}

/// View that ignores every callback
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl GameView for NullView {
    fn highlight(&mut self, _cell: u8, _phase: HighlightPhase, _hold: Duration) {}

    fn sequence_ready(&mut self) {}
}

/// Single callback received by a [`RecordingView`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    Highlight {
        cell: u8,
        phase: HighlightPhase,
        hold: Duration,
    },
    SequenceReady,
}

/// View that keeps every callback in order, for headless drivers and tests
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells highlighted with the given phase, in call order
    pub fn cells(&self, phase: HighlightPhase) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Highlight { cell, phase: p, .. } if *p == phase => Some(*cell),
                _ => None,
            })
            .collect()
    }

    /// Hold durations passed with highlights of the given phase
    pub fn holds(&self, phase: HighlightPhase) -> Vec<Duration> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Highlight { phase: p, hold, .. } if *p == phase => Some(*hold),
                _ => None,
            })
            .collect()
    }

    pub fn ready_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ViewEvent::SequenceReady))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl GameView for RecordingView {
    fn highlight(&mut self, cell: u8, phase: HighlightPhase, hold: Duration) {
        self.events.push(ViewEvent::Highlight { cell, phase, hold });
    }

    fn sequence_ready(&mut self) {
        self.events.push(ViewEvent::SequenceReady);
    }
}

//! Game session: sequence generation, the round state machine, its reveal
//! schedule and score tracking.

pub mod driver;
mod engine;
mod error;
mod schedule;
mod score;
mod sequence;
mod view;

pub use driver::{RevealTask, play_reveal};
pub use engine::{Outcome, Phase, SessionEngine};
pub use error::GameError;
pub use schedule::{RevealSchedule, RoundId, ScheduledAction, ScheduledEvent};
pub use score::{DEFAULT_COMBO_CAP, ScoreTracker};
pub use sequence::{CELL_COUNT, CellSource, ScriptedCells, SequenceGenerator};
pub use view::{GameView, HighlightPhase, NullView, RecordingView, ViewEvent};

//! Usage errors raised by the session engine

use super::engine::Phase;

/// A caller asked the engine for something its current state does not allow.
///
/// None of these change engine state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Input is not accepted while the session is {phase:?}")]
    NotAcceptingInput { phase: Phase },

    #[error("Cell {cell} is not on the board")]
    CellOutOfRange { cell: u8 },

    #[error("The round is already resolved; start a new game or reset")]
    RoundOver,
}

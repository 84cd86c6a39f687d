//! memgrid - a 3x3 memory sequence game
//!
//! Each round the board flashes a growing sequence of cells and the player
//! repeats it. Clearing a round raises the level and grows the sequence by
//! one; a mistake sends the player back to level 1.
//!
//! ## Layers
//!
//! - [`game`]: the round state machine, its virtual-time reveal schedule and
//!   score tracking. Rendering is left to a [`game::GameView`].
//! - [`stats`]: lifetime stats, achievements and daily challenges, persisted
//!   through a [`stats::KvStore`] (SQLite by default).
//! - [`play`]: [`play::MemoryGame`] ties the two together and turns clicks
//!   into [`play::GameEvent`]s.

pub mod config;
pub mod game;
pub mod logging;
pub mod play;
pub mod stats;

pub use config::GameConfig;
pub use game::{GameError, Outcome, Phase, ScoreTracker, SessionEngine};
pub use play::{GameEvent, MemoryGame, Progress};

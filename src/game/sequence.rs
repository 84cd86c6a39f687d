//! Sequence generation
//!
//! Cells are drawn uniformly with replacement, so a sequence may repeat a cell.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Number of cells on the 3x3 board
pub const CELL_COUNT: u8 = 9;

/// Source of cell indices for new sequences
pub trait CellSource {
    /// Next cell index in `[0, CELL_COUNT)`
    fn next_cell(&mut self) -> u8;
}

/// Uniform generator backed by an injected randomness source
#[derive(Debug, Clone)]
pub struct SequenceGenerator<R: RngCore = StdRng> {
    rng: R,
}

impl SequenceGenerator<StdRng> {
    /// Generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Deterministic generator for replays and tests
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> SequenceGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn next(&mut self) -> u8 {
        self.rng.gen_range(0..CELL_COUNT)
    }
}

impl<R: RngCore> CellSource for SequenceGenerator<R> {
    fn next_cell(&mut self) -> u8 {
        self.next()
    }
}

/// Replays a fixed list of cells, cycling when exhausted.
///
/// Useful for scripted demos and tests that need a known sequence.
#[derive(Debug, Clone)]
pub struct ScriptedCells {
    script: Vec<u8>,
    queue: VecDeque<u8>,
}

impl ScriptedCells {
    /// Panics if `cells` is empty or contains an index outside the board.
    pub fn new(cells: impl IntoIterator<Item = u8>) -> Self {
        let script: Vec<u8> = cells.into_iter().collect();
        assert!(!script.is_empty(), "scripted cell list must not be empty");
        assert!(
            script.iter().all(|&c| c < CELL_COUNT),
            "scripted cells must be below {CELL_COUNT}"
        );
        Self {
            queue: script.iter().copied().collect(),
            script,
        }
    }
}

impl CellSource for ScriptedCells {
    fn next_cell(&mut self) -> u8 {
        if self.queue.is_empty() {
            self.queue.extend(self.script.iter().copied());
        }
        // Refilled above from a non-empty script
        self.queue.pop_front().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_stays_on_board() {
        let mut generator = SequenceGenerator::seeded(7);
        for _ in 0..1000 {
            assert!(generator.next() < CELL_COUNT);
        }
    }

    #[test]
    fn test_generator_covers_every_cell() {
        let mut generator = SequenceGenerator::seeded(42);
        let mut seen = [false; CELL_COUNT as usize];
        for _ in 0..1000 {
            seen[generator.next() as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_same_seed_same_cells() {
        let mut a = SequenceGenerator::seeded(3);
        let mut b = SequenceGenerator::seeded(3);
        let left: Vec<u8> = (0..20).map(|_| a.next()).collect();
        let right: Vec<u8> = (0..20).map(|_| b.next()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_scripted_cells_cycle() {
        let mut cells = ScriptedCells::new([4, 4, 1]);
        let drawn: Vec<u8> = (0..5).map(|_| cells.next_cell()).collect();
        assert_eq!(drawn, vec![4, 4, 1, 4, 4]);
    }

    #[test]
    #[should_panic]
    fn test_scripted_cells_reject_off_board() {
        ScriptedCells::new([9]);
    }
}

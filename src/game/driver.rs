//! Real-time playback of the reveal schedule
//!
//! The engine's clock is logical; these helpers map it onto tokio timers so a
//! front end can show the sequence at the configured pace.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use super::engine::SessionEngine;
use super::schedule::RoundId;
use super::sequence::CellSource;
use super::view::GameView;

/// Sleep until each pending deadline and fire it, until nothing is pending.
///
/// Dropping the future stops playback; nothing fires after that point.
/// Returns the number of actions fired.
pub async fn play_reveal<S: CellSource, V: GameView>(engine: &mut SessionEngine<S, V>) -> usize {
    let mut fired = 0;
    while let Some(deadline) = engine.next_deadline() {
        let wait = deadline.saturating_sub(engine.clock());
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        fired += engine.advance_to(deadline);
    }
    fired
}

/// Background playback bound to one round of a shared engine
pub struct RevealTask {
    round: RoundId,
    handle: JoinHandle<usize>,
}

impl RevealTask {
    /// Play the current round of `engine` on a tokio task.
    ///
    /// The task stops on its own once the engine moves to another round, so a
    /// restart never receives reveals from the round it replaced.
    pub fn spawn<S, V>(engine: Arc<Mutex<SessionEngine<S, V>>>, round: RoundId) -> Self
    where
        S: CellSource + Send + 'static,
        V: GameView + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut fired = 0;
            loop {
                let (deadline, wait) = {
                    let engine = engine.lock().await;
                    if engine.round() != round {
                        debug!(round, "Round superseded, stopping reveal playback");
                        break;
                    }
                    let Some(deadline) = engine.next_deadline() else {
                        break;
                    };
                    (deadline, deadline.saturating_sub(engine.clock()))
                };

                if !wait.is_zero() {
                    tokio::time::sleep(wait).await;
                }

                let mut engine = engine.lock().await;
                if engine.round() != round {
                    debug!(round, "Round superseded, stopping reveal playback");
                    break;
                }
                fired += engine.advance_to(deadline);
            }
            fired
        });

        Self { round, handle }
    }

    pub fn round(&self) -> RoundId {
        self.round
    }

    /// Stop playback immediately
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for playback to end; a cancelled task reports zero fired actions.
    pub async fn join(self) -> usize {
        self.handle.await.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::GameConfig;
    use crate::game::engine::Phase;
    use crate::game::sequence::ScriptedCells;
    use crate::game::view::{HighlightPhase, RecordingView};

    fn engine(cells: &[u8], level: u32) -> SessionEngine<ScriptedCells, RecordingView> {
        let mut engine = SessionEngine::new(
            GameConfig::default(),
            ScriptedCells::new(cells.iter().copied()),
            RecordingView::new(),
        );
        engine.set_level(level);
        engine
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_reveal_takes_configured_time() {
        let mut engine = engine(&[1, 5], 2);
        engine.start_game();

        let started = tokio::time::Instant::now();
        let fired = play_reveal(&mut engine).await;

        assert_eq!(fired, 3);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(2500));
        assert!(elapsed < Duration::from_millis(2600));
        assert_eq!(engine.phase(), Phase::Input);
        assert_eq!(engine.view().cells(HighlightPhase::Reveal), vec![1, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_task_plays_round() {
        let mut engine = engine(&[0, 4, 8], 3);
        let round = engine.start_game();
        let shared = Arc::new(Mutex::new(engine));

        let task = RevealTask::spawn(shared.clone(), round);
        assert_eq!(task.join().await, 4);

        let engine = shared.lock().await;
        assert_eq!(engine.phase(), Phase::Input);
        assert_eq!(engine.view().cells(HighlightPhase::Reveal), vec![0, 4, 8]);
        assert_eq!(engine.view().ready_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_task_stops_when_round_replaced() {
        let mut engine = engine(&[2, 3, 6, 7], 2);
        let first = engine.start_game();
        let shared = Arc::new(Mutex::new(engine));

        let stale = RevealTask::spawn(shared.clone(), first);
        tokio::time::sleep(Duration::from_millis(10)).await;

        let second = shared.lock().await.start_game();
        assert_eq!(stale.join().await, 1);

        let task = RevealTask::spawn(shared.clone(), second);
        task.join().await;

        let engine = shared.lock().await;
        assert_eq!(engine.view().cells(HighlightPhase::Reveal), vec![2, 6, 7]);
        assert_eq!(engine.view().ready_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_fires_nothing_more() {
        let mut engine = engine(&[1, 2, 3], 3);
        let round = engine.start_game();
        let shared = Arc::new(Mutex::new(engine));

        let task = RevealTask::spawn(shared.clone(), round);
        task.cancel();
        assert_eq!(task.join().await, 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        let engine = shared.lock().await;
        assert_eq!(engine.phase(), Phase::Showing);
    }
}

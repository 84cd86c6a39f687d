//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use tempfile::TempDir;

use memgrid::game::{Phase, RecordingView, ScriptedCells};
use memgrid::stats::SqliteStore;
use memgrid::stats::challenges::FixedClock;
use memgrid::{GameConfig, SessionEngine};

pub type TestEngine = SessionEngine<ScriptedCells, RecordingView>;

/// Local time on October `day`, 2026 at `hour`
pub fn local_at(day: u32, hour: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 10, day, hour, 0, 0)
        .earliest()
        .expect("valid local time")
}

pub fn fixed_clock(day: u32, hour: u32) -> Arc<FixedClock> {
    Arc::new(FixedClock::new(local_at(day, hour)))
}

/// SQLite progress store in a fresh temp directory
pub fn sqlite_store() -> (TempDir, Arc<SqliteStore>) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store =
        SqliteStore::open(&dir.path().join("progress.db")).expect("Failed to open store");
    (dir, Arc::new(store))
}

pub fn scripted_engine(cells: &[u8]) -> TestEngine {
    SessionEngine::new(
        GameConfig::default(),
        ScriptedCells::new(cells.to_vec()),
        RecordingView::new(),
    )
}

/// Start a round at `level` and run the reveal until input opens
pub fn ready_round(engine: &mut TestEngine, level: u32) {
    engine.set_level(level);
    engine.start_game();
    let end = engine.clock() + Duration::from_secs(60);
    engine.advance_to(end);
    assert_eq!(engine.phase(), Phase::Input);
}

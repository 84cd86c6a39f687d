//! Virtual-time reveal schedule
//!
//! A round's reveal is planned up front as an ordered list of `(at, action)`
//! entries on the session's logical clock. The owning engine pops due entries
//! as its clock advances. Replacing or cancelling the schedule drops every
//! pending entry at once, so nothing from a superseded round can fire.

use std::collections::VecDeque;
use std::time::Duration;

/// Identifier of one `start_game` invocation
pub type RoundId = u64;

/// What a scheduled entry does when it comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAction {
    /// Light a sequence cell
    Reveal { position: usize, cell: u8 },
    /// Switch the session to the input phase
    OpenInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub round: RoundId,
    pub at: Duration,
    pub action: ScheduledAction,
}

/// Pending entries for at most one round, ordered by `at`
#[derive(Debug, Clone, Default)]
pub struct RevealSchedule {
    round: Option<RoundId>,
    events: VecDeque<ScheduledEvent>,
}

/// `start + steps * interval`, saturating at `Duration::MAX`
fn offset(start: Duration, interval: Duration, steps: usize) -> Duration {
    let steps = u32::try_from(steps).unwrap_or(u32::MAX);
    interval
        .checked_mul(steps)
        .and_then(|span| start.checked_add(span))
        .unwrap_or(Duration::MAX)
}

impl RevealSchedule {
    /// Plan the reveal of `sequence` starting at `start`.
    ///
    /// Reveal `i` is due at `start + i * interval`; input opens at
    /// `start + len * interval + trailing_pause`.
    pub fn plan(
        round: RoundId,
        sequence: &[u8],
        start: Duration,
        interval: Duration,
        trailing_pause: Duration,
    ) -> Self {
        let mut events: VecDeque<ScheduledEvent> = sequence
            .iter()
            .enumerate()
            .map(|(position, &cell)| ScheduledEvent {
                round,
                at: offset(start, interval, position),
                action: ScheduledAction::Reveal { position, cell },
            })
            .collect();

        events.push_back(ScheduledEvent {
            round,
            at: offset(start, interval, sequence.len()).saturating_add(trailing_pause),
            action: ScheduledAction::OpenInput,
        });

        Self {
            round: Some(round),
            events,
        }
    }

    /// Round the pending entries belong to, if any are pending
    pub fn round(&self) -> Option<RoundId> {
        if self.events.is_empty() {
            None
        } else {
            self.round
        }
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.events.front().map(|e| e.at)
    }

    /// Remove and return the earliest entry if it is due at `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<ScheduledEvent> {
        match self.events.front() {
            Some(event) if event.at <= now => self.events.pop_front(),
            _ => None,
        }
    }

    /// Drop every pending entry, returning how many were dropped.
    pub fn cancel(&mut self) -> usize {
        let dropped = self.events.len();
        self.events.clear();
        self.round = None;
        dropped
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledEvent> {
        self.events.iter()
    }
}

//! Daily challenge scheduler
//!
//! One challenge per local calendar day. A challenge is `Active` until it is
//! completed or its day ends; both are terminal. Progress only ever moves up.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use super::clock::{Clock, day_window};
use super::definitions::{CHALLENGE_TEMPLATES, ChallengeTemplate, DailyChallenge, ObjectiveType};
use crate::stats::store::{CHALLENGES_KEY, KvStore, load_json, save_json};

pub struct ChallengeScheduler {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    challenges: Vec<DailyChallenge>,
}

impl ChallengeScheduler {
    /// Load stored challenges and make sure today has one.
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_rng(store, clock, StdRng::from_entropy())
    }

    /// Like [`ChallengeScheduler::new`] with a caller-supplied random source
    pub fn with_rng(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>, rng: StdRng) -> Self {
        let challenges =
            load_json::<Vec<DailyChallenge>>(store.as_ref(), CHALLENGES_KEY).unwrap_or_default();
        debug!("Loaded {} stored challenges", challenges.len());

        let mut scheduler = Self {
            store,
            clock,
            rng,
            challenges,
        };
        scheduler.ensure_today_challenge();
        scheduler
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now().with_timezone(&Utc)
    }

    /// Provision today's challenge if it does not exist yet.
    ///
    /// A challenge belongs to today when it expires at the end of today,
    /// i.e. inside `(today, tomorrow]`. When none does, challenges from
    /// earlier days are dropped and one template is drawn with a uniform
    /// shuffle. Returns the new challenge, if one was created.
    pub fn ensure_today_challenge(&mut self) -> Option<DailyChallenge> {
        let now = self.clock.now();
        let (today, tomorrow) = day_window(now);

        if self
            .challenges
            .iter()
            .any(|c| c.expires_at > today && c.expires_at <= tomorrow)
        {
            return None;
        }

        let before = self.challenges.len();
        self.challenges.retain(|c| c.expires_at > today);
        let dropped = before - self.challenges.len();
        if dropped > 0 {
            debug!("Dropped {} challenges from earlier days", dropped);
        }

        let mut templates: Vec<&ChallengeTemplate> = CHALLENGE_TEMPLATES.iter().collect();
        templates.shuffle(&mut self.rng);
        let template = templates.first()?;

        let id = format!("daily_{}_0", now.timestamp_millis());
        let challenge = template.instantiate(id, tomorrow);
        info!(
            "New daily challenge: {} ({} >= {})",
            challenge.title,
            challenge.objective.kind.as_str(),
            challenge.objective.target
        );

        self.challenges.push(challenge.clone());
        self.save();
        Some(challenge)
    }

    /// Challenges that have not expired and are not completed
    pub fn active_challenges(&self) -> Vec<DailyChallenge> {
        let now = self.now();
        self.challenges
            .iter()
            .filter(|c| c.is_active(now))
            .cloned()
            .collect()
    }

    /// Challenges completed within today's window
    pub fn completed_today(&self) -> Vec<DailyChallenge> {
        let (today, tomorrow) = day_window(self.clock.now());
        self.challenges
            .iter()
            .filter(|c| c.completed && c.expires_at > today && c.expires_at <= tomorrow)
            .cloned()
            .collect()
    }

    /// Raise progress of every active challenge of `kind` to at least `value`.
    ///
    /// Returns the challenges this call completed.
    pub fn record_progress(&mut self, kind: ObjectiveType, value: u64) -> Vec<DailyChallenge> {
        let now = self.now();
        self.update_active(now, |c| {
            if c.objective.kind == kind {
                Some(value)
            } else {
                None
            }
        })
    }

    /// Report that `level` was cleared `elapsed` after the game started.
    ///
    /// Completes every active speed challenge whose time limit was beaten
    /// (strictly less than the limit), as long as `level` reaches `speed_level`.
    pub fn record_timed_clear(
        &mut self,
        level: u32,
        elapsed: Duration,
        speed_level: u32,
    ) -> Vec<DailyChallenge> {
        if level < speed_level {
            return Vec::new();
        }
        let now = self.now();
        self.update_active(now, |c| {
            if c.objective.kind != ObjectiveType::Speed {
                return None;
            }
            let limit = c.objective.time_limit.unwrap_or(c.objective.target);
            if elapsed < Duration::from_secs(limit) {
                Some(c.objective.target)
            } else {
                None
            }
        })
    }

    fn update_active(
        &mut self,
        now: DateTime<Utc>,
        value_for: impl Fn(&DailyChallenge) -> Option<u64>,
    ) -> Vec<DailyChallenge> {
        let mut completed = Vec::new();
        let mut changed = false;

        for challenge in self.challenges.iter_mut().filter(|c| c.is_active(now)) {
            let Some(value) = value_for(challenge) else {
                continue;
            };

            if value > challenge.progress {
                challenge.progress = value;
                changed = true;
            }

            if challenge.progress >= challenge.objective.target {
                challenge.completed = true;
                changed = true;
                info!("Daily challenge completed: {}", challenge.title);
                completed.push(challenge.clone());
            }
        }

        if changed {
            self.save();
        }
        completed
    }

    /// Drop every challenge whose expiry has passed. Returns how many went.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.now();
        let before = self.challenges.len();
        self.challenges.retain(|c| c.expires_at > now);
        let dropped = before - self.challenges.len();
        if dropped > 0 {
            debug!("Purged {} expired challenges", dropped);
        }
        self.save();
        dropped
    }

    /// Every stored challenge, in creation order
    pub fn challenges(&self) -> &[DailyChallenge] {
        &self.challenges
    }

    fn save(&self) {
        save_json(self.store.as_ref(), CHALLENGES_KEY, &self.challenges);
    }
}

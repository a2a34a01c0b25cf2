use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Item, TrainerMode};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("score ({score}) exceeds total items ({total})")]
    ScoreOutOfRange { score: u32, total: u32 },

    #[error("too many outcomes for a single session: {len}")]
    TooManyOutcomes { len: usize },
}

/// How a single item ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemOutcome {
    Correct,
    Incorrect,
    Timeout,
}

impl ItemOutcome {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, ItemOutcome::Correct)
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One bounded, ordered practice run.
///
/// `index` stays within `[0, len)` while the session is active and equals `len`
/// once it is complete; nothing mutates a completed session. `score` moves at
/// most once per item, guarded by `answered`.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    items: Vec<Item>,
    index: usize,
    score: u32,
    answered: bool,
    completed: bool,
    outcomes: Vec<ItemOutcome>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session over already sampled items.
    ///
    /// Returns `None` when `items` is empty; a session always has a current item
    /// until it completes.
    #[must_use]
    pub fn new(items: Vec<Item>, started_at: DateTime<Utc>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        let capacity = items.len();
        Some(Self {
            items,
            index: 0,
            score: 0,
            answered: false,
            completed: false,
            outcomes: Vec::with_capacity(capacity),
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; an empty session cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.answered
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&Item> {
        if self.completed {
            None
        } else {
            self.items.get(self.index)
        }
    }

    /// Record the outcome of the current item.
    ///
    /// Returns false, changing nothing, if the item was already answered or the
    /// session is complete.
    pub fn record(&mut self, outcome: ItemOutcome) -> bool {
        if self.answered || self.completed {
            return false;
        }
        self.answered = true;
        if outcome.is_correct() {
            self.score = self.score.saturating_add(1);
        }
        self.outcomes.push(outcome);
        true
    }

    /// Move past the current item.
    ///
    /// Returns true when a next item is now current, false when this call (or an
    /// earlier one) completed the session.
    pub fn advance(&mut self, now: DateTime<Utc>) -> bool {
        if self.completed {
            return false;
        }
        if self.index + 1 >= self.items.len() {
            self.index = self.items.len();
            self.completed = true;
            self.completed_at = Some(now);
            return false;
        }
        self.index += 1;
        self.answered = false;
        true
    }

    /// Summary of a completed session, `None` while still in progress.
    ///
    /// # Errors
    ///
    /// Propagates `SessionSummaryError` if the recorded data is inconsistent.
    pub fn summary(
        &self,
        mode: TrainerMode,
    ) -> Option<Result<SessionSummary, SessionSummaryError>> {
        let completed_at = self.completed_at?;
        Some(SessionSummary::from_outcomes(
            mode,
            self.started_at,
            completed_at,
            u32::try_from(self.items.len()).unwrap_or(u32::MAX),
            &self.outcomes,
        ))
    }
}

//
// ─── SUMMARY ───────────────────────────────────────────────────────────────────
//

/// Aggregate result of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    mode: TrainerMode,
    total: u32,
    score: u32,
    incorrect: u32,
    timeouts: u32,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl SessionSummary {
    /// Build a summary from per-item outcomes.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SessionSummaryError::TooManyOutcomes` if the outcome count cannot fit in `u32`.
    /// Returns `SessionSummaryError::ScoreOutOfRange` if more items were correct than presented.
    pub fn from_outcomes(
        mode: TrainerMode,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        total: u32,
        outcomes: &[ItemOutcome],
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        u32::try_from(outcomes.len())
            .map_err(|_| SessionSummaryError::TooManyOutcomes { len: outcomes.len() })?;

        let mut score = 0_u32;
        let mut incorrect = 0_u32;
        let mut timeouts = 0_u32;
        for outcome in outcomes {
            match outcome {
                ItemOutcome::Correct => score = score.saturating_add(1),
                ItemOutcome::Incorrect => incorrect = incorrect.saturating_add(1),
                ItemOutcome::Timeout => timeouts = timeouts.saturating_add(1),
            }
        }
        if score > total {
            return Err(SessionSummaryError::ScoreOutOfRange { score, total });
        }

        Ok(Self {
            mode,
            total,
            score,
            incorrect,
            timeouts,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn mode(&self) -> TrainerMode {
        self.mode
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn timeouts(&self) -> u32 {
        self.timeouts
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

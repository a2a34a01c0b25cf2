use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use recall_core::model::{Item, Pool, Session, SessionConfig};

use crate::error::SessionError;

/// Samples and orders a bounded subset of a pool into a session.
pub struct SessionBuilder<'a> {
    pool: &'a Pool,
    config: &'a SessionConfig,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(pool: &'a Pool, config: &'a SessionConfig) -> Self {
        Self { pool, config }
    }

    /// Shuffle a copy of the pool and keep the first `size` items.
    ///
    /// Undersized pools yield a shorter session rather than an error. The pool
    /// itself is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` if the pool has no items.
    pub fn build<R: Rng + ?Sized>(
        self,
        rng: &mut R,
        started_at: DateTime<Utc>,
    ) -> Result<Session, SessionError> {
        if self.pool.is_empty() {
            return Err(SessionError::EmptyPool);
        }

        let mut items: Vec<Item> = self.pool.items().to_vec();
        // `shuffle` is an unbiased Fisher-Yates pass.
        items.shuffle(rng);
        items.truncate(usize::try_from(self.config.size()).unwrap_or(usize::MAX));

        Session::new(items, started_at).ok_or(SessionError::EmptyPool)
    }
}

/// Draw up to `n - 1` distinct items from `pool`, never `correct` itself.
///
/// Returns fewer items when the pool is too small.
pub fn distractors<R: Rng + ?Sized>(
    pool: &Pool,
    correct: &Item,
    n: usize,
    rng: &mut R,
) -> Vec<Item> {
    let mut others: Vec<&Item> = pool
        .iter()
        .filter(|item| item.id() != correct.id())
        .collect();
    others.shuffle(rng);
    others
        .into_iter()
        .take(n.saturating_sub(1))
        .cloned()
        .collect()
}

/// The full option set for one quiz question: the correct item plus its
/// distractors, shuffled so the correct position is not predictable.
pub fn build_choices<R: Rng + ?Sized>(
    pool: &Pool,
    correct: &Item,
    n: usize,
    rng: &mut R,
) -> Vec<Item> {
    let mut choices = distractors(pool, correct, n, rng);
    choices.push(correct.clone());
    choices.shuffle(rng);
    choices
}

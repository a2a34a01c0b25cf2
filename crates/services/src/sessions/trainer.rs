use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use recall_core::Clock;
use recall_core::model::{
    AdvancePolicy, Item, ItemOutcome, Pool, Session, SessionSummary, TrainerConfig,
    TrainerConfigDraft, TrainerMode,
};

use super::countdown::{Countdown, TICK_INTERVAL, TickOutcome, TickToken};
use super::evaluator::{Answer, Evaluator};
use super::plan::{SessionBuilder, build_choices};
use super::stimulus::StimulusPlayer;
use super::view::{ChoiceView, FeedbackView, InputView, PromptView, TrainerSnapshot};
use crate::error::SessionError;

//
// ─── PHASES & TIMERS ───────────────────────────────────────────────────────────
//

/// Phase a paused trainer returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Resumable {
    Presenting,
    AwaitingInput,
}

impl From<Resumable> for TrainerPhase {
    fn from(value: Resumable) -> Self {
        match value {
            Resumable::Presenting => TrainerPhase::Presenting,
            Resumable::AwaitingInput => TrainerPhase::AwaitingInput,
        }
    }
}

/// Trainer lifecycle.
///
/// Advancing is not a resting phase: it happens inside `next` or an advance
/// timer and always lands in `Presenting` or `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TrainerPhase {
    Configuring,
    /// Item shown and cue playing; lasts until the first countdown tick.
    Presenting,
    AwaitingInput,
    Feedback,
    Paused(Resumable),
    Completed,
}

/// Handle tying an auto-advance to the feedback phase that armed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdvanceToken(u64);

/// The one timer the trainer wants armed right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingTimer {
    Tick(TickToken),
    Advance { token: AdvanceToken, delay: Duration },
}

impl PendingTimer {
    #[must_use]
    pub fn delay(&self) -> Duration {
        match self {
            PendingTimer::Tick(_) => TICK_INTERVAL,
            PendingTimer::Advance { delay, .. } => *delay,
        }
    }
}

//
// ─── TRAINER ───────────────────────────────────────────────────────────────────
//

/// Timed recall trainer for both quiz and dictation.
///
/// Every handler checks the phase first and returns `false` for events that do
/// not apply (double clicks, late timers, input after completion). The
/// `answered` flag on the session makes a submission and a timeout for the same
/// item mutually exclusive: whichever is handled first wins.
pub struct Trainer<P: StimulusPlayer> {
    pool: Pool,
    player: P,
    rng: StdRng,
    clock: Clock,
    phase: TrainerPhase,
    config: Option<TrainerConfig>,
    session: Option<Session>,
    countdown: Countdown,
    choices: Vec<Item>,
    last_result: Option<FeedbackView>,
    advance_generation: u64,
    armed_advance: Option<(AdvanceToken, Duration)>,
    summary: Option<SessionSummary>,
}

impl<P: StimulusPlayer> Trainer<P> {
    #[must_use]
    pub fn new(pool: Pool, player: P) -> Self {
        Self {
            pool,
            player,
            rng: StdRng::from_os_rng(),
            clock: Clock::default(),
            phase: TrainerPhase::Configuring,
            config: None,
            session: None,
            countdown: Countdown::new(),
            choices: Vec::new(),
            last_result: None,
            advance_generation: 0,
            armed_advance: None,
            summary: None,
        }
    }

    /// Use a seeded RNG so sampling and option order are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Override the wall clock used for summary timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn phase(&self) -> TrainerPhase {
        self.phase
    }

    #[must_use]
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    #[must_use]
    pub fn choices(&self) -> &[Item] {
        &self.choices
    }

    #[must_use]
    pub fn last_result(&self) -> Option<&FeedbackView> {
        self.last_result.as_ref()
    }

    #[must_use]
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn player(&self) -> &P {
        &self.player
    }

    #[must_use]
    pub fn can_start(&self) -> bool {
        self.phase == TrainerPhase::Configuring && !self.pool.is_empty()
    }

    fn mode(&self) -> Option<TrainerMode> {
        self.config.as_ref().map(TrainerConfig::mode)
    }

    fn accepts_input(&self) -> bool {
        matches!(
            self.phase,
            TrainerPhase::Presenting | TrainerPhase::AwaitingInput
        )
    }

    //
    // ─── USER ACTIONS ──────────────────────────────────────────────────────────
    //

    /// Build a session and present its first item.
    ///
    /// Returns `Ok(false)` if a session is already running.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` if there is nothing to train on; the
    /// trainer then stays in `Configuring`.
    pub fn start(&mut self, config: TrainerConfig) -> Result<bool, SessionError> {
        if self.phase != TrainerPhase::Configuring {
            tracing::trace!(phase = ?self.phase, "start ignored");
            return Ok(false);
        }

        let session = SessionBuilder::new(&self.pool, config.session())
            .build(&mut self.rng, self.clock.now())?;
        tracing::info!(
            mode = ?config.mode(),
            items = session.len(),
            pool = self.pool.len(),
            limit_secs = config.per_item_limit_secs(),
            "trainer session started"
        );

        self.config = Some(config);
        self.session = Some(session);
        self.summary = None;
        self.present();
        Ok(true)
    }

    /// Validate a page-supplied draft, then [`Trainer::start`].
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` for an invalid draft and
    /// `SessionError::EmptyPool` for an empty pool.
    pub fn start_with_draft(&mut self, draft: TrainerConfigDraft) -> Result<bool, SessionError> {
        let config = draft.validate()?;
        self.start(config)
    }

    /// Submit an answer for the current item.
    pub fn submit_answer(&mut self, answer: Answer) -> bool {
        if !self.accepts_input() {
            tracing::trace!(phase = ?self.phase, "answer ignored");
            return false;
        }
        let Some(config) = self.config else {
            return false;
        };
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.is_answered() {
            tracing::trace!("answer ignored: item already answered");
            return false;
        }
        let Some(current) = session.current_item().cloned() else {
            return false;
        };
        if let Answer::Choice(id) = &answer {
            if !self.choices.iter().any(|choice| choice.id() == id) {
                tracing::trace!(%id, "answer ignored: not an offered option");
                return false;
            }
        }
        let Some(correct) = Evaluator::for_mode(config.mode()).evaluate(&answer, &current) else {
            tracing::trace!("answer ignored: wrong kind for mode");
            return false;
        };

        self.countdown.stop();
        let outcome = if correct {
            ItemOutcome::Correct
        } else {
            ItemOutcome::Incorrect
        };
        session.record(outcome);
        self.enter_feedback(outcome, Some(answer), current);
        true
    }

    /// Leave feedback for the next item (or completion).
    ///
    /// Required under the manual policy; under the auto policy it skips the
    /// remaining delay.
    pub fn next(&mut self) -> bool {
        if self.phase != TrainerPhase::Feedback {
            tracing::trace!(phase = ?self.phase, "next ignored");
            return false;
        }
        self.advance();
        true
    }

    /// Freeze the countdown and silence the cue.
    pub fn pause(&mut self) -> bool {
        let resume_to = match self.phase {
            TrainerPhase::Presenting => Resumable::Presenting,
            TrainerPhase::AwaitingInput => Resumable::AwaitingInput,
            _ => {
                tracing::trace!(phase = ?self.phase, "pause ignored");
                return false;
            }
        };
        self.countdown.pause();
        self.player.stop();
        self.phase = TrainerPhase::Paused(resume_to);
        tracing::debug!(remaining = self.countdown.remaining(), "trainer paused");
        true
    }

    /// Continue from the frozen countdown. The cue is not replayed.
    pub fn resume(&mut self) -> bool {
        let TrainerPhase::Paused(resume_to) = self.phase else {
            tracing::trace!(phase = ?self.phase, "resume ignored");
            return false;
        };
        self.countdown.resume();
        self.phase = resume_to.into();
        tracing::debug!(remaining = self.countdown.remaining(), "trainer resumed");
        true
    }

    /// Throw the session away and return to `Configuring`.
    pub fn restart(&mut self) -> bool {
        if self.phase == TrainerPhase::Configuring {
            tracing::trace!("restart ignored");
            return false;
        }
        self.countdown.reset();
        self.player.stop();
        self.disarm_advance();
        self.session = None;
        self.config = None;
        self.choices.clear();
        self.last_result = None;
        self.summary = None;
        self.phase = TrainerPhase::Configuring;
        tracing::debug!("trainer restarted");
        true
    }

    //
    // ─── TIMER EVENTS ──────────────────────────────────────────────────────────
    //

    /// The timer the host should have armed right now, if any.
    #[must_use]
    pub fn pending_timer(&self) -> Option<PendingTimer> {
        match self.phase {
            TrainerPhase::Presenting | TrainerPhase::AwaitingInput => {
                self.countdown.live_token().map(PendingTimer::Tick)
            }
            TrainerPhase::Feedback => self
                .armed_advance
                .map(|(token, delay)| PendingTimer::Advance { token, delay }),
            _ => None,
        }
    }

    /// Deliver a timer previously returned by [`Trainer::pending_timer`].
    pub fn fire(&mut self, timer: PendingTimer) -> bool {
        match timer {
            PendingTimer::Tick(token) => self.on_tick(token),
            PendingTimer::Advance { token, .. } => self.on_advance_due(token),
        }
    }

    /// One countdown second elapsed.
    pub fn on_tick(&mut self, token: TickToken) -> bool {
        if !self.accepts_input() {
            tracing::trace!(phase = ?self.phase, "tick ignored");
            return false;
        }
        match self.countdown.tick(token) {
            TickOutcome::Ignored => {
                tracing::trace!("stale tick ignored");
                false
            }
            TickOutcome::Ticked { .. } => {
                self.phase = TrainerPhase::AwaitingInput;
                true
            }
            TickOutcome::TimedOut => self.on_timeout(),
        }
    }

    /// The feedback delay of the auto policy elapsed.
    pub fn on_advance_due(&mut self, token: AdvanceToken) -> bool {
        let armed = self.armed_advance.map(|(armed, _)| armed);
        if self.phase != TrainerPhase::Feedback || armed != Some(token) {
            tracing::trace!(phase = ?self.phase, "stale advance ignored");
            return false;
        }
        self.advance();
        true
    }

    fn on_timeout(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.is_answered() {
            return false;
        }
        let Some(current) = session.current_item().cloned() else {
            return false;
        };
        session.record(ItemOutcome::Timeout);
        self.enter_feedback(ItemOutcome::Timeout, None, current);
        true
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    fn present(&mut self) {
        let Some(config) = self.config else {
            return;
        };
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(item) = session.current_item().cloned() else {
            return;
        };
        let index = session.index();

        self.disarm_advance();
        self.player.stop();
        self.player.play(item.stimulus_ref());

        self.choices = match config.mode() {
            TrainerMode::Quiz => build_choices(
                &self.pool,
                &item,
                config.session().options_per_question(),
                &mut self.rng,
            ),
            TrainerMode::Dictation => Vec::new(),
        };
        self.last_result = None;
        self.countdown.start(config.per_item_limit_secs());
        self.phase = TrainerPhase::Presenting;
        tracing::debug!(index, item = %item.id(), "presenting item");
    }

    fn enter_feedback(&mut self, outcome: ItemOutcome, submitted: Option<Answer>, expected: Item) {
        tracing::debug!(?outcome, item = %expected.id(), "item finished");
        self.last_result = Some(FeedbackView {
            outcome,
            submitted,
            expected,
        });
        self.phase = TrainerPhase::Feedback;

        if let Some(AdvancePolicy::Auto(delay)) = self.config.map(|c| c.advance_policy()) {
            self.advance_generation += 1;
            self.armed_advance = Some((AdvanceToken(self.advance_generation), delay));
        }
    }

    fn advance(&mut self) {
        self.disarm_advance();
        let now = self.clock.now();
        let mode = self.mode().unwrap_or_default();
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if session.advance(now) {
            self.present();
            return;
        }

        self.countdown.stop();
        self.choices.clear();
        self.phase = TrainerPhase::Completed;
        self.summary = match session.summary(mode) {
            Some(Ok(summary)) => Some(summary),
            Some(Err(err)) => {
                tracing::warn!(%err, "could not summarize session");
                None
            }
            None => None,
        };
        tracing::info!(
            score = session.score(),
            total = session.len(),
            "trainer session completed"
        );
    }

    fn disarm_advance(&mut self) {
        if self.armed_advance.take().is_some() {
            self.advance_generation += 1;
        }
    }

    //
    // ─── SNAPSHOT ──────────────────────────────────────────────────────────────
    //

    /// Everything the page needs to render the current state.
    #[must_use]
    pub fn snapshot(&self) -> TrainerSnapshot {
        let (index, total, score) = self
            .session
            .as_ref()
            .map_or((0, 0, 0), |s| (s.index(), s.len(), s.score()));

        let current = match self.phase {
            TrainerPhase::Configuring | TrainerPhase::Completed => None,
            _ => self
                .session
                .as_ref()
                .and_then(Session::current_item)
                .map(PromptView::from),
        };

        let input = match (self.accepts_input(), self.mode()) {
            (true, Some(TrainerMode::Quiz)) => {
                InputView::Choices(self.choices.iter().map(ChoiceView::from).collect())
            }
            (true, Some(TrainerMode::Dictation)) => InputView::Text,
            _ => InputView::None,
        };

        TrainerSnapshot {
            phase: self.phase,
            mode: self.mode(),
            index,
            total,
            score,
            clock: self.session.as_ref().map(|_| self.countdown.state()),
            current,
            input,
            last_result: self.last_result.clone(),
            summary: self.summary.clone(),
            can_start: self.can_start(),
        }
    }
}

impl<P: StimulusPlayer> fmt::Debug for Trainer<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trainer")
            .field("pool_len", &self.pool.len())
            .field("phase", &self.phase)
            .field("config", &self.config)
            .field("session", &self.session.as_ref().map(|s| (s.index(), s.len())))
            .field("countdown", &self.countdown)
            .field("armed_advance", &self.armed_advance)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

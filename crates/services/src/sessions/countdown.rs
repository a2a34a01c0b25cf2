use serde::Serialize;
use std::time::Duration;

/// Interval between countdown ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Handle tying a tick to the countdown run that armed it.
///
/// Tokens are minted on `start` and `resume`; any transition invalidates the
/// tokens handed out before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownPhase {
    Idle,
    Running,
    Paused,
    Expired,
    Stopped,
}

/// Observable countdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockState {
    pub remaining: u32,
    pub limit: u32,
    pub running: bool,
    pub paused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale token, or the countdown is not running.
    Ignored,
    Ticked { remaining: u32 },
    /// `remaining` reached zero. Reported once per `start`.
    TimedOut,
}

/// Per-item countdown.
///
/// `Idle -> Running -> {Paused <-> Running} -> Expired | Stopped`. The countdown
/// only moves on explicit ticks, so a pause freezes `remaining` exactly and a
/// resume carries on from the frozen value.
#[derive(Debug, Clone)]
pub struct Countdown {
    phase: CountdownPhase,
    remaining: u32,
    limit: u32,
    generation: u64,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: CountdownPhase::Idle,
            remaining: 0,
            limit: 0,
            generation: 0,
        }
    }

    /// Begin a fresh run, discarding whatever run was live.
    pub fn start(&mut self, limit_secs: u32) -> TickToken {
        self.generation += 1;
        self.limit = limit_secs;
        self.remaining = limit_secs;
        self.phase = CountdownPhase::Running;
        TickToken(self.generation)
    }

    pub fn tick(&mut self, token: TickToken) -> TickOutcome {
        if self.phase != CountdownPhase::Running || token.0 != self.generation {
            return TickOutcome::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.phase = CountdownPhase::Expired;
            self.generation += 1;
            return TickOutcome::TimedOut;
        }
        TickOutcome::Ticked {
            remaining: self.remaining,
        }
    }

    /// Returns false unless the countdown was running.
    pub fn pause(&mut self) -> bool {
        if self.phase != CountdownPhase::Running {
            return false;
        }
        self.phase = CountdownPhase::Paused;
        self.generation += 1;
        true
    }

    /// Returns the token for the resumed run, `None` unless paused.
    pub fn resume(&mut self) -> Option<TickToken> {
        if self.phase != CountdownPhase::Paused {
            return None;
        }
        self.phase = CountdownPhase::Running;
        self.generation += 1;
        Some(TickToken(self.generation))
    }

    /// Cancel any pending ticks. Safe from every state.
    pub fn stop(&mut self) {
        if matches!(
            self.phase,
            CountdownPhase::Running | CountdownPhase::Paused | CountdownPhase::Expired
        ) {
            self.phase = CountdownPhase::Stopped;
            self.generation += 1;
        }
    }

    /// Back to `Idle` with no remaining time. Earlier tokens stay invalid.
    pub fn reset(&mut self) {
        self.phase = CountdownPhase::Idle;
        self.remaining = 0;
        self.limit = 0;
        self.generation += 1;
    }

    /// Token a tick source should use right now, if ticks are wanted at all.
    #[must_use]
    pub fn live_token(&self) -> Option<TickToken> {
        (self.phase == CountdownPhase::Running).then_some(TickToken(self.generation))
    }

    #[must_use]
    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn state(&self) -> ClockState {
        ClockState {
            remaining: self.remaining,
            limit: self.limit,
            running: self.phase == CountdownPhase::Running,
            paused: self.phase == CountdownPhase::Paused,
        }
    }
}

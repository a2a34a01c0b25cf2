use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;

use recall_core::model::TrainerConfig;

use super::evaluator::Answer;
use super::stimulus::StimulusPlayer;
use super::trainer::{PendingTimer, Trainer};
use super::view::TrainerSnapshot;
use crate::error::SessionError;

/// User actions forwarded to a running driver.
#[derive(Debug)]
pub enum TrainerCommand {
    /// Start a session; the outcome of [`Trainer::start`] is sent back on `reply`.
    Start {
        config: TrainerConfig,
        reply: oneshot::Sender<Result<bool, SessionError>>,
    },
    Submit(Answer),
    Next,
    Pause,
    Resume,
    Restart,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("trainer driver has stopped")]
pub struct DriverClosed;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StartError {
    #[error(transparent)]
    Closed(#[from] DriverClosed),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Cloneable front end of a [`TrainerDriver`].
#[derive(Debug, Clone)]
pub struct TrainerHandle {
    commands: mpsc::UnboundedSender<TrainerCommand>,
    snapshots: watch::Receiver<TrainerSnapshot>,
}

impl TrainerHandle {
    /// # Errors
    ///
    /// Returns `DriverClosed` if the driver loop has ended.
    pub fn send(&self, command: TrainerCommand) -> Result<(), DriverClosed> {
        self.commands.send(command).map_err(|_| DriverClosed)
    }

    /// Start a session and wait for the driver to process it.
    ///
    /// Returns `Ok(false)` if a session is already running.
    ///
    /// # Errors
    ///
    /// Returns `StartError::Session` if the trainer refused to start (empty
    /// pool) and `StartError::Closed` if the driver loop has ended.
    pub async fn start(&self, config: TrainerConfig) -> Result<bool, StartError> {
        let (reply, outcome) = oneshot::channel();
        self.send(TrainerCommand::Start { config, reply })?;
        let started = outcome.await.map_err(|_| DriverClosed)??;
        Ok(started)
    }

    /// # Errors
    ///
    /// Returns `DriverClosed` if the driver loop has ended.
    pub fn submit(&self, answer: Answer) -> Result<(), DriverClosed> {
        self.send(TrainerCommand::Submit(answer))
    }

    /// # Errors
    ///
    /// Returns `DriverClosed` if the driver loop has ended.
    pub fn next(&self) -> Result<(), DriverClosed> {
        self.send(TrainerCommand::Next)
    }

    /// # Errors
    ///
    /// Returns `DriverClosed` if the driver loop has ended.
    pub fn pause(&self) -> Result<(), DriverClosed> {
        self.send(TrainerCommand::Pause)
    }

    /// # Errors
    ///
    /// Returns `DriverClosed` if the driver loop has ended.
    pub fn resume(&self) -> Result<(), DriverClosed> {
        self.send(TrainerCommand::Resume)
    }

    /// # Errors
    ///
    /// Returns `DriverClosed` if the driver loop has ended.
    pub fn restart(&self) -> Result<(), DriverClosed> {
        self.send(TrainerCommand::Restart)
    }

    /// Latest published state.
    #[must_use]
    pub fn snapshot(&self) -> TrainerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified after every processed event.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TrainerSnapshot> {
        self.snapshots.clone()
    }
}

/// Runs one trainer on a single task: user commands and timers are handled
/// one at a time, in arrival order.
pub struct TrainerDriver<P: StimulusPlayer> {
    trainer: Trainer<P>,
    commands: mpsc::UnboundedReceiver<TrainerCommand>,
    snapshots: watch::Sender<TrainerSnapshot>,
}

/// A timer armed by the driver and the instant it is due.
#[derive(Debug, Clone, Copy)]
struct Armed {
    timer: PendingTimer,
    due: Instant,
}

impl<P: StimulusPlayer> TrainerDriver<P> {
    #[must_use]
    pub fn new(trainer: Trainer<P>) -> (Self, TrainerHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(trainer.snapshot());
        let driver = Self {
            trainer,
            commands: command_rx,
            snapshots: snapshot_tx,
        };
        let handle = TrainerHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        };
        (driver, handle)
    }

    /// Process events until every handle is dropped, then hand the trainer back.
    pub async fn run(mut self) -> Trainer<P> {
        let mut armed: Option<Armed> = None;
        let mut last_fired: Option<Armed> = None;

        loop {
            let wanted = self.trainer.pending_timer();
            if armed.map(|a| a.timer) != wanted {
                armed = wanted.map(|timer| {
                    // Repeated ticks of one run are paced from the previous due
                    // instant so handling time does not accumulate.
                    let base = match last_fired {
                        Some(fired) if fired.timer == timer => fired.due,
                        _ => Instant::now(),
                    };
                    Armed {
                        timer,
                        due: base + timer.delay(),
                    }
                });
            }

            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        break;
                    };
                    self.apply(command);
                }
                () = wait_until(armed.map(|a| a.due)) => {
                    if let Some(due) = armed.take() {
                        self.trainer.fire(due.timer);
                        last_fired = Some(due);
                    }
                }
            }

            self.snapshots.send_replace(self.trainer.snapshot());
        }

        tracing::debug!("trainer driver stopped");
        self.trainer
    }

    fn apply(&mut self, command: TrainerCommand) {
        match command {
            TrainerCommand::Start { config, reply } => {
                let outcome = self.trainer.start(config);
                if let Err(err) = &outcome {
                    tracing::warn!(%err, "trainer could not start");
                }
                // The caller may have stopped waiting.
                let _ = reply.send(outcome);
            }
            TrainerCommand::Submit(answer) => {
                self.trainer.submit_answer(answer);
            }
            TrainerCommand::Next => {
                self.trainer.next();
            }
            TrainerCommand::Pause => {
                self.trainer.pause();
            }
            TrainerCommand::Resume => {
                self.trainer.resume();
            }
            TrainerCommand::Restart => {
                self.trainer.restart();
            }
        }
    }
}

async fn wait_until(due: Option<Instant>) {
    match due {
        Some(due) => tokio::time::sleep_until(due).await,
        None => std::future::pending().await,
    }
}

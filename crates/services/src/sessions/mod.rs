mod countdown;
mod driver;
mod evaluator;
mod plan;
mod stimulus;
mod trainer;
mod view;

// Public API of the trainer subsystem.
pub use crate::error::SessionError;
pub use countdown::{
    ClockState, Countdown, CountdownPhase, TICK_INTERVAL, TickOutcome, TickToken,
};
pub use driver::{DriverClosed, StartError, TrainerCommand, TrainerDriver, TrainerHandle};
pub use evaluator::{Answer, Evaluator, normalize_text};
pub use plan::{SessionBuilder, build_choices, distractors};
pub use stimulus::{RecordingPlayer, SilentPlayer, StimulusEvent, StimulusPlayer};
pub use trainer::{AdvanceToken, PendingTimer, Resumable, Trainer, TrainerPhase};
pub use view::{ChoiceView, FeedbackView, InputView, PromptView, TrainerSnapshot};

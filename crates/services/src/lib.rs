#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use recall_core::Clock;
pub use sessions as session;

pub use error::SessionError;

pub use sessions::{
    Answer, PendingTimer, StartError, StimulusPlayer, Trainer, TrainerCommand, TrainerDriver,
    TrainerHandle, TrainerPhase, TrainerSnapshot,
};

mod config;
mod ids;
mod item;
mod pool;
mod session;

pub use ids::ItemId;

pub use config::{
    AdvancePolicy, AdvancePolicyKind, ConfigError, DEFAULT_OPTIONS_PER_QUESTION,
    DEFAULT_SESSION_SIZE, DICTATION_DEFAULT_LIMIT_SECS, QUIZ_DEFAULT_ADVANCE_DELAY_MS,
    QUIZ_DEFAULT_LIMIT_SECS, SessionConfig, TrainerConfig, TrainerConfigDraft, TrainerMode,
};
pub use item::{Item, ItemError};
pub use pool::{LessonManifest, LessonWordRef, ManifestFiles, ManifestWord, Pool, PoolError};
pub use session::{ItemOutcome, Session, SessionSummary, SessionSummaryError};

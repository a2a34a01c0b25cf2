use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Questions per session when the caller does not choose.
pub const DEFAULT_SESSION_SIZE: u32 = 10;
/// Options offered per quiz question, correct answer included.
pub const DEFAULT_OPTIONS_PER_QUESTION: usize = 4;
/// Seconds allowed per quiz question.
pub const QUIZ_DEFAULT_LIMIT_SECS: u32 = 8;
/// Delay before a quiz moves on after feedback.
pub const QUIZ_DEFAULT_ADVANCE_DELAY_MS: u64 = 900;
/// Seconds allowed per dictation item; typing takes longer than clicking.
pub const DICTATION_DEFAULT_LIMIT_SECS: u32 = 12;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("session size must be > 0")]
    InvalidSize,

    #[error("options per question must be >= 2, got {0}")]
    InvalidOptionsPerQuestion(usize),

    #[error("per-item time limit must be > 0 seconds")]
    InvalidPerItemLimit,

    #[error("invalid trainer config JSON: {0}")]
    Json(String),
}

//
// ─── MODE & POLICY ─────────────────────────────────────────────────────────────
//

/// Which recall exercise the trainer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainerMode {
    /// Multiple choice: pick the heard word among distractors.
    #[default]
    Quiz,
    /// Free text: type exactly what was heard.
    Dictation,
}

impl TrainerMode {
    #[must_use]
    pub fn default_limit_secs(self) -> u32 {
        match self {
            TrainerMode::Quiz => QUIZ_DEFAULT_LIMIT_SECS,
            TrainerMode::Dictation => DICTATION_DEFAULT_LIMIT_SECS,
        }
    }

    #[must_use]
    pub fn default_advance_policy(self) -> AdvancePolicy {
        match self {
            TrainerMode::Quiz => {
                AdvancePolicy::Auto(Duration::from_millis(QUIZ_DEFAULT_ADVANCE_DELAY_MS))
            }
            TrainerMode::Dictation => AdvancePolicy::Manual,
        }
    }
}

/// How the trainer leaves the feedback phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvancePolicy {
    /// Move on by itself once the delay has elapsed.
    Auto(Duration),
    /// Wait for an explicit "next" from the learner.
    Manual,
}

/// Wire name of an advance policy in the configuration surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvancePolicyKind {
    Auto,
    Manual,
}

//
// ─── SESSION CONFIG ────────────────────────────────────────────────────────────
//

/// Sampling parameters for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    size: u32,
    mode: TrainerMode,
    options_per_question: usize,
}

impl SessionConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSize` for a zero size and
    /// `ConfigError::InvalidOptionsPerQuestion` for fewer than two options.
    pub fn new(
        size: u32,
        mode: TrainerMode,
        options_per_question: usize,
    ) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::InvalidSize);
        }
        if options_per_question < 2 {
            return Err(ConfigError::InvalidOptionsPerQuestion(options_per_question));
        }
        Ok(Self {
            size,
            mode,
            options_per_question,
        })
    }

    /// Quiz session of `size` questions with the default option count.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSize` for a zero size.
    pub fn quiz(size: u32) -> Result<Self, ConfigError> {
        Self::new(size, TrainerMode::Quiz, DEFAULT_OPTIONS_PER_QUESTION)
    }

    /// Dictation session of `size` items.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSize` for a zero size.
    pub fn dictation(size: u32) -> Result<Self, ConfigError> {
        Self::new(size, TrainerMode::Dictation, DEFAULT_OPTIONS_PER_QUESTION)
    }

    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[must_use]
    pub fn mode(&self) -> TrainerMode {
        self.mode
    }

    #[must_use]
    pub fn options_per_question(&self) -> usize {
        self.options_per_question
    }
}

//
// ─── TRAINER CONFIG ────────────────────────────────────────────────────────────
//

/// Full, validated configuration for a trainer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainerConfig {
    session: SessionConfig,
    per_item_limit_secs: u32,
    advance_policy: AdvancePolicy,
}

impl TrainerConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPerItemLimit` for a zero time limit.
    pub fn new(
        session: SessionConfig,
        per_item_limit_secs: u32,
        advance_policy: AdvancePolicy,
    ) -> Result<Self, ConfigError> {
        if per_item_limit_secs == 0 {
            return Err(ConfigError::InvalidPerItemLimit);
        }
        Ok(Self {
            session,
            per_item_limit_secs,
            advance_policy,
        })
    }

    /// Product defaults for the given mode and session size.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSize` for a zero size.
    pub fn defaults_for(mode: TrainerMode, size: u32) -> Result<Self, ConfigError> {
        let session = SessionConfig::new(size, mode, DEFAULT_OPTIONS_PER_QUESTION)?;
        Self::new(
            session,
            mode.default_limit_secs(),
            mode.default_advance_policy(),
        )
    }

    /// Override the advance policy.
    #[must_use]
    pub fn with_advance_policy(mut self, policy: AdvancePolicy) -> Self {
        self.advance_policy = policy;
        self
    }

    #[must_use]
    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    #[must_use]
    pub fn mode(&self) -> TrainerMode {
        self.session.mode()
    }

    #[must_use]
    pub fn per_item_limit_secs(&self) -> u32 {
        self.per_item_limit_secs
    }

    #[must_use]
    pub fn advance_policy(&self) -> AdvancePolicy {
        self.advance_policy
    }
}

/// Unvalidated configuration as it arrives from the page layer.
///
/// Every field is optional; missing values fall back to the defaults of the
/// selected mode during [`TrainerConfigDraft::validate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainerConfigDraft {
    pub size: Option<u32>,
    pub mode: Option<TrainerMode>,
    pub options_per_question: Option<usize>,
    pub per_item_limit_seconds: Option<u32>,
    pub advance_policy: Option<AdvancePolicyKind>,
    pub auto_advance_delay_ms: Option<u64>,
}

impl TrainerConfigDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a draft from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` if the text is not a valid config object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|err| ConfigError::Json(err.to_string()))
    }

    /// Validate and fill defaults.
    ///
    /// `autoAdvanceDelayMs` is only consulted when the resolved policy is auto.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a provided value is out of range.
    pub fn validate(self) -> Result<TrainerConfig, ConfigError> {
        let mode = self.mode.unwrap_or_default();
        let session = SessionConfig::new(
            self.size.unwrap_or(DEFAULT_SESSION_SIZE),
            mode,
            self.options_per_question.unwrap_or(DEFAULT_OPTIONS_PER_QUESTION),
        )?;

        let advance_policy = match self.advance_policy {
            None => match (mode.default_advance_policy(), self.auto_advance_delay_ms) {
                (AdvancePolicy::Auto(_), Some(ms)) => {
                    AdvancePolicy::Auto(Duration::from_millis(ms))
                }
                (policy, _) => policy,
            },
            Some(AdvancePolicyKind::Manual) => AdvancePolicy::Manual,
            Some(AdvancePolicyKind::Auto) => AdvancePolicy::Auto(Duration::from_millis(
                self.auto_advance_delay_ms.unwrap_or(QUIZ_DEFAULT_ADVANCE_DELAY_MS),
            )),
        };

        TrainerConfig::new(
            session,
            self.per_item_limit_seconds.unwrap_or_else(|| mode.default_limit_secs()),
            advance_policy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_draft_yields_quiz_defaults() {
        let config = TrainerConfigDraft::new().validate().unwrap();

        assert_eq!(config.mode(), TrainerMode::Quiz);
        assert_eq!(config.session().size(), DEFAULT_SESSION_SIZE);
        assert_eq!(config.session().options_per_question(), 4);
        assert_eq!(config.per_item_limit_secs(), QUIZ_DEFAULT_LIMIT_SECS);
        assert_eq!(
            config.advance_policy(),
            AdvancePolicy::Auto(Duration::from_millis(900))
        );
    }

    #[test]
    fn dictation_defaults_to_manual_advance() {
        let config = TrainerConfigDraft::from_json(r#"{"mode": "dictation", "size": 5}"#)
            .unwrap()
            .validate()
            .unwrap();

        assert_eq!(config.mode(), TrainerMode::Dictation);
        assert_eq!(config.session().size(), 5);
        assert_eq!(config.per_item_limit_secs(), DICTATION_DEFAULT_LIMIT_SECS);
        assert_eq!(config.advance_policy(), AdvancePolicy::Manual);
    }

    #[test]
    fn camel_case_surface_is_honored() {
        let json = r#"{
            "size": 3,
            "mode": "quiz",
            "optionsPerQuestion": 3,
            "perItemLimitSeconds": 2,
            "advancePolicy": "auto",
            "autoAdvanceDelayMs": 250
        }"#;
        let config = TrainerConfigDraft::from_json(json)
            .unwrap()
            .validate()
            .unwrap();

        assert_eq!(config.session().options_per_question(), 3);
        assert_eq!(config.per_item_limit_secs(), 2);
        assert_eq!(
            config.advance_policy(),
            AdvancePolicy::Auto(Duration::from_millis(250))
        );
    }

    #[test]
    fn manual_policy_ignores_delay() {
        let draft = TrainerConfigDraft {
            advance_policy: Some(AdvancePolicyKind::Manual),
            auto_advance_delay_ms: Some(10),
            ..TrainerConfigDraft::default()
        };
        assert_eq!(draft.validate().unwrap().advance_policy(), AdvancePolicy::Manual);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let zero_size = TrainerConfigDraft {
            size: Some(0),
            ..TrainerConfigDraft::default()
        };
        assert_eq!(zero_size.validate().unwrap_err(), ConfigError::InvalidSize);

        let one_option = TrainerConfigDraft {
            options_per_question: Some(1),
            ..TrainerConfigDraft::default()
        };
        assert_eq!(
            one_option.validate().unwrap_err(),
            ConfigError::InvalidOptionsPerQuestion(1)
        );

        let no_time = TrainerConfigDraft {
            per_item_limit_seconds: Some(0),
            ..TrainerConfigDraft::default()
        };
        assert_eq!(no_time.validate().unwrap_err(), ConfigError::InvalidPerItemLimit);

        assert!(matches!(
            TrainerConfigDraft::from_json(r#"{"mode": "flashcards"}"#),
            Err(ConfigError::Json(_))
        ));
    }
}

use serde::Serialize;

use recall_core::model::{Item, ItemId, ItemOutcome, SessionSummary, TrainerMode};

use super::countdown::ClockState;
use super::evaluator::Answer;
use super::trainer::TrainerPhase;

/// One quiz option as the page renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    pub id: ItemId,
    pub label: String,
}

impl From<&Item> for ChoiceView {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id().clone(),
            label: item.answer().to_string(),
        }
    }
}

/// The item on screen, without its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptView {
    pub id: ItemId,
    pub prompt: String,
    pub phonetic: Option<String>,
}

impl From<&Item> for PromptView {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id().clone(),
            prompt: item.prompt().to_string(),
            phonetic: item.phonetic().map(str::to_string),
        }
    }
}

/// What the learner is expected to provide right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "choices")]
pub enum InputView {
    None,
    Choices(Vec<ChoiceView>),
    Text,
}

/// Outcome of the item just finished, with the correct item revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackView {
    pub outcome: ItemOutcome,
    pub submitted: Option<Answer>,
    pub expected: Item,
}

/// Read-only state published after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerSnapshot {
    pub phase: TrainerPhase,
    pub mode: Option<TrainerMode>,
    /// Zero-based index of the current item; equals `total` once completed.
    pub index: usize,
    pub total: usize,
    pub score: u32,
    pub clock: Option<ClockState>,
    /// Item being presented; `None` in `Configuring` and `Completed`.
    pub current: Option<PromptView>,
    pub input: InputView,
    pub last_result: Option<FeedbackView>,
    pub summary: Option<SessionSummary>,
    /// False when the pool is empty: the start affordance should not be offered.
    pub can_start: bool,
}

impl TrainerSnapshot {
    #[must_use]
    pub fn clock_remaining(&self) -> Option<u32> {
        self.clock.map(|clock| clock.remaining)
    }

    /// True while the page should show a free-text field.
    #[must_use]
    pub fn awaiting_text(&self) -> bool {
        matches!(self.input, InputView::Text)
    }

    #[must_use]
    pub fn choices(&self) -> &[ChoiceView] {
        match &self.input {
            InputView::Choices(choices) => choices,
            _ => &[],
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == TrainerPhase::Completed
    }
}

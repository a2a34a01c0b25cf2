use serde::{Deserialize, Serialize};

use recall_core::model::{Item, ItemId, TrainerMode};

/// Learner input for the current item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Answer {
    /// A quiz option, identified by item id.
    Choice(ItemId),
    /// Raw dictation text.
    Text(String),
}

/// Correctness strategy, one per trainer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluator {
    /// Quiz: the selected option must be the current item itself.
    SelectionMatch,
    /// Dictation: text equal after [`normalize_text`].
    NormalizedText,
}

impl Evaluator {
    #[must_use]
    pub fn for_mode(mode: TrainerMode) -> Self {
        match mode {
            TrainerMode::Quiz => Evaluator::SelectionMatch,
            TrainerMode::Dictation => Evaluator::NormalizedText,
        }
    }

    /// Returns `None` when the answer kind does not fit this evaluator.
    ///
    /// Quiz answers compare ids, not text, so two items sharing a spelling are
    /// still told apart.
    #[must_use]
    pub fn evaluate(self, answer: &Answer, current: &Item) -> Option<bool> {
        match (self, answer) {
            (Evaluator::SelectionMatch, Answer::Choice(id)) => Some(id == current.id()),
            (Evaluator::NormalizedText, Answer::Text(raw)) => {
                Some(normalize_text(raw) == normalize_text(current.answer()))
            }
            _ => None,
        }
    }
}

/// Trim surrounding whitespace and fold case.
///
/// Accents and inner punctuation are kept: "avó" and "avo" are different answers.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, answer: &str) -> Item {
        Item::new(id, "prompt", answer, None, "cue.mp3").unwrap()
    }

    #[test]
    fn selection_matches_by_identity() {
        let current = item("w1", "casa");
        let twin = item("w2", "casa");

        let eval = Evaluator::for_mode(TrainerMode::Quiz);
        assert_eq!(eval.evaluate(&Answer::Choice(ItemId::new("w1")), &current), Some(true));
        assert_eq!(eval.evaluate(&Answer::Choice(twin.id().clone()), &current), Some(false));
    }

    #[test]
    fn text_match_trims_and_folds_case() {
        let current = item("w1", "Bom dia");
        let eval = Evaluator::for_mode(TrainerMode::Dictation);

        assert_eq!(eval.evaluate(&Answer::Text("  bom DIA \n".into()), &current), Some(true));
        assert_eq!(eval.evaluate(&Answer::Text("bom  dia".into()), &current), Some(false));
        assert_eq!(eval.evaluate(&Answer::Text("bom dia!".into()), &current), Some(false));
    }

    #[test]
    fn diacritics_are_significant() {
        let current = item("w1", "avó");
        let eval = Evaluator::NormalizedText;

        assert_eq!(eval.evaluate(&Answer::Text("AVÓ".into()), &current), Some(true));
        assert_eq!(eval.evaluate(&Answer::Text("avo".into()), &current), Some(false));
    }

    #[test]
    fn mismatched_answer_kind_is_rejected() {
        let current = item("w1", "casa");
        assert_eq!(
            Evaluator::SelectionMatch.evaluate(&Answer::Text("casa".into()), &current),
            None
        );
        assert_eq!(
            Evaluator::NormalizedText.evaluate(&Answer::Choice(ItemId::new("w1")), &current),
            None
        );
    }
}

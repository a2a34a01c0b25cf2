use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ItemId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ItemError {
    #[error("item id cannot be empty")]
    EmptyId,

    #[error("item {id} has an empty answer")]
    EmptyAnswer { id: ItemId },

    #[error("item {id} has no stimulus reference")]
    EmptyStimulus { id: ItemId },
}

//
// ─── ITEM ──────────────────────────────────────────────────────────────────────
//

/// A single trainable vocabulary entry.
///
/// `prompt` is what the learner is shown (usually the translation), `answer` is
/// what they must recall, and `stimulus_ref` points at the audio cue for the item.
/// Items are immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    id: ItemId,
    prompt: String,
    answer: String,
    phonetic: Option<String>,
    stimulus_ref: String,
}

impl Item {
    /// Creates a validated item.
    ///
    /// A blank `phonetic` is stored as `None`.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::EmptyId` if the id is blank.
    /// Returns `ItemError::EmptyAnswer` if the answer is blank.
    /// Returns `ItemError::EmptyStimulus` if the stimulus reference is blank.
    pub fn new(
        id: impl Into<ItemId>,
        prompt: impl Into<String>,
        answer: impl Into<String>,
        phonetic: Option<String>,
        stimulus_ref: impl Into<String>,
    ) -> Result<Self, ItemError> {
        let id = id.into();
        if id.is_blank() {
            return Err(ItemError::EmptyId);
        }
        let answer = answer.into();
        if answer.trim().is_empty() {
            return Err(ItemError::EmptyAnswer { id });
        }
        let stimulus_ref = stimulus_ref.into();
        if stimulus_ref.trim().is_empty() {
            return Err(ItemError::EmptyStimulus { id });
        }

        Ok(Self {
            id,
            prompt: prompt.into(),
            answer,
            phonetic: phonetic
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            stimulus_ref,
        })
    }

    #[must_use]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn phonetic(&self) -> Option<&str> {
        self.phonetic.as_deref()
    }

    #[must_use]
    pub fn stimulus_ref(&self) -> &str {
        &self.stimulus_ref
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_serializes_camel_case() {
        let item = Item::new("w1", "merci", "obrigado", None, "audio/w1.mp3").unwrap();
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["stimulusRef"], "audio/w1.mp3");
        assert!(json.get("stimulus_ref").is_none());
        assert_eq!(serde_json::from_value::<Item>(json).unwrap(), item);
    }

    #[test]
    fn item_rejects_blank_fields() {
        assert_eq!(
            Item::new(" ", "p", "a", None, "a.mp3").unwrap_err(),
            ItemError::EmptyId
        );
        assert!(matches!(
            Item::new("w1", "p", "  ", None, "a.mp3").unwrap_err(),
            ItemError::EmptyAnswer { .. }
        ));
        assert!(matches!(
            Item::new("w1", "p", "a", None, "").unwrap_err(),
            ItemError::EmptyStimulus { .. }
        ));
    }

    #[test]
    fn blank_phonetic_is_dropped() {
        let item = Item::new("w1", "merci", "obrigado", Some("  ".into()), "a.mp3").unwrap();
        assert_eq!(item.phonetic(), None);

        let item = Item::new("w1", "merci", "obrigado", Some(" o-bri-GA-du ".into()), "a.mp3")
            .unwrap();
        assert_eq!(item.phonetic(), Some("o-bri-GA-du"));
    }
}

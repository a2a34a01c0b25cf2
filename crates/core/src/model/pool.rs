use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::model::ids::ItemId;
use crate::model::item::Item;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PoolError {
    #[error("manifest is not valid JSON: {0}")]
    Manifest(#[from] serde_json::Error),
}

//
// ─── MANIFEST SHAPE ────────────────────────────────────────────────────────────
//

/// Audio files recorded for a manifest word.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestFiles {
    #[serde(default)]
    pub normal: Option<String>,
    #[serde(default)]
    pub slow: Option<String>,
}

/// One entry of the vocabulary manifest produced by the page generator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestWord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub pt: String,
    #[serde(default)]
    pub fr: String,
    #[serde(default)]
    pub phon: Option<String>,
    #[serde(default)]
    pub files: ManifestFiles,
}

impl ManifestWord {
    /// Converts the entry into an item, or `None` when it cannot be trained.
    ///
    /// Entries without a "normal" audio file are not trainable since every
    /// presentation starts by playing the cue.
    fn into_item(self) -> Option<Item> {
        let stimulus = self.files.normal.filter(|f| !f.trim().is_empty())?;
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| self.pt.clone());
        Item::new(id, self.fr, self.pt, self.phon, stimulus).ok()
    }
}

/// A word reference inside a lesson file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LessonWordRef {
    #[serde(default)]
    pub id: Option<String>,
}

/// A lesson file: a title and the manifest words it covers, in lesson order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LessonManifest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub words: Vec<LessonWordRef>,
}

impl LessonManifest {
    /// Parse a lesson file.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Manifest` if the input is not a lesson object.
    pub fn from_json(json: &str) -> Result<Self, PoolError> {
        Ok(serde_json::from_str(json)?)
    }
}

//
// ─── POOL ──────────────────────────────────────────────────────────────────────
//

/// The immutable set of items a session may sample from.
///
/// Items are deduplicated by id on construction (first occurrence wins) and keep
/// their insertion order, so seeded sampling is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pool {
    items: Vec<Item>,
}

impl Pool {
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        let mut seen: HashSet<ItemId> = HashSet::new();
        let items = items
            .into_iter()
            .filter(|item| seen.insert(item.id().clone()))
            .collect();
        Self { items }
    }

    /// Build a pool from manifest words, skipping entries that have no audio
    /// cue or that fail item validation.
    #[must_use]
    pub fn from_manifest_words(words: impl IntoIterator<Item = ManifestWord>) -> Self {
        Self::new(words.into_iter().filter_map(ManifestWord::into_item))
    }

    /// Parse a JSON array of manifest words into a pool.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Manifest` if the input is not a JSON array of words.
    pub fn from_manifest_json(json: &str) -> Result<Self, PoolError> {
        let words: Vec<ManifestWord> = serde_json::from_str(json)?;
        Ok(Self::from_manifest_words(words))
    }

    /// Build the pool of one lesson by resolving its word ids against the
    /// global manifest.
    ///
    /// Lesson order is kept. Ids missing from the manifest are skipped, as are
    /// words without an audio cue. When the manifest repeats an id, the first
    /// entry is used.
    #[must_use]
    pub fn for_lesson(global: &[ManifestWord], lesson: &LessonManifest) -> Self {
        let mut by_id: HashMap<&str, &ManifestWord> = HashMap::new();
        for word in global {
            if let Some(id) = word.id.as_deref().filter(|id| !id.trim().is_empty()) {
                by_id.entry(id).or_insert(word);
            }
        }

        let words = lesson
            .words
            .iter()
            .filter_map(|word| word.id.as_deref())
            .filter_map(|id| by_id.get(id).map(|word| (*word).clone()));
        Self::from_manifest_words(words)
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Pool {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Item> for Pool {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> Item {
        Item::new(id, format!("fr-{id}"), format!("pt-{id}"), None, format!("{id}.mp3")).unwrap()
    }

    #[test]
    fn pool_deduplicates_by_id_keeping_first() {
        let dup = Item::new("w1", "other", "other", None, "x.mp3").unwrap();
        let pool = Pool::new(vec![item("w1"), item("w2"), dup]);

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(&ItemId::new("w1")).unwrap().prompt(), "fr-w1");
    }

    #[test]
    fn manifest_skips_words_without_audio() {
        let json = r#"[
            {
                "pt": "obrigado", "fr": "merci", "phon": "o-bri-GA-du",
                "files": {"normal": "a/obrigado.mp3"}
            },
            {"pt": "tchau", "fr": "salut", "files": {}},
            {
                "id": "w3", "pt": "sim", "fr": "oui",
                "files": {"normal": "a/sim.mp3", "slow": "a/sim-slow.mp3"}
            }
        ]"#;

        let pool = Pool::from_manifest_json(json).unwrap();
        assert_eq!(pool.len(), 2);

        let first = &pool.items()[0];
        assert_eq!(first.id().as_str(), "obrigado");
        assert_eq!(first.prompt(), "merci");
        assert_eq!(first.answer(), "obrigado");
        assert_eq!(first.phonetic(), Some("o-bri-GA-du"));
        assert_eq!(first.stimulus_ref(), "a/obrigado.mp3");

        assert_eq!(pool.items()[1].id().as_str(), "w3");
    }

    #[test]
    fn lesson_pool_follows_lesson_order_and_skips_unknown_ids() {
        let global: Vec<ManifestWord> = serde_json::from_str(
            r#"[
                {"id": "w1", "pt": "obrigado", "fr": "merci", "files": {"normal": "w1.mp3"}},
                {"id": "w2", "pt": "bom dia", "fr": "bonjour", "files": {"normal": "w2.mp3"}},
                {"id": "w3", "pt": "tchau", "fr": "salut", "files": {}},
                {"id": "w4", "pt": "casa", "fr": "maison", "files": {"normal": "w4.mp3"}},
                {"id": "w1", "pt": "outro", "fr": "autre", "files": {"normal": "x.mp3"}}
            ]"#,
        )
        .unwrap();
        let lesson = LessonManifest::from_json(
            r#"{
                "title": "Lição 1",
                "words": [{"id": "w4"}, {"id": "missing"}, {"id": "w3"}, {}, {"id": "w1"}]
            }"#,
        )
        .unwrap();

        let pool = Pool::for_lesson(&global, &lesson);
        let ids: Vec<&str> = pool.iter().map(|item| item.id().as_str()).collect();
        assert_eq!(ids, ["w4", "w1"]);
        assert_eq!(pool.get(&ItemId::new("w1")).unwrap().answer(), "obrigado");
        assert_eq!(lesson.title, "Lição 1");
    }

    #[test]
    fn lesson_without_words_gives_empty_pool() {
        let lesson = LessonManifest::from_json(r#"{"title": "vide"}"#).unwrap();
        assert!(Pool::for_lesson(&[], &lesson).is_empty());
        assert!(matches!(
            LessonManifest::from_json("[]"),
            Err(PoolError::Manifest(_))
        ));
    }

    #[test]
    fn manifest_rejects_non_array() {
        assert!(matches!(
            Pool::from_manifest_json("{\"pt\": 1}"),
            Err(PoolError::Manifest(_))
        ));
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for an Item within a pool.
///
/// Manifest ids are free-form strings (slugs, hashes or the word itself), so the
/// identifier wraps an owned `String` rather than a numeric key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates a new `ItemId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identifier is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({:?})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Conversions ───────────────────────────────────────────────────────────────

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ItemId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_display_and_debug() {
        let id = ItemId::new("obrigado");
        assert_eq!(id.to_string(), "obrigado");
        assert_eq!(format!("{id:?}"), "ItemId(\"obrigado\")");
    }

    #[test]
    fn blank_ids_are_detected() {
        assert!(ItemId::new("   ").is_blank());
        assert!(!ItemId::from("w1").is_blank());
    }

    #[test]
    fn serde_is_transparent() {
        let id: ItemId = serde_json::from_str("\"w7\"").unwrap();
        assert_eq!(id, ItemId::new("w7"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"w7\"");
    }
}

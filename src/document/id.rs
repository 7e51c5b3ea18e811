use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Opaque document identifier.
///
/// The nil value marks a document that has never been persisted. Serialized as
/// a hyphenated string in every encoding so JSON and bitcode snapshots agree.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh, non-nil identifier.
    pub fn new() -> Self {
        DocumentId(Uuid::new_v4())
    }

    /// The zero identifier carried by unsaved documents.
    pub const fn nil() -> Self {
        DocumentId(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// A persisted identifier is any non-nil value.
    pub fn is_valid(&self) -> bool {
        !self.is_nil()
    }

    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        Uuid::parse_str(s).map(DocumentId).map_err(|e| InvalidId {
            input: s.to_string(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self.0.hyphenated())
    }
}

impl FromStr for DocumentId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentId::parse(s)
    }
}

impl From<DocumentId> for serde_json::Value {
    fn from(id: DocumentId) -> Self {
        serde_json::Value::String(id.to_string())
    }
}

impl Serialize for DocumentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(DocumentId::nil());
        }
        DocumentId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Error for strings that are not document identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid document id {input:?}: {reason}")]
pub struct InvalidId {
    pub input: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_nil() {
        let id = DocumentId::default();
        assert!(id.is_nil());
        assert!(!id.is_valid());
        assert_eq!(id, DocumentId::nil());
    }

    #[test]
    fn new_ids_are_distinct_and_valid() {
        let a = DocumentId::new();
        let b = DocumentId::new();
        assert!(a.is_valid());
        assert_ne!(a, b);
    }

    #[test]
    fn parse_display_agree() {
        let id = DocumentId::new();
        let parsed: DocumentId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = DocumentId::parse("not-an-id").unwrap_err();
        assert_eq!(err.input, "not-an-id");
    }

    #[test]
    fn serializes_as_string() {
        let id = DocumentId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: DocumentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn empty_string_deserializes_to_nil() {
        let id: DocumentId = serde_json::from_str("\"\"").unwrap();
        assert!(id.is_nil());
    }
}

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::index::IndexError;

/// A scalar metadata value attached to an indexed item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

/// Item metadata. Ordered so persisted corpora diff cleanly.
pub type Metadata = BTreeMap<String, Scalar>;

/// Returns the metadata value for `key` rendered as text, or `""` if absent.
pub fn meta_text<'a>(metadata: &'a Metadata, key: &str) -> Cow<'a, str> {
    match metadata.get(key) {
        Some(Scalar::Text(s)) => Cow::Borrowed(s.as_str()),
        Some(other) => Cow::Owned(other.to_string()),
        None => Cow::Borrowed(""),
    }
}

/// Namespace partitioning the vector index. Each content type owns its own
/// index and corpus on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentType {
    Resume,
    Course,
    Other(String),
}

impl ContentType {
    pub fn as_str(&self) -> &str {
        match self {
            ContentType::Resume => "resume",
            ContentType::Course => "course",
            ContentType::Other(name) => name,
        }
    }

    /// Title-cased label used in rendered output ("Resume", "Course").
    pub fn title(&self) -> String {
        let mut chars = self.as_str().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = IndexError;

    /// Content type names end up in file names, so only `[a-z0-9_-]` is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        let valid = !name.is_empty()
            && name.len() <= 64
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return Err(IndexError::InvalidContentType(s.to_string()));
        }
        Ok(match name.as_str() {
            "resume" => ContentType::Resume,
            "course" => ContentType::Course,
            _ => ContentType::Other(name),
        })
    }
}

impl Serialize for ContentType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One entry of a content type's corpus, positionally aligned with the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

/// An item as stored in (or retrieved from) the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedItem {
    pub text: String,
    pub metadata: Metadata,
    pub content_type: ContentType,
}

/// A single nearest-neighbour hit. `similarity` is `1 - distance` and is not clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub text: String,
    pub metadata: Metadata,
    pub similarity: f32,
}

impl SearchResult {
    pub fn into_item(self, content_type: ContentType) -> IndexedItem {
        IndexedItem {
            text: self.text,
            metadata: self.metadata,
            content_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_parses_known_names() {
        assert_eq!("resume".parse::<ContentType>().unwrap(), ContentType::Resume);
        assert_eq!("Course".parse::<ContentType>().unwrap(), ContentType::Course);
        assert_eq!(
            "coursera".parse::<ContentType>().unwrap(),
            ContentType::Other("coursera".to_string())
        );
    }

    #[test]
    fn test_content_type_rejects_path_characters() {
        assert!("../etc".parse::<ContentType>().is_err());
        assert!("".parse::<ContentType>().is_err());
        assert!("a b".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_content_type_title() {
        assert_eq!(ContentType::Resume.title(), "Resume");
        assert_eq!(ContentType::Other("coursera".into()).title(), "Coursera");
    }

    #[test]
    fn test_content_type_serde_uses_plain_name() {
        let json = serde_json::to_string(&ContentType::Course).unwrap();
        assert_eq!(json, r#""course""#);
        let parsed: ContentType = serde_json::from_str(r#""resume""#).unwrap();
        assert_eq!(parsed, ContentType::Resume);
    }

    #[test]
    fn test_scalar_metadata_deserializes_untagged() {
        let meta: Metadata =
            serde_json::from_str(r#"{"filename":"a.pdf","rating":4.5,"pages":2,"free":true}"#)
                .unwrap();
        assert_eq!(meta["filename"], Scalar::Text("a.pdf".into()));
        assert_eq!(meta["rating"], Scalar::Float(4.5));
        assert_eq!(meta["pages"], Scalar::Int(2));
        assert_eq!(meta["free"], Scalar::Bool(true));
    }

    #[test]
    fn test_meta_text_renders_non_text_scalars() {
        let mut meta = Metadata::new();
        meta.insert("rating".into(), Scalar::Float(4.5));
        assert_eq!(meta_text(&meta, "rating"), "4.5");
        assert_eq!(meta_text(&meta, "missing"), "");
    }
}

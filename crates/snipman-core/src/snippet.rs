use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Opaque identifier of a snippet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetId(String);

impl SnippetId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for SnippetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SnippetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SnippetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A named code unit.
///
/// Only `id` and `name` are interpreted here. Every other field (script,
/// template, style, libraries, ...) lives in `content` and is carried through
/// storage and execution untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    #[serde(default)]
    pub id: SnippetId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub content: Map<String, Value>,
}

impl Snippet {
    /// Create a snippet with a fresh id and no content.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SnippetId::generate(),
            name: name.into(),
            content: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<SnippetId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.content.insert(key.into(), value.into());
        self
    }

    /// True when the snippet carries nothing at all.
    pub fn is_empty(&self) -> bool {
        self.id.as_str().is_empty() && self.name.is_empty() && self.content.is_empty()
    }

    /// Name with surrounding whitespace removed, as used for comparisons.
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = SnippetId::generate();
        let b = SnippetId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_content_is_flattened() {
        let snippet = Snippet::new("Hello")
            .with_id("abc")
            .with_field("script", "console.log(1);")
            .with_field("libraries", vec!["jquery"]);

        let json = serde_json::to_value(&snippet).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["name"], "Hello");
        assert_eq!(json["script"], "console.log(1);");
        assert_eq!(json["libraries"][0], "jquery");

        let back: Snippet = serde_json::from_value(json).unwrap();
        assert_eq!(back, snippet);
    }

    #[test]
    fn test_empty_snippet() {
        let snippet: Snippet = serde_json::from_str("{}").unwrap();
        assert!(snippet.is_empty());

        let named: Snippet = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        assert!(!named.is_empty());
        assert!(named.id.is_blank());
    }

    #[test]
    fn test_trimmed_name() {
        let snippet = Snippet::new("  Padded  ");
        assert_eq!(snippet.trimmed_name(), "Padded");
    }
}

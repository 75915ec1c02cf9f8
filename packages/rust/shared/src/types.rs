//! Core domain types shared across pagemill crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PagemillError, Result};

// ---------------------------------------------------------------------------
// PageId
// ---------------------------------------------------------------------------

/// A UUID wrapper for page and block identifiers.
///
/// The block store hands out UUIDs both hyphenated and compact; parsing
/// accepts either form, display is always hyphenated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub Uuid);

impl PageId {
    /// Parse an identifier, accepting hyphenated or compact UUID forms.
    pub fn parse(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| PagemillError::validation(format!("invalid page id '{s}': {e}")))
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl std::str::FromStr for PageId {
    type Err = PagemillError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Rich text
// ---------------------------------------------------------------------------

/// Style flags attached to one rich text span.
///
/// The annotation model itself is opaque to pagemill; flags pass through
/// unchanged. `language` is only populated on spans inside code blocks so
/// renderers can syntax-highlight per span.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: String,
    /// Language tag for code-block spans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// One styled run of text. Immutable once constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextSpan {
    pub plain_text: String,
    pub annotations: Annotations,
    /// Link target, if the run is a link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// True when the run is an inline equation rather than plain text.
    pub is_inline_formula: bool,
}

// ---------------------------------------------------------------------------
// PostMeta
// ---------------------------------------------------------------------------

/// Metadata for one published post, assembled from a catalog database entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMeta {
    /// Page identifier in the block store.
    pub id: PageId,
    /// Post title.
    pub name: String,
    /// Category tags.
    pub categories: Vec<String>,
    /// Publication date (defaults to assembly time when the entry has none).
    pub publish_date: DateTime<Utc>,
    /// Whether the post is marked published.
    pub publish: bool,
    /// Author display names.
    pub authors: Vec<String>,
    /// URL slug (derived from the name when the entry's slug is empty).
    pub slug: String,
    /// Short description as rich text.
    pub description: Vec<RichTextSpan>,
    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Whether the post is featured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_id_accepts_both_uuid_forms() {
        let hyphenated: PageId = "67c3fa0e-5fc2-4e29-8350-cbd0b5fd9f3f".parse().expect("hyphenated");
        let compact: PageId = "67c3fa0e5fc24e298350cbd0b5fd9f3f".parse().expect("compact");
        assert_eq!(hyphenated, compact);
        assert_eq!(
            hyphenated.to_string(),
            "67c3fa0e-5fc2-4e29-8350-cbd0b5fd9f3f"
        );
    }

    #[test]
    fn page_id_rejects_garbage() {
        let result = PageId::parse("not-a-uuid");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("invalid page id"));
    }

    #[test]
    fn span_serialization_skips_absent_fields() {
        let span = RichTextSpan {
            plain_text: "hello".into(),
            annotations: Annotations {
                color: "default".into(),
                ..Annotations::default()
            },
            href: None,
            is_inline_formula: false,
        };

        let json = serde_json::to_string(&span).expect("serialize");
        assert!(!json.contains("href"));
        assert!(!json.contains("language"));

        let parsed: RichTextSpan = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, span);
    }
}

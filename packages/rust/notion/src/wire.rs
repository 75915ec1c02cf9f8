//! Typed wire records for the block store API.
//!
//! Every struct here mirrors one response shape. Decoding is deliberately
//! lenient: unknown block kinds and property types collapse into
//! `Unsupported` cases instead of failing the whole response, and missing
//! text runs decode as empty sequences.

use std::collections::HashMap;

use serde::Deserialize;

use pagemill_shared::{Annotations, RichTextSpan};

// ---------------------------------------------------------------------------
// Rich text
// ---------------------------------------------------------------------------

/// Style flags as they appear on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnnotations {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub code: bool,
    #[serde(default)]
    pub color: String,
}

/// One rich text item from a block or property value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRichText {
    /// Item type: "text", "equation", or "mention".
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub annotations: RawAnnotations,
}

impl RawRichText {
    /// Map one wire item into the domain span, tagging it with `language`
    /// when the span belongs to a code block.
    pub fn to_span(&self, language: Option<&str>) -> RichTextSpan {
        RichTextSpan {
            plain_text: self.plain_text.clone(),
            annotations: Annotations {
                bold: self.annotations.bold,
                italic: self.annotations.italic,
                strikethrough: self.annotations.strikethrough,
                underline: self.annotations.underline,
                code: self.annotations.code,
                color: self.annotations.color.clone(),
                language: language.map(str::to_owned),
            },
            href: self.href.clone(),
            is_inline_formula: self.item_type == "equation",
        }
    }
}

/// Map a slice of wire items into domain spans.
pub fn map_spans(items: &[RawRichText], language: Option<&str>) -> Vec<RichTextSpan> {
    items.iter().map(|item| item.to_span(language)).collect()
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// One record from a page's flat block stream.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBlock {
    pub id: String,
    #[serde(default)]
    pub has_children: bool,
    #[serde(flatten)]
    pub kind: RawBlockKind,
}

/// Kind-specific payload, keyed by the wire `type` tag.
///
/// Kinds outside the closed set decode as [`RawBlockKind::Unsupported`];
/// downstream conversion drops them silently.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawBlockKind {
    #[serde(rename = "heading_1")]
    Heading1 { heading_1: RichTextContent },
    #[serde(rename = "heading_2")]
    Heading2 { heading_2: RichTextContent },
    #[serde(rename = "heading_3")]
    Heading3 { heading_3: RichTextContent },
    Paragraph { paragraph: RichTextContent },
    Code { code: CodeContent },
    Image { image: ImageContent },
    Equation { equation: EquationContent },
    BulletedListItem { bulleted_list_item: RichTextContent },
    NumberedListItem { numbered_list_item: RichTextContent },
    #[serde(other)]
    Unsupported,
}

/// Payload for block kinds whose content is just text runs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RichTextContent {
    #[serde(default)]
    pub rich_text: Vec<RawRichText>,
}

/// Payload for code blocks: text runs plus a language tag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodeContent {
    #[serde(default)]
    pub rich_text: Vec<RawRichText>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Payload for image blocks: a hosted file plus caption runs.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageContent {
    #[serde(default)]
    pub caption: Vec<RawRichText>,
    #[serde(flatten)]
    pub file: RawFile,
}

/// Payload for equation blocks.
#[derive(Debug, Clone, Deserialize)]
pub struct EquationContent {
    pub expression: String,
}

/// A hosted file reference: either externally hosted or store-hosted.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawFile {
    External { external: FileLink },
    File { file: FileLink },
}

impl RawFile {
    /// The resolved URL, regardless of hosting variant.
    pub fn url(&self) -> &str {
        match self {
            Self::External { external } => &external.url,
            Self::File { file } => &file.url,
        }
    }
}

/// The URL half of a file reference.
#[derive(Debug, Clone, Deserialize)]
pub struct FileLink {
    pub url: String,
}

// ---------------------------------------------------------------------------
// Pagination envelopes
// ---------------------------------------------------------------------------

/// One page of results from the block-children listing.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockPage {
    #[serde(default)]
    pub results: Vec<RawBlock>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// One page of results from a database query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryPage {
    #[serde(default)]
    pub results: Vec<RawPage>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

// ---------------------------------------------------------------------------
// Pages and properties
// ---------------------------------------------------------------------------

/// One database entry (a page object) from a query response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPage {
    pub id: String,
    #[serde(default)]
    pub cover: Option<RawFile>,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

/// A page property value, keyed by the wire `type` tag.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title { title: Vec<RawRichText> },
    RichText { rich_text: Vec<RawRichText> },
    Checkbox { checkbox: bool },
    Date { date: Option<RawDate> },
    People { people: Vec<RawUser> },
    MultiSelect { multi_select: Vec<SelectOption> },
    #[serde(other)]
    Unsupported,
}

impl PropertyValue {
    /// Joined plain text of a title property.
    pub fn as_title(&self) -> Option<String> {
        match self {
            Self::Title { title } => Some(
                title
                    .iter()
                    .map(|item| item.plain_text.as_str())
                    .collect::<String>(),
            ),
            _ => None,
        }
    }

    /// Text runs of a rich text property.
    pub fn as_rich_text(&self) -> Option<&[RawRichText]> {
        match self {
            Self::RichText { rich_text } => Some(rich_text),
            _ => None,
        }
    }

    pub fn as_checkbox(&self) -> Option<bool> {
        match self {
            Self::Checkbox { checkbox } => Some(*checkbox),
            _ => None,
        }
    }

    /// Start/end of a date property. A set property with an empty date
    /// yields `(None, None)`.
    pub fn as_date_range(&self) -> Option<(Option<&str>, Option<&str>)> {
        match self {
            Self::Date { date } => Some(match date {
                Some(d) => (d.start.as_deref(), d.end.as_deref()),
                None => (None, None),
            }),
            _ => None,
        }
    }

    /// Display names of a people property. Partial users without a resolved
    /// name are skipped.
    pub fn as_people(&self) -> Option<Vec<String>> {
        match self {
            Self::People { people } => {
                Some(people.iter().filter_map(|user| user.name.clone()).collect())
            }
            _ => None,
        }
    }

    /// Selected option names of a multi-select property.
    pub fn as_multi_select(&self) -> Option<Vec<String>> {
        match self {
            Self::MultiSelect { multi_select } => Some(
                multi_select
                    .iter()
                    .map(|option| option.name.clone())
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// Date payload. Values arrive as ISO 8601 strings, sometimes date-only.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDate {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// A user reference. Partial users carry an id but no name.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// One option of a select/multi-select property.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Database schema (for listing category options)
// ---------------------------------------------------------------------------

/// A database object from the retrieve endpoint. Only the property schema
/// is of interest.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDatabase {
    #[serde(default)]
    pub properties: HashMap<String, SchemaProperty>,
}

/// A database property *schema* entry (distinct from a page's property
/// value: multi-select schemas carry the full option list).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaProperty {
    MultiSelect { multi_select: SelectOptions },
    #[serde(other)]
    Unsupported,
}

/// Option list of a multi-select schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectOptions {
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

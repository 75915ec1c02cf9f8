//! Canonical block representations produced by the converter.
//!
//! Everything here is built bottom-up during one conversion and immutable
//! once returned; nothing outlives the response it was assembled for.

use serde::Serialize;

use pagemill_shared::RichTextSpan;

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

/// The two list families.
///
/// Carried as a first-class tag on every normalized list item so run merging
/// never derives the family from kind-string manipulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListKind {
    #[serde(rename = "bulleted_list")]
    Bulleted,
    #[serde(rename = "numbered_list")]
    Numbered,
}

/// One list entry. `children` holds nested list entries one level down;
/// depth is unbounded and determined entirely by the source data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub content: Vec<RichTextSpan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ListItem>>,
}

/// A merged run of adjacent same-kind list items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListNode {
    pub kind: ListKind,
    pub items: Vec<ListItem>,
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// A normalized non-list block. The payload shape is fully determined by
/// the kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LeafBlock {
    #[serde(rename = "heading_1")]
    Heading1 { rich_text: Vec<RichTextSpan> },
    #[serde(rename = "heading_2")]
    Heading2 { rich_text: Vec<RichTextSpan> },
    #[serde(rename = "heading_3")]
    Heading3 { rich_text: Vec<RichTextSpan> },
    Paragraph { rich_text: Vec<RichTextSpan> },
    Code { rich_text: Vec<RichTextSpan> },
    Image {
        url: String,
        caption: Vec<RichTextSpan>,
    },
    Equation { expression: String },
}

/// Normalizer output: exactly one per recognized raw block.
///
/// List items keep their family tag and fully resolved children; the merger
/// folds them into [`ListNode`]s afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedBlock {
    Leaf(LeafBlock),
    ListItem { kind: ListKind, item: ListItem },
}

// ---------------------------------------------------------------------------
// Document tree
// ---------------------------------------------------------------------------

/// One node of the final document tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DocumentNode {
    Block(LeafBlock),
    List(ListNode),
}

/// The assembled document: ordered nodes, list runs collapsed.
pub type DocumentTree = Vec<DocumentNode>;

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str) -> RichTextSpan {
        RichTextSpan {
            plain_text: text.into(),
            ..RichTextSpan::default()
        }
    }

    #[test]
    fn leaf_blocks_serialize_with_kind_tag() {
        let heading = LeafBlock::Heading1 {
            rich_text: vec![span("Title")],
        };
        let json = serde_json::to_value(&heading).expect("serialize");
        assert_eq!(json["kind"], "heading_1");
        assert_eq!(json["rich_text"][0]["plain_text"], "Title");

        let equation = LeafBlock::Equation {
            expression: "x^2".into(),
        };
        let json = serde_json::to_value(&equation).expect("serialize");
        assert_eq!(json["kind"], "equation");
        assert_eq!(json["expression"], "x^2");
    }

    #[test]
    fn list_node_serializes_kind_and_items() {
        let node = DocumentNode::List(ListNode {
            kind: ListKind::Numbered,
            items: vec![ListItem {
                content: vec![span("first")],
                children: None,
            }],
        });

        let json = serde_json::to_value(&node).expect("serialize");
        assert_eq!(json["kind"], "numbered_list");
        assert_eq!(json["items"][0]["content"][0]["plain_text"], "first");
        // Absent children are omitted entirely
        assert!(json["items"][0].get("children").is_none());
    }
}

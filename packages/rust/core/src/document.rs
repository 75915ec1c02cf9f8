//! Document assembly: page id → flat block stream → document tree.
//!
//! Ties the block source, the normalizer, and the list merger together into
//! the one read path the front end calls per page view.

use std::time::Instant;

use tracing::{info, instrument};

use pagemill_content::{DocumentTree, merge_list_runs, normalize_blocks};
use pagemill_notion::{BlockSource, fetch_all_children};
use pagemill_shared::{PageId, Result};

/// Assemble the document tree for one page.
///
/// Fetches the page's flat block stream (paginated), normalizes every
/// recognized block — resolving nested list children on demand — and folds
/// adjacent list items into list nodes. Any fetch failure fails the whole
/// assembly; no partial tree is returned.
#[instrument(skip(source), fields(page_id = %page_id))]
pub async fn fetch_document(source: &dyn BlockSource, page_id: &PageId) -> Result<DocumentTree> {
    let start = Instant::now();

    let raw = fetch_all_children(source, &page_id.to_string()).await?;
    let normalized = normalize_blocks(source, &raw).await?;
    let tree = merge_list_runs(normalized);

    info!(
        raw_blocks = raw.len(),
        nodes = tree.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "document assembled"
    );

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use async_trait::async_trait;
    use serde_json::json;

    use pagemill_content::{DocumentNode, LeafBlock, ListKind};
    use pagemill_notion::{BlockPage, RawBlock};

    /// Single-page in-memory source keyed by block id.
    struct FakeSource {
        children: HashMap<String, Vec<RawBlock>>,
    }

    #[async_trait]
    impl BlockSource for FakeSource {
        async fn fetch_children(&self, block_id: &str, _cursor: Option<&str>) -> Result<BlockPage> {
            Ok(BlockPage {
                results: self.children.get(block_id).cloned().unwrap_or_default(),
                has_more: false,
                next_cursor: None,
            })
        }
    }

    fn block(value: serde_json::Value) -> RawBlock {
        serde_json::from_value(value).expect("fixture block")
    }

    #[tokio::test]
    async fn assembles_merged_tree_with_nested_children() {
        let page_id: PageId = "67c3fa0e-5fc2-4e29-8350-cbd0b5fd9f3f".parse().expect("id");

        let top_level = vec![
            block(json!({
                "id": "p1", "type": "paragraph",
                "paragraph": { "rich_text": [ { "type": "text", "plain_text": "intro" } ] }
            })),
            block(json!({
                "id": "a", "type": "bulleted_list_item", "has_children": true,
                "bulleted_list_item": { "rich_text": [ { "type": "text", "plain_text": "A" } ] }
            })),
            block(json!({
                "id": "b", "type": "bulleted_list_item",
                "bulleted_list_item": { "rich_text": [ { "type": "text", "plain_text": "B" } ] }
            })),
            block(json!({
                "id": "c", "type": "numbered_list_item",
                "numbered_list_item": { "rich_text": [ { "type": "text", "plain_text": "C" } ] }
            })),
            block(json!({ "id": "x", "type": "divider", "divider": {} })),
        ];

        let nested = vec![
            block(json!({
                "id": "a1", "type": "bulleted_list_item",
                "bulleted_list_item": { "rich_text": [ { "type": "text", "plain_text": "A1" } ] }
            })),
            block(json!({
                "id": "a2", "type": "bulleted_list_item",
                "bulleted_list_item": { "rich_text": [ { "type": "text", "plain_text": "A2" } ] }
            })),
        ];

        let source = FakeSource {
            children: HashMap::from([
                (page_id.to_string(), top_level),
                ("a".to_string(), nested),
            ]),
        };

        let tree = fetch_document(&source, &page_id).await.expect("assemble");

        // divider is dropped: paragraph + bulleted run + numbered run
        assert_eq!(tree.len(), 3);
        assert!(matches!(&tree[0], DocumentNode::Block(LeafBlock::Paragraph { .. })));

        match &tree[1] {
            DocumentNode::List(node) => {
                assert_eq!(node.kind, ListKind::Bulleted);
                assert_eq!(node.items.len(), 2);
                let children = node.items[0].children.as_ref().expect("A's children");
                assert_eq!(children.len(), 2);
                assert_eq!(children[0].content[0].plain_text, "A1");
            }
            other => panic!("expected bulleted list, got {other:?}"),
        }

        match &tree[2] {
            DocumentNode::List(node) => assert_eq!(node.kind, ListKind::Numbered),
            other => panic!("expected numbered list, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_page_yields_empty_tree() {
        let page_id: PageId = "67c3fa0e-5fc2-4e29-8350-cbd0b5fd9f3f".parse().expect("id");
        let source = FakeSource {
            children: HashMap::new(),
        };

        let tree = fetch_document(&source, &page_id).await.expect("assemble");
        assert!(tree.is_empty());
    }
}

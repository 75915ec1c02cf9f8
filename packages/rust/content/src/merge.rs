//! List run merging.
//!
//! Folds the normalized block sequence into the final document tree by
//! collapsing maximal runs of adjacent same-kind list items into single
//! [`ListNode`]s. Everything else passes through untouched, in order.

use crate::types::{DocumentNode, DocumentTree, ListItem, ListKind, ListNode, NormalizedBlock};

/// Merge state: either copying blocks through, or growing an open list run.
enum State {
    Scanning,
    Accumulating { kind: ListKind, items: Vec<ListItem> },
}

/// Collapse maximal runs of adjacent same-kind list items into list nodes.
///
/// A single isolated list item still produces a one-item node; bulleted and
/// numbered runs never merge with each other. Nested children were attached
/// during normalization and pass through uninspected.
pub fn merge_list_runs(blocks: Vec<NormalizedBlock>) -> DocumentTree {
    let mut tree = Vec::new();
    let mut state = State::Scanning;

    for block in blocks {
        state = match (state, block) {
            (State::Scanning, NormalizedBlock::Leaf(leaf)) => {
                tree.push(DocumentNode::Block(leaf));
                State::Scanning
            }
            (State::Scanning, NormalizedBlock::ListItem { kind, item }) => State::Accumulating {
                kind,
                items: vec![item],
            },
            (State::Accumulating { kind, mut items }, NormalizedBlock::ListItem { kind: next, item })
                if next == kind =>
            {
                items.push(item);
                State::Accumulating { kind, items }
            }
            // A list item of the other family closes the run and opens a new one.
            (State::Accumulating { kind, items }, NormalizedBlock::ListItem { kind: next, item }) => {
                tree.push(DocumentNode::List(ListNode { kind, items }));
                State::Accumulating {
                    kind: next,
                    items: vec![item],
                }
            }
            (State::Accumulating { kind, items }, NormalizedBlock::Leaf(leaf)) => {
                tree.push(DocumentNode::List(ListNode { kind, items }));
                tree.push(DocumentNode::Block(leaf));
                State::Scanning
            }
        };
    }

    // End of input closes any open run.
    if let State::Accumulating { kind, items } = state {
        tree.push(DocumentNode::List(ListNode { kind, items }));
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::types::LeafBlock;
    use pagemill_shared::RichTextSpan;

    fn span(text: &str) -> RichTextSpan {
        RichTextSpan {
            plain_text: text.into(),
            ..RichTextSpan::default()
        }
    }

    fn paragraph(text: &str) -> NormalizedBlock {
        NormalizedBlock::Leaf(LeafBlock::Paragraph {
            rich_text: vec![span(text)],
        })
    }

    fn list_item(kind: ListKind, text: &str) -> NormalizedBlock {
        NormalizedBlock::ListItem {
            kind,
            item: ListItem {
                content: vec![span(text)],
                children: None,
            },
        }
    }

    fn item_text(item: &ListItem) -> &str {
        &item.content[0].plain_text
    }

    #[test]
    fn empty_input_produces_empty_output() {
        assert!(merge_list_runs(Vec::new()).is_empty());
    }

    #[test]
    fn mixed_sequence_collapses_runs_in_order() {
        let blocks = vec![
            paragraph("intro"),
            list_item(ListKind::Bulleted, "A"),
            list_item(ListKind::Bulleted, "B"),
            list_item(ListKind::Numbered, "C"),
            paragraph("outro"),
        ];

        let tree = merge_list_runs(blocks);
        assert_eq!(tree.len(), 4);

        assert!(matches!(&tree[0], DocumentNode::Block(LeafBlock::Paragraph { .. })));
        match &tree[1] {
            DocumentNode::List(node) => {
                assert_eq!(node.kind, ListKind::Bulleted);
                let texts: Vec<&str> = node.items.iter().map(item_text).collect();
                assert_eq!(texts, ["A", "B"]);
            }
            other => panic!("expected bulleted list, got {other:?}"),
        }
        match &tree[2] {
            DocumentNode::List(node) => {
                assert_eq!(node.kind, ListKind::Numbered);
                assert_eq!(node.items.len(), 1);
            }
            other => panic!("expected numbered list, got {other:?}"),
        }
        assert!(matches!(&tree[3], DocumentNode::Block(LeafBlock::Paragraph { .. })));
    }

    #[test]
    fn isolated_item_still_becomes_a_node() {
        let tree = merge_list_runs(vec![
            paragraph("before"),
            list_item(ListKind::Bulleted, "only"),
            paragraph("after"),
        ]);

        assert_eq!(tree.len(), 3);
        match &tree[1] {
            DocumentNode::List(node) => assert_eq!(node.items.len(), 1),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn run_at_sequence_start_is_merged() {
        let tree = merge_list_runs(vec![
            list_item(ListKind::Numbered, "1"),
            list_item(ListKind::Numbered, "2"),
            paragraph("tail"),
        ]);

        assert_eq!(tree.len(), 2);
        match &tree[0] {
            DocumentNode::List(node) => assert_eq!(node.items.len(), 2),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn open_run_is_flushed_at_end_of_input() {
        let tree = merge_list_runs(vec![
            paragraph("head"),
            list_item(ListKind::Bulleted, "a"),
            list_item(ListKind::Bulleted, "b"),
        ]);

        assert_eq!(tree.len(), 2);
        match &tree[1] {
            DocumentNode::List(node) => assert_eq!(node.items.len(), 2),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn adjacent_runs_of_different_kinds_never_merge() {
        let tree = merge_list_runs(vec![
            list_item(ListKind::Bulleted, "b1"),
            list_item(ListKind::Numbered, "n1"),
            list_item(ListKind::Bulleted, "b2"),
        ]);

        assert_eq!(tree.len(), 3);
        let kinds: Vec<ListKind> = tree
            .iter()
            .map(|node| match node {
                DocumentNode::List(list) => list.kind,
                other => panic!("expected list, got {other:?}"),
            })
            .collect();
        assert_eq!(kinds, [ListKind::Bulleted, ListKind::Numbered, ListKind::Bulleted]);
    }

    #[test]
    fn output_length_matches_non_list_blocks_plus_runs() {
        // 3 non-list blocks, 3 maximal runs.
        let blocks = vec![
            paragraph("p1"),
            list_item(ListKind::Bulleted, "a"),
            list_item(ListKind::Bulleted, "b"),
            paragraph("p2"),
            list_item(ListKind::Numbered, "c"),
            list_item(ListKind::Bulleted, "d"),
            paragraph("p3"),
        ];

        let tree = merge_list_runs(blocks);
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn merging_keeps_relative_order_of_blocks_and_runs() {
        let blocks = vec![
            list_item(ListKind::Bulleted, "a"),
            paragraph("p"),
            list_item(ListKind::Numbered, "n"),
        ];

        let tree = merge_list_runs(blocks);
        assert!(matches!(&tree[0], DocumentNode::List(node) if node.kind == ListKind::Bulleted));
        assert!(matches!(&tree[1], DocumentNode::Block(_)));
        assert!(matches!(&tree[2], DocumentNode::List(node) if node.kind == ListKind::Numbered));
    }

    #[test]
    fn nested_children_pass_through_untouched() {
        let nested = ListItem {
            content: vec![span("parent")],
            children: Some(vec![ListItem {
                content: vec![span("child")],
                children: None,
            }]),
        };

        let tree = merge_list_runs(vec![NormalizedBlock::ListItem {
            kind: ListKind::Bulleted,
            item: nested.clone(),
        }]);

        match &tree[0] {
            DocumentNode::List(node) => assert_eq!(node.items[0], nested),
            other => panic!("expected list, got {other:?}"),
        }
    }
}

//! Block normalization: one raw wire record in, one typed record out.
//!
//! List items are the only kind with side effects: when the source marks an
//! item as having children, its nested list entries are resolved here through
//! the paginated [`BlockSource`], depth-first, preserving source order at
//! every level. A fetch failure anywhere in that recursion fails the whole
//! conversion; no partial tree is ever returned.

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, instrument};

use pagemill_notion::{
    BlockSource, RawBlock, RawBlockKind, RichTextContent, fetch_all_children, map_spans,
};
use pagemill_shared::Result;

use crate::types::{LeafBlock, ListItem, ListKind, NormalizedBlock};

/// Normalize an ordered sequence of raw blocks.
///
/// Unrecognized kinds yield no output; every recognized block maps to exactly
/// one [`NormalizedBlock`], in input order.
#[instrument(skip_all, fields(raw_count = blocks.len()))]
pub async fn normalize_blocks(
    source: &dyn BlockSource,
    blocks: &[RawBlock],
) -> Result<Vec<NormalizedBlock>> {
    let mut normalized = Vec::with_capacity(blocks.len());

    for block in blocks {
        if let Some(record) = normalize_block(source, block).await? {
            normalized.push(record);
        }
    }

    debug!(
        raw = blocks.len(),
        kept = normalized.len(),
        "normalization complete"
    );
    Ok(normalized)
}

/// Normalize one raw block, or `None` for kinds outside the closed set.
pub async fn normalize_block(
    source: &dyn BlockSource,
    block: &RawBlock,
) -> Result<Option<NormalizedBlock>> {
    let record = match &block.kind {
        RawBlockKind::Heading1 { heading_1 } => NormalizedBlock::Leaf(LeafBlock::Heading1 {
            rich_text: map_spans(&heading_1.rich_text, None),
        }),
        RawBlockKind::Heading2 { heading_2 } => NormalizedBlock::Leaf(LeafBlock::Heading2 {
            rich_text: map_spans(&heading_2.rich_text, None),
        }),
        RawBlockKind::Heading3 { heading_3 } => NormalizedBlock::Leaf(LeafBlock::Heading3 {
            rich_text: map_spans(&heading_3.rich_text, None),
        }),
        RawBlockKind::Paragraph { paragraph } => NormalizedBlock::Leaf(LeafBlock::Paragraph {
            rich_text: map_spans(&paragraph.rich_text, None),
        }),
        // The language tag lands on every span so renderers can highlight
        // each run independently.
        RawBlockKind::Code { code } => NormalizedBlock::Leaf(LeafBlock::Code {
            rich_text: map_spans(&code.rich_text, code.language.as_deref()),
        }),
        RawBlockKind::Image { image } => NormalizedBlock::Leaf(LeafBlock::Image {
            url: image.file.url().to_owned(),
            caption: map_spans(&image.caption, None),
        }),
        RawBlockKind::Equation { equation } => NormalizedBlock::Leaf(LeafBlock::Equation {
            expression: equation.expression.clone(),
        }),
        RawBlockKind::BulletedListItem { bulleted_list_item } => NormalizedBlock::ListItem {
            kind: ListKind::Bulleted,
            item: build_list_item(source, block, bulleted_list_item).await?,
        },
        RawBlockKind::NumberedListItem { numbered_list_item } => NormalizedBlock::ListItem {
            kind: ListKind::Numbered,
            item: build_list_item(source, block, numbered_list_item).await?,
        },
        RawBlockKind::Unsupported => return Ok(None),
    };

    Ok(Some(record))
}

/// Build a list item, resolving nested children when the source says there
/// are any.
async fn build_list_item(
    source: &dyn BlockSource,
    block: &RawBlock,
    text: &RichTextContent,
) -> Result<ListItem> {
    let children = if block.has_children {
        resolve_children(source, &block.id).await?
    } else {
        None
    };

    Ok(ListItem {
        content: map_spans(&text.rich_text, None),
        children,
    })
}

/// Recursively resolve the nested list entries under `block_id`.
///
/// Children arrive through the same paginated listing as top-level blocks.
/// Only bulleted/numbered items belong to the list subtree; every other
/// child kind is skipped here. Returns `None` when no list children exist,
/// matching the "children present only if the source item had nested list
/// children" shape.
fn resolve_children<'a>(
    source: &'a dyn BlockSource,
    block_id: &'a str,
) -> Pin<Box<dyn Future<Output = Result<Option<Vec<ListItem>>>> + Send + 'a>> {
    Box::pin(async move {
        let blocks = fetch_all_children(source, block_id).await?;

        let mut items = Vec::new();
        for child in &blocks {
            match &child.kind {
                RawBlockKind::BulletedListItem { bulleted_list_item } => {
                    items.push(build_list_item(source, child, bulleted_list_item).await?);
                }
                RawBlockKind::NumberedListItem { numbered_list_item } => {
                    items.push(build_list_item(source, child, numbered_list_item).await?);
                }
                _ => {}
            }
        }

        Ok((!items.is_empty()).then_some(items))
    })
}

//! The paginated block source capability.
//!
//! The converter core only ever sees this trait, so the HTTP client can be
//! swapped for an in-memory fake in tests.

use async_trait::async_trait;

use pagemill_shared::Result;

use crate::wire::{BlockPage, RawBlock};

/// A paginated source of child blocks.
///
/// `fetch_children(block_id, None)` returns the first page; subsequent pages
/// are requested by threading the previous page's `next_cursor` back in.
/// Exhaustion is signaled by the absence of a continuation cursor, not by a
/// count. Each page fetch is attempted once; there is no retry contract.
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Fetch one page of the children of `block_id`.
    async fn fetch_children(&self, block_id: &str, cursor: Option<&str>) -> Result<BlockPage>;
}

/// Fetch every child of `block_id`, concatenating pages in order until no
/// continuation cursor remains.
pub async fn fetch_all_children(source: &dyn BlockSource, block_id: &str) -> Result<Vec<RawBlock>> {
    let mut all = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = source.fetch_children(block_id, cursor.as_deref()).await?;
        all.extend(page.results);

        if !page.has_more {
            break;
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(all)
}

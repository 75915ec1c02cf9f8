//! Block-stream to document-tree conversion.
//!
//! This crate is the converter core. It turns the block store's flat,
//! paginated, heterogeneous block stream into a nested content tree:
//!
//! - [`normalize`] — maps each raw block into a self-describing typed record,
//!   recursively resolving nested list children through paginated fetches
//! - [`merge`] — folds adjacent same-kind list items into single list nodes
//!
//! Conversion is request-scoped: structures are built bottom-up, returned
//! immutable, and never shared across requests.

pub mod merge;
pub mod normalize;
pub mod types;

pub use merge::merge_list_runs;
pub use normalize::{normalize_block, normalize_blocks};
pub use types::{
    DocumentNode, DocumentTree, LeafBlock, ListItem, ListKind, ListNode, NormalizedBlock,
};

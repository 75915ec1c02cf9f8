//! Core read operations for pagemill.
//!
//! This crate ties the block store client and the converter together into
//! the end-to-end queries the CLI (or any other front end) exposes:
//! document assembly, catalog listing, slug lookup, search, and categories.

pub mod catalog;
pub mod document;
pub mod filter;

pub use catalog::{Catalog, post_meta_from_page, slugify};
pub use document::fetch_document;
pub use filter::{PostFilter, list_query, search_query, slug_query};

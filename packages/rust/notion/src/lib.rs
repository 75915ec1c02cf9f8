//! Block store API client and wire model.
//!
//! This crate provides:
//! - [`wire`] — typed wire records (blocks, rich text, pages, properties)
//! - [`BlockSource`] — the paginated children-fetch capability the converter
//!   core consumes
//! - [`NotionClient`] — the authenticated HTTP implementation

pub mod client;
pub mod source;
pub mod wire;

pub use client::{ClientOptions, NotionClient};
pub use source::{BlockSource, fetch_all_children};
pub use wire::{
    BlockPage, CodeContent, EquationContent, FileLink, ImageContent, PropertyValue, QueryPage,
    RawAnnotations, RawBlock, RawBlockKind, RawDatabase, RawDate, RawFile, RawPage, RawRichText,
    RawUser, RichTextContent, SchemaProperty, SelectOption, SelectOptions, map_spans,
};

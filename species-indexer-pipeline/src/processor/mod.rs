//! Processor module for the species indexer pipeline.
//!
//! Transforms raw catalog and species payloads into index documents.

mod error;
mod text;
mod transformer;

pub use error::MalformedRecordError;
pub use text::{clean_text, display_label, merge_flavor_text, title_case};
pub use transformer::CatalogTransformer;

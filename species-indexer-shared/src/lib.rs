//! # Species Indexer Shared
//!
//! Types shared by every layer of the species catalog indexer:
//!
//! - [`catalog`]: raw payloads returned by the catalog API and the generation ranges
//!   used to enumerate it
//! - [`document`]: the flat [`IndexDocument`] persisted to the search index
//! - [`schema`]: index field definitions and the schema the documents require
//! - [`task`]: the unit of work consumed by the catalog client

pub mod catalog;
pub mod document;
pub mod schema;
pub mod task;

pub use catalog::{
    generation_for_id, parse_generation_tag, CatalogEntry, GenerationRange, SpeciesEntry,
    GENERATION_RANGES,
};
pub use document::IndexDocument;
pub use schema::{desired_schema, FieldType, SchemaField};
pub use task::FetchTask;

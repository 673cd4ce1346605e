//! # Species Indexer Pipeline
//!
//! This crate provides the pipeline components for ingesting the species
//! catalog from the catalog API and indexing it into the search index.
//!
//! ## Architecture
//!
//! The pipeline follows the Fetcher-Processor-Loader pattern:
//!
//! 1. **Fetcher**: Retrieves raw payloads under a rate limit with bounded retries
//! 2. **Processor**: Transforms payloads into index documents
//! 3. **Schema**: Reconciles the live index schema before any data is written
//! 4. **Loader**: Clears the index and loads documents in batches
//! 5. **Orchestrator**: Coordinates one full refresh

pub mod errors;
pub mod fetcher;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod schema;

#[cfg(test)]
mod test_support;

pub use errors::PipelineError;

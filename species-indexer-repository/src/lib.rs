//! # Species Indexer Repository
//!
//! This crate provides the trait and implementation for managing the search
//! index. It includes definitions for errors, the provider interface, and a
//! concrete implementation for Apache Solr.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod solr;
pub mod types;

pub use config::SearchIndexConfig;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use solr::SolrClient;
pub use types::LiveField;

//! Error types for the species indexer repository.

mod search_index_error;

pub use search_index_error::SearchIndexError;

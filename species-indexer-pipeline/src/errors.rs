//! Error types for the species indexer pipeline.

use species_indexer_repository::SearchIndexError;
use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Per-record failures (fetch errors, malformed records) and per-batch
/// failures never surface here; they are counted in the run summary.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The live schema declares a field incompatibly with the desired schema.
    #[error("Schema conflict: {0}")]
    SchemaConflict(String),

    /// The search index could not be reached while preparing the run.
    #[error("Index unavailable: {0}")]
    IndexUnavailable(#[from] SearchIndexError),

    /// The fetch/transform task ended abnormally.
    #[error("Producer error: {0}")]
    Producer(String),

    /// Invalid pipeline configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Create a schema conflict error.
    pub fn schema_conflict(msg: impl Into<String>) -> Self {
        Self::SchemaConflict(msg.into())
    }

    /// Create a producer error.
    pub fn producer(msg: impl Into<String>) -> Self {
        Self::Producer(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index management,
//! allowing for different backend implementations (Solr, in-memory mocks, etc.).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::LiveField;
use species_indexer_shared::{IndexDocument, SchemaField};

/// Abstracts the underlying search index implementation.
///
/// This trait defines the management operations the indexing pipeline needs.
/// Implementations are injected into the pipeline components to enable
/// dependency injection and easy testing with mock implementations.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, SearchIndexError>`; callers decide whether an
/// error is retryable through [`SearchIndexError::is_retryable`].
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// List the fields currently declared by the index schema.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<LiveField>)` - Every declared field, in backend order
    /// * `Err(SearchIndexError)` - If the schema cannot be read
    async fn list_fields(&self) -> Result<Vec<LiveField>, SearchIndexError>;

    /// Declare a new field.
    ///
    /// Callers must only pass fields absent from the live schema; adding an
    /// existing field is a backend error.
    ///
    /// # Arguments
    ///
    /// * `field` - The field definition to add
    async fn add_field(&self, field: &SchemaField) -> Result<(), SearchIndexError>;

    /// Delete every document in the index.
    async fn delete_all(&self) -> Result<(), SearchIndexError>;

    /// Submit a batch of documents. Documents with an existing key replace the
    /// stored document.
    ///
    /// # Arguments
    ///
    /// * `documents` - The batch to submit
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the whole batch was accepted
    /// * `Err(SearchIndexError)` - If the batch was rejected
    async fn add_documents(&self, documents: &[IndexDocument]) -> Result<(), SearchIndexError>;

    /// Make every submitted change visible to searchers.
    async fn commit(&self) -> Result<(), SearchIndexError>;

    /// Request segment optimization. Implementations should not wait for the
    /// new searcher to open.
    async fn optimize(&self) -> Result<(), SearchIndexError>;

    /// Count the committed documents.
    async fn document_count(&self) -> Result<u64, SearchIndexError>;

    /// Check if the index is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the index is healthy
    /// * `Ok(false)` - If the index answered but reports itself unhealthy
    /// * `Err(SearchIndexError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchIndexError>;
}

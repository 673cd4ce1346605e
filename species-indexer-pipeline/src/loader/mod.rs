//! Loader module for the species indexer pipeline.
//!
//! Loads transformed documents into the search index as a full refresh.

use futures::{Stream, StreamExt};
use std::pin::pin;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::PipelineError;
use species_indexer_repository::{SearchIndexError, SearchIndexProvider};
use species_indexer_shared::IndexDocument;

/// Number of extra attempts for a failed batch or commit.
const RETRIES: u32 = 1;

/// Configuration for the batch indexer.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of documents per add-documents request.
    pub batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { batch_size: 50 }
    }
}

/// Counts for one load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Documents accepted by the index.
    pub submitted: usize,
    /// Documents not indexed.
    pub failed: usize,
    /// Batches submitted, not counting retries.
    pub batches: usize,
    /// Batches that needed their retry.
    pub retried_batches: usize,
    /// Whether the final commit succeeded.
    pub committed: bool,
    /// Whether the post-commit optimize succeeded.
    pub optimized: bool,
}

/// Indexer that replaces the index contents with a stream of documents.
///
/// The indexer is responsible for:
/// - Clearing the index once per run before any document is submitted
/// - Batching documents in arrival order
/// - Retrying a batch once after a retryable failure, then counting it failed
/// - Committing and optimizing after the stream ends
pub struct BatchIndexer {
    provider: Arc<dyn SearchIndexProvider>,
    config: LoaderConfig,
    refreshed: bool,
}

impl BatchIndexer {
    /// Create a new batch indexer with custom configuration.
    pub fn with_config(
        provider: Arc<dyn SearchIndexProvider>,
        config: LoaderConfig,
    ) -> Result<Self, PipelineError> {
        if config.batch_size == 0 {
            return Err(PipelineError::config("batch size must be at least 1"));
        }

        Ok(Self {
            provider,
            config,
            refreshed: false,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.config.batch_size
    }

    /// Delete every document in the index. Runs at most once per load.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::IndexUnavailable` if the delete fails; the run
    /// must not continue in that case.
    #[instrument(skip(self))]
    pub async fn begin_refresh(&mut self) -> Result<(), PipelineError> {
        if self.refreshed {
            debug!("Index already cleared for this run");
            return Ok(());
        }

        if let Err(e) = self.provider.delete_all().await {
            error!(error = %e, "Failed to clear index");
            return Err(e.into());
        }

        self.refreshed = true;
        info!("Cleared index for full refresh");
        Ok(())
    }

    /// Load every document from `documents`, then commit and optimize.
    ///
    /// Batch failures are absorbed into the report; this never fails.
    #[instrument(skip_all, fields(batch_size = self.config.batch_size))]
    pub async fn load_all<S>(&mut self, documents: S) -> LoadReport
    where
        S: Stream<Item = IndexDocument>,
    {
        let mut documents = pin!(documents);
        let mut report = LoadReport::default();
        let mut batch = Vec::with_capacity(self.config.batch_size);

        while let Some(doc) = documents.next().await {
            batch.push(doc);
            if batch.len() >= self.config.batch_size {
                self.submit(&batch, &mut report).await;
                batch.clear();
            }
        }
        if !batch.is_empty() {
            self.submit(&batch, &mut report).await;
        }

        // The next load belongs to a new run and clears the index again.
        self.refreshed = false;

        report.committed = self.commit().await;
        if report.committed {
            report.optimized = self.optimize().await;
        } else {
            warn!("Skipping optimize after failed commit");
        }

        info!(
            submitted = report.submitted,
            failed = report.failed,
            batches = report.batches,
            retried_batches = report.retried_batches,
            committed = report.committed,
            optimized = report.optimized,
            "Load completed"
        );

        report
    }

    /// Submit one batch, retrying it once on failure.
    async fn submit(&self, batch: &[IndexDocument], report: &mut LoadReport) {
        report.batches += 1;
        let first_id = batch.first().map(|doc| doc.pokemon_id);
        let last_id = batch.last().map(|doc| doc.pokemon_id);

        for attempt in 0..=RETRIES {
            match self.provider.add_documents(batch).await {
                Ok(()) => {
                    if attempt > 0 {
                        info!(
                            count = batch.len(),
                            first_id = ?first_id,
                            last_id = ?last_id,
                            "Batch succeeded after retry"
                        );
                    } else {
                        info!(
                            count = batch.len(),
                            first_id = ?first_id,
                            last_id = ?last_id,
                            "Batch submitted"
                        );
                    }
                    report.submitted += batch.len();
                    return;
                }
                Err(e) if attempt < RETRIES && e.is_retryable() => {
                    report.retried_batches += 1;
                    warn!(
                        count = batch.len(),
                        first_id = ?first_id,
                        last_id = ?last_id,
                        error = %e,
                        "Batch failed, retrying"
                    );
                }
                Err(e) => {
                    error!(
                        count = batch.len(),
                        first_id = ?first_id,
                        last_id = ?last_id,
                        error = %e,
                        attempts = attempt + 1,
                        "Batch failed, skipping"
                    );
                    report.failed += batch.len();
                    return;
                }
            }
        }
    }

    async fn commit(&self) -> bool {
        for attempt in 0..=RETRIES {
            match self.provider.commit().await {
                Ok(()) => {
                    info!("Committed index");
                    return true;
                }
                Err(e) if attempt < RETRIES => {
                    warn!(error = %e, "Commit failed, retrying");
                }
                Err(e) => {
                    error!(error = %e, "Commit failed, changes are not visible");
                }
            }
        }
        false
    }

    async fn optimize(&self) -> bool {
        match self.provider.optimize().await {
            Ok(()) => {
                debug!("Optimize requested");
                true
            }
            Err(e) => {
                warn!(error = %e, "Optimize failed");
                false
            }
        }
    }

    /// Count the committed documents.
    pub async fn document_count(&self) -> Result<u64, SearchIndexError> {
        self.provider.document_count().await
    }
}

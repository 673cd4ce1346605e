//! Fetch/transform producer feeding the indexer.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::fetcher::{FetchError, RateLimitedClient};
use crate::orchestrator::state::ProducerCounts;
use crate::processor::{CatalogTransformer, MalformedRecordError};
use species_indexer_shared::{CatalogEntry, FetchTask, IndexDocument, SpeciesEntry};

/// Why a single record was skipped.
#[derive(Debug)]
enum RecordFailure {
    Fetch { stage: &'static str, error: FetchError },
    Malformed { stage: &'static str, error: MalformedRecordError },
}

/// Fetches and transforms catalog records in plan order.
pub(crate) struct Producer {
    client: Arc<RateLimitedClient>,
    transformer: CatalogTransformer,
    catalog_endpoint: String,
    ids: Vec<u32>,
}

impl Producer {
    pub(crate) fn new(
        client: Arc<RateLimitedClient>,
        transformer: CatalogTransformer,
        catalog_endpoint: impl Into<String>,
        ids: Vec<u32>,
    ) -> Self {
        Self {
            client,
            transformer,
            catalog_endpoint: catalog_endpoint.into(),
            ids,
        }
    }

    /// Send a document for every record that can be fetched and transformed.
    ///
    /// Stops early when `shutdown` fires (checked between records) or when the
    /// receiving side is dropped.
    pub(crate) async fn run(
        self,
        sender: mpsc::Sender<IndexDocument>,
        shutdown: CancellationToken,
    ) -> ProducerCounts {
        let mut counts = ProducerCounts::default();

        for &id in &self.ids {
            if shutdown.is_cancelled() {
                info!(next_id = id, "Producer received shutdown signal");
                counts.cancelled = true;
                break;
            }

            counts.attempted += 1;
            match self.produce(id).await {
                Ok(doc) => {
                    counts.transformed += 1;
                    if sender.send(doc).await.is_err() {
                        warn!(id = id, "Indexer stopped receiving, ending producer");
                        break;
                    }
                }
                Err(RecordFailure::Fetch { stage, error }) => {
                    counts.fetch_failed += 1;
                    warn!(id = id, stage = stage, kind = error.kind(), error = %error, "Skipping record");
                }
                Err(RecordFailure::Malformed { stage, error }) => {
                    counts.malformed += 1;
                    warn!(id = id, stage = stage, error = %error, "Skipping malformed record");
                }
            }
        }

        debug!(
            attempted = counts.attempted,
            transformed = counts.transformed,
            "Producer finished"
        );
        counts
    }

    async fn produce(&self, id: u32) -> Result<IndexDocument, RecordFailure> {
        let catalog_task = FetchTask::for_endpoint(&self.catalog_endpoint, id);
        let entry: CatalogEntry = self.fetch_as("catalog", &catalog_task).await?;

        let species_task = self
            .transformer
            .species_task(&entry)
            .map_err(|error| RecordFailure::Malformed { stage: "species_reference", error })?;
        let species: SpeciesEntry = self.fetch_as("species", &species_task).await?;

        self.transformer
            .transform(&entry, &species)
            .map_err(|error| RecordFailure::Malformed { stage: "transform", error })
    }

    async fn fetch_as<T>(&self, stage: &'static str, task: &FetchTask) -> Result<T, RecordFailure>
    where
        T: serde::de::DeserializeOwned,
    {
        let payload = self
            .client
            .fetch(task)
            .await
            .map_err(|error| RecordFailure::Fetch { stage, error })?;

        serde_json::from_value(payload).map_err(|e| RecordFailure::Malformed {
            stage,
            error: MalformedRecordError::new(task.to_string(), format!("unexpected payload shape: {}", e)),
        })
    }
}

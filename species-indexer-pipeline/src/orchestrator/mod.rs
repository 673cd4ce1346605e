//! Orchestrator module for the species indexer pipeline.
//!
//! Coordinates the reconciler, the fetch/transform producer and the indexer
//! for one full catalog refresh.

mod plan;
mod producer;
mod state;

pub use plan::CatalogPlan;
pub use state::{PipelineState, ProducerCounts, RunSummary};

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::PipelineError;
use crate::fetcher::RateLimitedClient;
use crate::loader::BatchIndexer;
use crate::processor::CatalogTransformer;
use crate::schema::SchemaReconciler;
use producer::Producer;
use species_indexer_shared::{desired_schema, IndexDocument, SchemaField};

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Capacity of the document channel between producer and indexer.
    pub queue_capacity: usize,
    /// Catalog endpoint, relative to the API base.
    pub catalog_endpoint: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 100,
            catalog_endpoint: "pokemon".to_string(),
        }
    }
}

/// Orchestrator that runs a full catalog refresh.
///
/// The orchestrator:
/// - Reconciles the index schema before touching any data
/// - Clears the index, then streams fetched documents into the indexer
/// - Counts every skipped record without aborting the run
/// - Handles shutdown signals between fetch tasks
///
/// Shutdown is latched: a request made at any point, including before
/// [`run`](Self::run), stops the current run and every later one.
pub struct PipelineOrchestrator {
    client: Arc<RateLimitedClient>,
    transformer: CatalogTransformer,
    reconciler: SchemaReconciler,
    indexer: BatchIndexer,
    plan: CatalogPlan,
    desired: Vec<SchemaField>,
    config: OrchestratorConfig,
    shutdown: CancellationToken,
    state: PipelineState,
}

impl PipelineOrchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(
        client: Arc<RateLimitedClient>,
        transformer: CatalogTransformer,
        reconciler: SchemaReconciler,
        indexer: BatchIndexer,
        plan: CatalogPlan,
    ) -> Self {
        let queue_capacity = indexer.batch_size() * 2;
        let config = OrchestratorConfig {
            queue_capacity,
            ..OrchestratorConfig::default()
        };
        Self::with_config(client, transformer, reconciler, indexer, plan, config)
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        client: Arc<RateLimitedClient>,
        transformer: CatalogTransformer,
        reconciler: SchemaReconciler,
        indexer: BatchIndexer,
        plan: CatalogPlan,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            client,
            transformer,
            reconciler,
            indexer,
            plan,
            desired: desired_schema(),
            config,
            shutdown: CancellationToken::new(),
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// A token that triggers a graceful shutdown when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Trigger a graceful shutdown.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Run one full refresh.
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - The run reached `Done`; per-record failures are in the summary
    /// * `Err(PipelineError)` - The run failed while preparing the index
    pub async fn run(&mut self) -> Result<RunSummary, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline_run", run_id = %run_id);
        self.execute(run_id).instrument(span).await
    }

    async fn execute(&mut self, run_id: Uuid) -> Result<RunSummary, PipelineError> {
        let started = Instant::now();
        let started_at = Utc::now();
        self.state = PipelineState::Idle;

        info!(records = self.plan.len(), "Starting species indexing run");
        if self.plan.is_empty() {
            warn!("Catalog plan is empty, the index will be cleared and left empty");
        }

        let schema = match self.reconciler.reconcile(&self.desired).await {
            Ok(report) => report,
            Err(e) => return Err(self.fail(e)),
        };
        self.transition(PipelineState::SchemaReady);

        if self.shutdown.is_cancelled() {
            warn!("Shutdown requested before refresh, leaving index untouched");
            self.transition(PipelineState::Done);
            return Ok(RunSummary {
                run_id,
                state: self.state,
                started_at,
                elapsed: started.elapsed(),
                schema,
                counts: ProducerCounts {
                    cancelled: true,
                    ..ProducerCounts::default()
                },
                indexing_failed: 0,
                load: Default::default(),
                index_count: None,
            });
        }

        if let Err(e) = self.indexer.begin_refresh().await {
            return Err(self.fail(e));
        }

        let (tx, rx) = mpsc::channel::<IndexDocument>(self.config.queue_capacity.max(1));
        let producer = Producer::new(
            self.client.clone(),
            self.transformer.clone(),
            self.config.catalog_endpoint.clone(),
            self.plan.ids().to_vec(),
        );
        let producer_handle = tokio::spawn(producer.run(tx, self.shutdown.clone()));
        self.transition(PipelineState::Fetching);

        self.transition(PipelineState::Indexing);
        let mut load = self.indexer.load_all(ReceiverStream::new(rx)).await;

        let counts = match producer_handle.await {
            Ok(counts) => counts,
            Err(e) => {
                error!(error = %e, "Producer task failed");
                return Err(PipelineError::producer(e.to_string()));
            }
        };

        let indexing_failed = load.failed;
        load.failed += counts.fetch_failed + counts.malformed;

        let mut index_count = None;
        if load.committed {
            self.transition(PipelineState::Committed);
            match self.indexer.document_count().await {
                Ok(count) => {
                    if count != load.submitted as u64 {
                        warn!(
                            index_count = count,
                            submitted = load.submitted,
                            "Index document count differs from submitted documents"
                        );
                    }
                    index_count = Some(count);
                }
                Err(e) => warn!(error = %e, "Failed to read index document count"),
            }
        }
        self.transition(PipelineState::Done);

        let summary = RunSummary {
            run_id,
            state: self.state,
            started_at,
            elapsed: started.elapsed(),
            schema,
            counts,
            indexing_failed,
            load,
            index_count,
        };

        info!(
            attempted = summary.counts.attempted,
            transformed = summary.counts.transformed,
            fetch_failed = summary.counts.fetch_failed,
            malformed = summary.counts.malformed,
            indexing_failed = summary.indexing_failed,
            submitted = summary.load.submitted,
            failed = summary.load.failed,
            committed = summary.load.committed,
            index_count = ?summary.index_count,
            cancelled = summary.counts.cancelled,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Run summary"
        );

        Ok(summary)
    }

    fn transition(&mut self, next: PipelineState) {
        info!(from = %self.state, to = %next, "Pipeline state changed");
        self.state = next;
    }

    fn fail(&mut self, e: PipelineError) -> PipelineError {
        error!(error = %e, state = %self.state, "Pipeline run failed");
        self.state = PipelineState::Failed;
        e
    }
}

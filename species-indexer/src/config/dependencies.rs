//! Dependency initialization and wiring for the species indexer.

use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::IndexingError;
use species_indexer_pipeline::{
    fetcher::{FetcherConfig, HttpTransport, RateLimitedClient},
    loader::{BatchIndexer, LoaderConfig},
    orchestrator::{CatalogPlan, OrchestratorConfig, PipelineOrchestrator},
    processor::CatalogTransformer,
    schema::SchemaReconciler,
};
use species_indexer_repository::{SearchIndexConfig, SearchIndexProvider, SolrClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: PipelineOrchestrator,
}

impl Dependencies {
    /// Initialize all dependencies from settings.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If a client cannot be built or Solr is not healthy
    pub async fn new(settings: &Settings) -> Result<Self, IndexingError> {
        info!(
            catalog_api_url = %settings.catalog_api_url,
            solr_url = %settings.solr_url,
            batch_size = settings.batch_size,
            generations = ?settings.generations,
            "Initializing dependencies"
        );

        // Initialize Solr client
        let index_config = SearchIndexConfig::with_max_batch_size(settings.batch_size)
            .request_timeout(settings.request_timeout);
        let solr = SolrClient::new(&settings.solr_url, index_config)
            .map_err(|e| IndexingError::config(format!("Failed to create Solr client: {}", e)))?;

        // Verify Solr is reachable
        let healthy = solr.health_check().await?;
        if !healthy {
            return Err(IndexingError::config("Solr core is unhealthy"));
        }

        info!("Solr connection verified");

        let provider: Arc<dyn SearchIndexProvider> = Arc::new(solr);

        // Initialize catalog client
        let transport = HttpTransport::new(&settings.catalog_api_url, settings.request_timeout)?;
        let fetcher_config = FetcherConfig {
            min_interval: settings.request_delay,
            max_attempts: settings.max_attempts,
            backoff_base: settings.backoff_base,
        };
        let client = Arc::new(RateLimitedClient::with_config(Arc::new(transport), fetcher_config));

        let transformer = CatalogTransformer::new()
            .with_language(settings.flavor_text_language.clone())
            .with_species_endpoint(settings.species_endpoint.clone());

        let reconciler = SchemaReconciler::new(provider.clone());
        let indexer = BatchIndexer::with_config(
            provider,
            LoaderConfig {
                batch_size: settings.batch_size,
            },
        )?;

        let plan = match &settings.generations {
            Some(generations) => CatalogPlan::generations(generations)?,
            None => CatalogPlan::all(),
        };

        let orchestrator = PipelineOrchestrator::with_config(
            client,
            transformer,
            reconciler,
            indexer,
            plan,
            OrchestratorConfig {
                queue_capacity: settings.queue_capacity,
                catalog_endpoint: settings.catalog_endpoint.clone(),
            },
        );

        Ok(Self { orchestrator })
    }
}

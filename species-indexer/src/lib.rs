//! # Species Indexer
//!
//! Main library for the species catalog search indexer.
//!
//! This crate provides the entry point, configuration and logging setup for
//! running a full catalog refresh.

pub mod config;
pub mod telemetry;

pub use config::{Dependencies, LogFormat, Settings};

use species_indexer_pipeline::orchestrator::RunSummary;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] species_indexer_pipeline::PipelineError),

    /// Search index error.
    #[error("Search index error: {0}")]
    SearchIndexError(#[from] species_indexer_repository::SearchIndexError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Wire dependencies and run one full refresh, stopping early on Ctrl-C.
pub async fn run(settings: &Settings) -> Result<RunSummary, IndexingError> {
    let Dependencies { mut orchestrator } = Dependencies::new(settings).await?;

    let shutdown = orchestrator.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        info!("Received shutdown signal, finishing loaded documents");
        shutdown.cancel();

        // A second Ctrl-C skips the graceful path.
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received second shutdown signal, exiting immediately");
            std::process::exit(130);
        }
    });

    Ok(orchestrator.run().await?)
}

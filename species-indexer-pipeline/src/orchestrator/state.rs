//! Run state and summary types.

use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

use crate::loader::LoadReport;
use crate::schema::ReconcileReport;

/// Lifecycle of a pipeline run.
///
/// `Failed` is only reachable while preparing the index, before any record
/// is fetched: a schema failure leaves from `Idle`, a delete-all failure
/// from `SchemaReady`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    SchemaReady,
    Fetching,
    Indexing,
    Committed,
    Done,
    Failed,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::SchemaReady => "schema_ready",
            Self::Fetching => "fetching",
            Self::Indexing => "indexing",
            Self::Committed => "committed",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-record counts kept by the fetch/transform producer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProducerCounts {
    /// Catalog ids the producer started on.
    pub attempted: usize,
    /// Records turned into documents.
    pub transformed: usize,
    /// Records lost to a catalog or species fetch failure.
    pub fetch_failed: usize,
    /// Records rejected as malformed.
    pub malformed: usize,
    /// Whether the producer stopped on a shutdown signal.
    pub cancelled: bool,
}

/// Final accounting of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub state: PipelineState,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub schema: ReconcileReport,
    pub counts: ProducerCounts,
    /// Documents lost in failed batches.
    pub indexing_failed: usize,
    /// Load report; `failed` covers every record that did not reach the index.
    pub load: LoadReport,
    /// Committed document count read back after the run, when available.
    pub index_count: Option<u64>,
}

impl RunSummary {
    pub fn submitted(&self) -> usize {
        self.load.submitted
    }

    pub fn failed(&self) -> usize {
        self.load.failed
    }

    pub fn cancelled(&self) -> bool {
        self.counts.cancelled
    }

    /// Whether the index now holds exactly the submitted documents.
    pub fn is_consistent(&self) -> bool {
        self.load.committed && self.index_count == Some(self.load.submitted as u64)
    }
}

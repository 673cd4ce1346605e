//! In-memory search index used by the pipeline tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use tracing::Level;

use species_indexer_repository::{LiveField, SearchIndexError, SearchIndexProvider};
use species_indexer_shared::{IndexDocument, SchemaField};

/// Mock index with Solr-like visibility: writes are staged until commit.
#[derive(Default)]
pub struct MockIndex {
    pub fields: Mutex<Vec<LiveField>>,
    pub staged: Mutex<BTreeMap<String, IndexDocument>>,
    pub committed: Mutex<BTreeMap<String, IndexDocument>>,
    /// Document ids of every add-documents call, in call order.
    pub batches: Mutex<Vec<Vec<u32>>>,
    pub list_calls: AtomicUsize,
    pub add_field_calls: AtomicUsize,
    pub delete_all_calls: AtomicUsize,
    pub commit_calls: AtomicUsize,
    pub optimize_calls: AtomicUsize,
    pub unreachable: AtomicBool,
    pub fail_delete_all: AtomicBool,
    pub fail_adds: AtomicUsize,
    /// Reject every add-documents call with a 400.
    pub reject_adds: AtomicBool,
    pub fail_commits: AtomicUsize,
    pub fail_optimize: AtomicBool,
}

impl MockIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// An index whose schema already matches `desired`.
    pub fn with_schema(desired: &[SchemaField]) -> Self {
        let index = Self::new();
        *index.fields.lock().unwrap() = desired.iter().map(live_field).collect();
        index
    }

    pub fn unreachable() -> Self {
        let index = Self::new();
        index.unreachable.store(true, Ordering::SeqCst);
        index
    }

    /// Fail the next `n` add-documents calls with a 503.
    pub fn fail_next_adds(&self, n: usize) {
        self.fail_adds.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` commits with a 503.
    pub fn fail_next_commits(&self, n: usize) {
        self.fail_commits.store(n, Ordering::SeqCst);
    }

    pub fn seed_committed(&self, doc: IndexDocument) {
        self.staged.lock().unwrap().insert(doc.id.clone(), doc.clone());
        self.committed.lock().unwrap().insert(doc.id.clone(), doc);
    }

    pub fn committed_ids(&self) -> Vec<String> {
        self.committed.lock().unwrap().keys().cloned().collect()
    }

    fn check_reachable(&self) -> Result<(), SearchIndexError> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(SearchIndexError::connection("connection refused"))
        } else {
            Ok(())
        }
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

pub fn live_field(field: &SchemaField) -> LiveField {
    LiveField {
        name: field.name.clone(),
        field_type: Some(field.field_type),
        backend_type: field.field_type.to_string(),
        multi_valued: field.multi_valued,
        fast_lookup: field.fast_lookup,
    }
}

#[async_trait]
impl SearchIndexProvider for MockIndex {
    async fn list_fields(&self) -> Result<Vec<LiveField>, SearchIndexError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        Ok(self.fields.lock().unwrap().clone())
    }

    async fn add_field(&self, field: &SchemaField) -> Result<(), SearchIndexError> {
        self.add_field_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        self.fields.lock().unwrap().push(live_field(field));
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), SearchIndexError> {
        self.delete_all_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        if self.fail_delete_all.load(Ordering::SeqCst) {
            return Err(SearchIndexError::status("delete-all", 503, "unavailable"));
        }
        self.staged.lock().unwrap().clear();
        Ok(())
    }

    async fn add_documents(&self, documents: &[IndexDocument]) -> Result<(), SearchIndexError> {
        self.batches
            .lock()
            .unwrap()
            .push(documents.iter().map(|doc| doc.pokemon_id).collect());
        self.check_reachable()?;
        if self.reject_adds.load(Ordering::SeqCst) {
            return Err(SearchIndexError::status("add-documents", 400, "unknown field"));
        }
        if Self::take_failure(&self.fail_adds) {
            return Err(SearchIndexError::status("add-documents", 503, "unavailable"));
        }

        let mut staged = self.staged.lock().unwrap();
        for doc in documents {
            staged.insert(doc.id.clone(), doc.clone());
        }
        Ok(())
    }

    async fn commit(&self) -> Result<(), SearchIndexError> {
        self.commit_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        if Self::take_failure(&self.fail_commits) {
            return Err(SearchIndexError::status("commit", 503, "unavailable"));
        }
        *self.committed.lock().unwrap() = self.staged.lock().unwrap().clone();
        Ok(())
    }

    async fn optimize(&self) -> Result<(), SearchIndexError> {
        self.optimize_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        if self.fail_optimize.load(Ordering::SeqCst) {
            return Err(SearchIndexError::status("optimize", 500, "merge failed"));
        }
        Ok(())
    }

    async fn document_count(&self) -> Result<u64, SearchIndexError> {
        self.check_reachable()?;
        Ok(self.committed.lock().unwrap().len() as u64)
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        Ok(!self.unreachable.load(Ordering::SeqCst))
    }
}

/// Log lines written at `info` and above while the guard is alive.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Capture logs on the current thread at the default run log level.
    pub fn install() -> (Self, DefaultGuard) {
        let logs = Self::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

//! Rate-limited catalog client.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::fetcher::error::FetchError;
use crate::fetcher::rate_gate::{RateGate, RequestState};
use crate::fetcher::transport::CatalogTransport;
use species_indexer_shared::FetchTask;

/// Configuration for the rate-limited client.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Minimum time between the starts of consecutive requests.
    pub min_interval: Duration,
    /// Total transport calls allowed per task, including the first.
    pub max_attempts: u32,
    /// Wait before the first retry; doubles for every further retry.
    pub backoff_base: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(100),
            max_attempts: 3,
            backoff_base: Duration::from_millis(1000),
        }
    }
}

impl FetcherConfig {
    /// Backoff before retry number `retry` (zero-based).
    pub fn backoff_for(&self, retry: u32) -> Duration {
        self.backoff_base.saturating_mul(2u32.saturating_pow(retry))
    }
}

/// Catalog client enforcing a request-start floor and bounded retries.
///
/// Requests from concurrent callers are serialized through one [`RateGate`],
/// so the floor holds process-wide for a shared client.
pub struct RateLimitedClient {
    transport: Arc<dyn CatalogTransport>,
    config: FetcherConfig,
    gate: Mutex<RateGate>,
}

impl RateLimitedClient {
    /// Create a new client with default configuration.
    pub fn new(transport: Arc<dyn CatalogTransport>) -> Self {
        Self::with_config(transport, FetcherConfig::default())
    }

    /// Create a new client with custom configuration.
    pub fn with_config(transport: Arc<dyn CatalogTransport>, mut config: FetcherConfig) -> Self {
        config.max_attempts = config.max_attempts.max(1);
        let gate = Mutex::new(RateGate::new(config.min_interval));

        Self {
            transport,
            config,
            gate,
        }
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Fetch the payload for `task`.
    ///
    /// Transient failures are retried until `max_attempts` transport calls
    /// have been made. Permanent failures return immediately.
    pub async fn fetch(&self, task: &FetchTask) -> Result<Value, FetchError> {
        let mut state = RequestState::new(task.clone(), Instant::now());

        loop {
            self.gate.lock().await.acquire(state.not_before).await;

            let attempt = state.attempt + 1;
            match self.transport.get(&state.task.path).await {
                Ok(payload) => {
                    info!(
                        task_id = state.task.id,
                        path = %state.task.path,
                        attempt = attempt,
                        outcome = "ok",
                        "Fetch attempt"
                    );
                    return Ok(payload);
                }
                Err(e) if e.is_transient() && attempt < self.config.max_attempts => {
                    let delay = self.config.backoff_for(state.attempt);
                    warn!(
                        task_id = state.task.id,
                        path = %state.task.path,
                        attempt = attempt,
                        max_attempts = self.config.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        outcome = e.kind(),
                        error = %e,
                        "Fetch attempt failed, retrying"
                    );
                    // Backoff comes on top of the rate floor.
                    state = state.retry(Instant::now() + self.config.min_interval + delay);
                }
                Err(e) => {
                    warn!(
                        task_id = state.task.id,
                        path = %state.task.path,
                        attempt = attempt,
                        outcome = e.kind(),
                        error = %e,
                        "Fetch failed"
                    );
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    use crate::test_support::CapturedLogs;

    /// Transport replaying scripted outcomes and recording call instants.
    struct ScriptedTransport {
        script: StdMutex<VecDeque<Result<Value, FetchError>>>,
        fallback: Result<Value, FetchError>,
        latency: Duration,
        calls: StdMutex<Vec<Instant>>,
    }

    impl ScriptedTransport {
        fn always(outcome: Result<Value, FetchError>) -> Self {
            Self {
                script: StdMutex::new(VecDeque::new()),
                fallback: outcome,
                latency: Duration::ZERO,
                calls: StdMutex::new(Vec::new()),
            }
        }

        fn then(self, outcomes: Vec<Result<Value, FetchError>>) -> Self {
            *self.script.lock().unwrap() = outcomes.into();
            self
        }

        fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        fn calls(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatalogTransport for ScriptedTransport {
        async fn get(&self, _path: &str) -> Result<Value, FetchError> {
            self.calls.lock().unwrap().push(Instant::now());
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| self.fallback.clone())
        }
    }

    fn transient() -> Result<Value, FetchError> {
        Err(FetchError::transient("pokemon/1", "status 503"))
    }

    fn task(id: u32) -> FetchTask {
        FetchTask::for_endpoint("pokemon", id)
    }

    #[test]
    fn test_backoff_doubles() {
        let config = FetcherConfig::default();

        assert_eq!(config.backoff_for(0), Duration::from_secs(1));
        assert_eq!(config.backoff_for(1), Duration::from_secs(2));
        assert_eq!(config.backoff_for(2), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_to_start_spacing() {
        let transport = Arc::new(ScriptedTransport::always(Ok(json!({}))));
        let client = RateLimitedClient::new(transport.clone());

        for id in 1..=5 {
            client.fetch(&task(id)).await.unwrap();
        }

        let calls = transport.calls();
        assert_eq!(calls.len(), 5);
        for pair in calls.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(100));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_counts_toward_floor() {
        let transport =
            Arc::new(ScriptedTransport::always(Ok(json!({}))).with_latency(Duration::from_millis(30)));
        let client = RateLimitedClient::new(transport.clone());

        client.fetch(&task(1)).await.unwrap();
        client.fetch(&task(2)).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[1] - calls[0], Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_transient_failure_is_bounded() {
        let transport = Arc::new(ScriptedTransport::always(transient()));
        let client = RateLimitedClient::new(transport.clone());

        let err = client.fetch(&task(1)).await.unwrap_err();

        assert!(err.is_transient());
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_failure_is_not_retried() {
        let transport = Arc::new(ScriptedTransport::always(Err(FetchError::permanent(
            "pokemon/1",
            "status 404",
        ))));
        let client = RateLimitedClient::new(transport.clone());

        let err = client.fetch(&task(1)).await.unwrap_err();

        assert!(!err.is_transient());
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exponential_backoff_between_attempts() {
        let transport = Arc::new(ScriptedTransport::always(transient()));
        let client = RateLimitedClient::new(transport.clone());

        let _ = client.fetch(&task(1)).await;

        let calls = transport.calls();
        assert_eq!(calls[1] - calls[0], Duration::from_millis(1100));
        assert_eq!(calls[2] - calls[1], Duration::from_millis(2100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_waits_for_backoff_plus_floor() {
        let transport = Arc::new(
            ScriptedTransport::always(Ok(json!({ "id": 1 }))).then(vec![transient()]),
        );
        let client = RateLimitedClient::new(transport.clone());

        client.fetch(&task(1)).await.unwrap();

        let calls = transport.calls();
        assert!(calls[1] - calls[0] >= Duration::from_millis(1100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_slow_response_still_adds_floor() {
        let transport = Arc::new(
            ScriptedTransport::always(Ok(json!({})))
                .then(vec![transient()])
                .with_latency(Duration::from_millis(300)),
        );
        let client = RateLimitedClient::new(transport.clone());

        client.fetch(&task(1)).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[1] - calls[0], Duration::from_millis(1400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_attempt_reaches_default_log_level() {
        let (logs, _guard) = CapturedLogs::install();
        let transport = Arc::new(
            ScriptedTransport::always(Ok(json!({ "id": 1 }))).then(vec![transient()]),
        );
        let client = RateLimitedClient::new(transport.clone());

        client.fetch(&task(1)).await.unwrap();

        let output = logs.contents();
        let attempts: Vec<&str> = output
            .lines()
            .filter(|line| line.contains("Fetch attempt"))
            .collect();
        assert_eq!(attempts.len(), 2);
        assert!(attempts[0].contains("retrying"));
        assert!(attempts[1].contains("outcome=") && !attempts[1].contains("retrying"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failure() {
        let transport = Arc::new(
            ScriptedTransport::always(Ok(json!({ "id": 1 }))).then(vec![transient()]),
        );
        let client = RateLimitedClient::new(transport.clone());

        let payload = client.fetch(&task(1)).await.unwrap();

        assert_eq!(payload["id"], 1);
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_config() {
        let transport = Arc::new(ScriptedTransport::always(transient()));
        let config = FetcherConfig {
            max_attempts: 0,
            ..FetcherConfig::default()
        };
        let client = RateLimitedClient::with_config(transport.clone(), config);

        let _ = client.fetch(&task(1)).await;

        assert_eq!(client.config().max_attempts, 1);
        assert_eq!(transport.calls().len(), 1);
    }
}

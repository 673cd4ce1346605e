//! Transport layer for catalog requests.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::errors::PipelineError;
use crate::fetcher::error::FetchError;

const USER_AGENT: &str = concat!("species-indexer/", env!("CARGO_PKG_VERSION"));

/// Performs a single GET against the catalog API.
///
/// Implementations classify every failure as transient or permanent; retry
/// and rate limiting live in [`RateLimitedClient`](super::RateLimitedClient).
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    /// Fetch the JSON payload at `path`, relative to the API base URL.
    async fn get(&self, path: &str) -> Result<Value, FetchError>;
}

/// HTTP transport over a pooled `reqwest` client.
pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport for the API rooted at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The API base (e.g., "https://pokeapi.co/api/v2")
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PipelineError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| PipelineError::config(format!("Invalid catalog URL '{}': {}", base_url, e)))?;

        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PipelineError::config(format!("Failed to build HTTP client: {}", e)))?;

        info!(base_url = %base_url, timeout_ms = timeout.as_millis() as u64, "Created catalog transport");

        Ok(Self { http, base_url })
    }

    fn classify_status(path: &str, status: StatusCode) -> FetchError {
        let reason = format!("status {}", status.as_u16());
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            FetchError::transient(path, reason)
        } else {
            FetchError::permanent(path, reason)
        }
    }
}

#[async_trait]
impl CatalogTransport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Value, FetchError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| FetchError::permanent(path, format!("invalid path: {}", e)))?;

        // Send errors are timeouts, refused connections or resets.
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transient(path, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::classify_status(path, status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transient(path, e.to_string()))?;

        serde_json::from_slice(&body)
            .map_err(|e| FetchError::permanent(path, format!("malformed body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn transport_for(server: &Server) -> HttpTransport {
        HttpTransport::new(&format!("{}/api/v2", server.url()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_success_returns_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v2/pokemon/25")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":25,"name":"pikachu"}"#)
            .create_async()
            .await;

        let value = transport_for(&server).get("pokemon/25").await.unwrap();

        mock.assert_async().await;
        assert_eq!(value["name"], "pikachu");
    }

    #[tokio::test]
    async fn test_not_found_is_permanent() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v2/pokemon/99999")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let err = transport_for(&server).get("pokemon/99999").await.unwrap_err();

        assert_eq!(err, FetchError::permanent("pokemon/99999", "status 404"));
    }

    #[tokio::test]
    async fn test_server_errors_and_throttling_are_transient() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v2/pokemon/1")
            .with_status(503)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v2/pokemon/2")
            .with_status(429)
            .create_async()
            .await;

        let transport = transport_for(&server);

        assert!(transport.get("pokemon/1").await.unwrap_err().is_transient());
        assert!(transport.get("pokemon/2").await.unwrap_err().is_transient());
    }

    #[tokio::test]
    async fn test_malformed_body_is_permanent() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v2/pokemon/3")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = transport_for(&server).get("pokemon/3").await.unwrap_err();

        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_connection_failure_is_transient() {
        let transport =
            HttpTransport::new("http://127.0.0.1:1/api/v2", Duration::from_secs(1)).unwrap();

        let err = transport.get("pokemon/1").await.unwrap_err();

        assert!(err.is_transient());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpTransport::new("::not a url::", Duration::from_secs(1));
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }
}

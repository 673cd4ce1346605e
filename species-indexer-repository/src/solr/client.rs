//! Solr client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! on top of a Solr core's HTTP APIs:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list fields | `GET {core}/schema/fields?showDefaults=true` |
//! | add field | `POST {core}/schema` with `{"add-field": ...}` |
//! | delete all | `POST {core}/update` with `{"delete": {"query": "*:*"}}` |
//! | add documents | `POST {core}/update` with a JSON array |
//! | commit | `POST {core}/update` with `{"commit": {}}` |
//! | optimize | `POST {core}/update` with `{"optimize": {"waitSearcher": false}}` |
//! | count | `GET {core}/select?q=*:*&rows=0` |
//! | health | `GET {core}/admin/ping` |

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::config::SearchIndexConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::solr::field_types::{field_definition, field_type_from_solr};
use crate::types::LiveField;
use species_indexer_shared::{IndexDocument, SchemaField};

#[derive(Debug, Deserialize)]
struct FieldsResponse {
    #[serde(default)]
    fields: Vec<SolrField>,
}

#[derive(Debug, Deserialize)]
struct SolrField {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(rename = "multiValued")]
    multi_valued: Option<bool>,
    #[serde(rename = "docValues")]
    doc_values: Option<bool>,
}

impl From<SolrField> for LiveField {
    fn from(field: SolrField) -> Self {
        let (field_type, implicit_multi) = match field_type_from_solr(&field.type_name) {
            Some((field_type, multi)) => (Some(field_type), multi),
            None => (None, false),
        };

        LiveField {
            name: field.name,
            field_type,
            backend_type: field.type_name,
            multi_valued: field.multi_valued.unwrap_or(implicit_multi),
            fast_lookup: field.doc_values.unwrap_or(false),
        }
    }
}

/// Solr client implementation.
///
/// # Example
///
/// ```ignore
/// use species_indexer_repository::{SearchIndexConfig, SearchIndexProvider, SolrClient};
///
/// let client = SolrClient::new("http://localhost:8983/solr/pokemon", SearchIndexConfig::default())?;
/// let fields = client.list_fields().await?;
/// println!("{} fields declared", fields.len());
/// ```
pub struct SolrClient {
    http: Client,
    core_url: Url,
    config: SearchIndexConfig,
}

impl SolrClient {
    /// Create a new Solr client for the core at `url`.
    ///
    /// # Arguments
    ///
    /// * `url` - The core URL (e.g., "http://localhost:8983/solr/pokemon")
    /// * `config` - Batch limit and request timeout
    ///
    /// # Returns
    ///
    /// * `Ok(SolrClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or the HTTP client cannot be built
    pub fn new(url: &str, config: SearchIndexConfig) -> Result<Self, SearchIndexError> {
        let mut core_url =
            Url::parse(url).map_err(|e| SearchIndexError::validation(format!("Invalid index URL '{}': {}", url, e)))?;

        // Relative joins replace the last segment unless the path ends with '/'.
        if !core_url.path().ends_with('/') {
            let path = format!("{}/", core_url.path());
            core_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        info!(
            url = %core_url,
            max_batch_size = ?config.max_batch_size,
            "Created Solr client"
        );

        Ok(Self {
            http,
            core_url,
            config,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SearchIndexError> {
        self.core_url
            .join(path)
            .map_err(|e| SearchIndexError::validation(format!("Invalid endpoint '{}': {}", path, e)))
    }

    fn validate_batch_size(&self, size: usize) -> Result<(), SearchIndexError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(SearchIndexError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    /// Send a request and decode the JSON response, mapping failures by kind.
    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Value, SearchIndexError> {
        let response = request
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(format!("{} request failed: {}", operation, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(operation = %operation, status = %status, body = %body, "Solr request failed");
            return Err(SearchIndexError::status(operation, status.as_u16(), body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(format!("{} response: {}", operation, e)))?;

        // Older Schema API versions report rejected commands with a 200 status.
        if let Some(errors) = body.get("errors") {
            error!(operation = %operation, errors = %errors, "Solr reported errors");
            return Err(SearchIndexError::status(operation, 400, errors.to_string()));
        }

        Ok(body)
    }

    async fn post_update(&self, operation: &str, body: &Value) -> Result<Value, SearchIndexError> {
        let url = self.endpoint("update?wt=json")?;
        self.send(operation, self.http.post(url).json(body)).await
    }
}

#[async_trait]
impl SearchIndexProvider for SolrClient {
    #[instrument(skip(self))]
    async fn list_fields(&self) -> Result<Vec<LiveField>, SearchIndexError> {
        let url = self.endpoint("schema/fields?showDefaults=true&wt=json")?;
        let body = self.send("list-fields", self.http.get(url)).await?;

        let response: FieldsResponse = serde_json::from_value(body)
            .map_err(|e| SearchIndexError::parse(format!("list-fields response: {}", e)))?;

        debug!(count = response.fields.len(), "Listed Solr fields");
        Ok(response.fields.into_iter().map(LiveField::from).collect())
    }

    #[instrument(skip(self, field), fields(field = %field.name))]
    async fn add_field(&self, field: &SchemaField) -> Result<(), SearchIndexError> {
        let url = self.endpoint("schema?wt=json")?;
        let body = json!({ "add-field": field_definition(field) });

        self.send("add-field", self.http.post(url).json(&body)).await?;

        debug!(field = %field.name, "Field added");
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), SearchIndexError> {
        self.post_update("delete-all", &json!({ "delete": { "query": "*:*" } }))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn add_documents(&self, documents: &[IndexDocument]) -> Result<(), SearchIndexError> {
        if documents.is_empty() {
            return Ok(());
        }
        self.validate_batch_size(documents.len())?;

        let body = serde_json::to_value(documents)
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;

        self.post_update("add-documents", &body).await?;
        Ok(())
    }

    async fn commit(&self) -> Result<(), SearchIndexError> {
        self.post_update("commit", &json!({ "commit": {} })).await?;
        Ok(())
    }

    async fn optimize(&self) -> Result<(), SearchIndexError> {
        self.post_update("optimize", &json!({ "optimize": { "waitSearcher": false } }))
            .await?;
        Ok(())
    }

    async fn document_count(&self) -> Result<u64, SearchIndexError> {
        let url = self.endpoint("select?q=*:*&rows=0&wt=json")?;
        let body = self.send("count", self.http.get(url)).await?;

        body.pointer("/response/numFound")
            .and_then(Value::as_u64)
            .ok_or_else(|| SearchIndexError::parse("count response has no numFound"))
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let url = self.endpoint("admin/ping?wt=json")?;
        let body = self.send("ping", self.http.get(url)).await?;

        Ok(body.get("status").and_then(Value::as_str) == Some("OK"))
    }
}

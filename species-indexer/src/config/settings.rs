//! Process settings read from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::IndexingError;

/// Default catalog API base URL.
const DEFAULT_CATALOG_API_URL: &str = "https://pokeapi.co/api/v2";

/// Default catalog endpoint.
const DEFAULT_CATALOG_ENDPOINT: &str = "pokemon";

/// Default species endpoint.
const DEFAULT_SPECIES_ENDPOINT: &str = "pokemon-species";

/// Default Solr core URL.
const DEFAULT_SOLR_URL: &str = "http://localhost:8983/solr/pokemon";

const DEFAULT_REQUEST_DELAY_MS: u64 = 100;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_BASE_MS: u64 = 1000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_BATCH_SIZE: usize = 50;
const DEFAULT_FLAVOR_TEXT_LANGUAGE: &str = "en";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'text' or 'json', got '{}'", other)),
        }
    }
}

/// Settings for one indexing run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub catalog_api_url: String,
    pub catalog_endpoint: String,
    pub species_endpoint: String,
    pub solr_url: String,
    pub request_delay: Duration,
    pub max_attempts: u32,
    pub backoff_base: Duration,
    pub request_timeout: Duration,
    pub batch_size: usize,
    pub queue_capacity: usize,
    pub flavor_text_language: String,
    /// Generations to index; `None` means all of them.
    pub generations: Option<Vec<u32>>,
    /// Log file; logs go to stderr when unset.
    pub log_file: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `CATALOG_API_URL`: Catalog API base URL (default: https://pokeapi.co/api/v2)
    /// - `CATALOG_ENDPOINT` / `SPECIES_ENDPOINT`: Endpoint names (default: pokemon / pokemon-species)
    /// - `SOLR_URL`: Solr core URL (default: http://localhost:8983/solr/pokemon)
    /// - `REQUEST_DELAY_MS`: Minimum start-to-start request spacing (default: 100)
    /// - `MAX_ATTEMPTS`: Transport calls per fetch, including the first (default: 3)
    /// - `BACKOFF_BASE_MS`: First retry delay, doubled per retry (default: 1000)
    /// - `REQUEST_TIMEOUT_SECS`: Per-request timeout (default: 10)
    /// - `BATCH_SIZE`: Documents per index request (default: 50)
    /// - `QUEUE_CAPACITY`: Documents buffered between fetcher and indexer (default: 2 x BATCH_SIZE)
    /// - `FLAVOR_TEXT_LANGUAGE`: Flavor text language (default: en)
    /// - `CATALOG_GENERATIONS`: Comma-separated generations (default: all)
    /// - `LOG_FILE`: Log file path (default: stderr)
    /// - `LOG_FORMAT`: `text` or `json` (default: text)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let batch_size: usize = parse_or(&get, "BATCH_SIZE", DEFAULT_BATCH_SIZE)?;
        if batch_size == 0 {
            return Err(IndexingError::config("BATCH_SIZE must be at least 1"));
        }

        let max_attempts: u32 = parse_or(&get, "MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            return Err(IndexingError::config("MAX_ATTEMPTS must be at least 1"));
        }

        let queue_capacity: usize = parse_or(&get, "QUEUE_CAPACITY", batch_size * 2)?;
        if queue_capacity == 0 {
            return Err(IndexingError::config("QUEUE_CAPACITY must be at least 1"));
        }

        let generations = get("CATALOG_GENERATIONS")
            .map(|value| parse_generations(&value))
            .transpose()?;

        let log_format = match get("LOG_FORMAT") {
            Some(value) => value
                .parse()
                .map_err(|e| IndexingError::config(format!("Invalid LOG_FORMAT: {}", e)))?,
            None => LogFormat::Text,
        };

        Ok(Self {
            catalog_api_url: get("CATALOG_API_URL").unwrap_or_else(|| DEFAULT_CATALOG_API_URL.to_string()),
            catalog_endpoint: get("CATALOG_ENDPOINT").unwrap_or_else(|| DEFAULT_CATALOG_ENDPOINT.to_string()),
            species_endpoint: get("SPECIES_ENDPOINT").unwrap_or_else(|| DEFAULT_SPECIES_ENDPOINT.to_string()),
            solr_url: get("SOLR_URL").unwrap_or_else(|| DEFAULT_SOLR_URL.to_string()),
            request_delay: Duration::from_millis(parse_or(&get, "REQUEST_DELAY_MS", DEFAULT_REQUEST_DELAY_MS)?),
            max_attempts,
            backoff_base: Duration::from_millis(parse_or(&get, "BACKOFF_BASE_MS", DEFAULT_BACKOFF_BASE_MS)?),
            request_timeout: Duration::from_secs(parse_or(
                &get,
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            batch_size,
            queue_capacity,
            flavor_text_language: get("FLAVOR_TEXT_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_FLAVOR_TEXT_LANGUAGE.to_string()),
            generations,
            log_file: get("LOG_FILE").map(PathBuf::from),
            log_format,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, IndexingError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| IndexingError::config(format!("Invalid {} '{}': {}", key, value, e))),
        None => Ok(default),
    }
}

fn parse_generations(value: &str) -> Result<Vec<u32>, IndexingError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u32>().map_err(|e| {
                IndexingError::config(format!("Invalid CATALOG_GENERATIONS entry '{}': {}", part, e))
            })
        })
        .collect()
}

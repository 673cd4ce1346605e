//! Fetcher module for the species indexer pipeline.
//!
//! Retrieves raw catalog payloads from the catalog API under a start-to-start
//! rate limit, retrying transient failures with exponential backoff.

mod client;
mod error;
mod rate_gate;
mod transport;

pub use client::{FetcherConfig, RateLimitedClient};
pub use error::FetchError;
pub use rate_gate::{RateGate, RequestState};
pub use transport::{CatalogTransport, HttpTransport};

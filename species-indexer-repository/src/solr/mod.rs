//! Solr implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! that talks to a Solr core over its JSON HTTP APIs (Schema API and update
//! handler).

mod client;
mod field_types;

pub use client::SolrClient;
pub use field_types::{field_definition, field_type_from_solr, solr_type_name};

//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch as the backend. The same REST calls are served by
//! Elasticsearch clusters.

mod bulk_response;
mod index_config;
mod provider;

pub use bulk_response::parse_bulk_response;
pub use index_config::{get_index_mappings, get_index_settings, DEFAULT_INDEX_NAME};
pub use provider::OpenSearchProvider;

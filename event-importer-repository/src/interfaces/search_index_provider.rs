//! Search index provider trait definition.
//!
//! This module defines the abstract interface for the destination index,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use std::time::Duration;

use async_trait::async_trait;
use event_importer_shared::IndexAction;
use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::types::BulkSummary;

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// All methods return `Result<T, SearchIndexError>` for consistent error handling across
/// different backend implementations.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Check that the cluster answers.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the cluster responded successfully
    /// * `Err(SearchIndexError::ConnectionError)` - If it is unreachable or unhealthy
    async fn ping(&self) -> Result<(), SearchIndexError>;

    /// Check whether an index with the given name exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError>;

    /// Create an index with the given settings/mappings body.
    ///
    /// # Arguments
    ///
    /// * `index` - Name of the index to create
    /// * `body` - Index creation body (e.g. `{"mappings": {...}}`)
    async fn create_index(&self, index: &str, body: &Value) -> Result<(), SearchIndexError>;

    /// Index a batch of documents in a single bulk request.
    ///
    /// Rejected documents are reported in the returned summary, not as an error.
    ///
    /// # Arguments
    ///
    /// * `actions` - Documents to index, each carrying its own index name and id
    /// * `timeout` - Timeout for the bulk request
    ///
    /// # Returns
    ///
    /// * `Ok(BulkSummary)` - Aggregate counts and per-document results
    /// * `Err(SearchIndexError)` - If the request as a whole failed
    async fn bulk_index(
        &self,
        actions: &[IndexAction],
        timeout: Duration,
    ) -> Result<BulkSummary, SearchIndexError>;
}

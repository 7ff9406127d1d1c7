//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use std::time::Duration;

use async_trait::async_trait;
use event_importer_shared::IndexAction;
use opensearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    BulkOperation, BulkParts, OpenSearch,
};
use serde_json::{Map, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::config::SearchIndexConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::bulk_response::parse_bulk_response;
use crate::types::BulkSummary;

/// OpenSearch provider implementation.
///
/// # Example
///
/// ```ignore
/// use event_importer_repository::{OpenSearchProvider, SearchIndexConfig, SearchIndexProvider};
///
/// let provider = OpenSearchProvider::connect(&SearchIndexConfig::new("localhost", 9200)).await?;
/// if !provider.index_exists("waze_events").await? {
///     provider.create_index("waze_events", &get_index_settings()).await?;
/// }
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider for the specified URL.
    ///
    /// No request is sent; use [`OpenSearchProvider::connect`] to also check
    /// that the cluster answers.
    ///
    /// # Arguments
    ///
    /// * `url` - The cluster URL (e.g., "http://localhost:9200")
    pub fn new(url: &str) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        debug!(url = %url, "Created OpenSearch provider");

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Create a provider and ping the cluster.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - If the cluster answered the ping
    /// * `Err(SearchIndexError::ConnectionError)` - If it did not
    pub async fn connect(config: &SearchIndexConfig) -> Result<Self, SearchIndexError> {
        let url = config.url();
        let provider = Self::new(&url)?;
        provider.ping().await?;

        info!(url = %url, "Connected to search cluster");
        Ok(provider)
    }

    fn bulk_body(actions: &[IndexAction]) -> Vec<BulkOperation<&Map<String, Value>>> {
        actions
            .iter()
            .map(|action| {
                BulkOperation::index(&action.source)
                    .index(action.index.as_str())
                    .id(action.id.as_str())
                    .into()
            })
            .collect()
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    async fn ping(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchIndexError::connection(format!(
                "Ping returned status {}",
                status
            )));
        }

        Ok(())
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            other => Err(SearchIndexError::index_creation(format!(
                "Unexpected status {} checking index '{}'",
                other, index
            ))),
        }
    }

    async fn create_index(&self, index: &str, body: &Value) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body.clone())
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Create index request failed");
            return Err(SearchIndexError::index_creation(format!(
                "Create index '{}' failed with status {}: {}",
                index, status, error_body
            )));
        }

        debug!(index = %index, "Index created");
        Ok(())
    }

    /// Submit the actions as one `_bulk` request with the given timeout.
    ///
    /// Item level rejections are counted in the summary; only a failed request
    /// (transport error, timeout, non-2xx status, unreadable body) is an error.
    async fn bulk_index(
        &self,
        actions: &[IndexAction],
        timeout: Duration,
    ) -> Result<BulkSummary, SearchIndexError> {
        if actions.is_empty() {
            return Ok(BulkSummary::default());
        }

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(Self::bulk_body(actions))
            .request_timeout(timeout)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::bulk_index(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let summary = parse_bulk_response(actions, &body)?;
        debug!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Bulk request completed"
        );
        Ok(summary)
    }
}

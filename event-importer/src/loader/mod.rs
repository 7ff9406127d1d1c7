//! Loader module for the import.
//!
//! Groups index actions into fixed-size batches and submits each batch as one
//! bulk request, keeping a running count of indexed and rejected documents.

use std::sync::Arc;
use std::time::Duration;

use event_importer_repository::{BulkSummary, SearchIndexProvider};
use event_importer_shared::IndexAction;
use futures::{Stream, StreamExt};
use tracing::{debug, error, instrument, warn};

use crate::errors::IngestError;

/// Default number of documents per bulk request.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default timeout for a single bulk request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the bulk loader.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Number of documents to batch before submitting.
    pub chunk_size: usize,
    /// Timeout for each bulk request.
    pub request_timeout: Duration,
    /// Log every rejected document instead of counting only.
    pub report_failures: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            report_failures: false,
        }
    }
}

/// Running totals of a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Documents submitted to the index.
    pub submitted: usize,
    /// Documents the index accepted.
    pub succeeded: usize,
    /// Documents the index rejected.
    pub failed: usize,
    /// Bulk requests sent.
    pub batches: usize,
}

impl LoadReport {
    fn record(&mut self, summary: &BulkSummary) {
        self.submitted += summary.total;
        self.succeeded += summary.succeeded;
        self.failed += summary.failed;
        self.batches += 1;
    }
}

/// Loader that submits index actions in bulk.
pub struct BulkLoader {
    provider: Arc<dyn SearchIndexProvider>,
    config: LoaderConfig,
}

impl BulkLoader {
    /// Create a new bulk loader with the default configuration.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self::with_config(provider, LoaderConfig::default())
    }

    /// Create a new bulk loader with custom configuration.
    ///
    /// A chunk size of zero is treated as one.
    pub fn with_config(provider: Arc<dyn SearchIndexProvider>, mut config: LoaderConfig) -> Self {
        config.chunk_size = config.chunk_size.max(1);
        Self { provider, config }
    }

    /// Loader configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Drain `actions`, submitting a bulk request every `chunk_size` actions
    /// and once more for the final partial batch.
    ///
    /// Rejected documents are counted, not treated as errors. The load stops
    /// at the first stream error or failed bulk request; documents already
    /// submitted stay indexed.
    #[instrument(skip(self, actions), fields(chunk_size = self.config.chunk_size))]
    pub async fn load<S>(&self, mut actions: S) -> Result<LoadReport, IngestError>
    where
        S: Stream<Item = Result<IndexAction, IngestError>> + Unpin,
    {
        let mut report = LoadReport::default();
        let mut batch = Vec::with_capacity(self.config.chunk_size.min(DEFAULT_CHUNK_SIZE));

        while let Some(action) = actions.next().await {
            batch.push(action?);
            if batch.len() >= self.config.chunk_size {
                self.flush(&mut batch, &mut report).await?;
            }
        }
        self.flush(&mut batch, &mut report).await?;

        Ok(report)
    }

    /// Submit the pending batch, if any, and fold its summary into `report`.
    async fn flush(
        &self,
        batch: &mut Vec<IndexAction>,
        report: &mut LoadReport,
    ) -> Result<(), IngestError> {
        if batch.is_empty() {
            return Ok(());
        }

        let count = batch.len();
        debug!(count = count, "Submitting bulk request");

        let summary = self
            .provider
            .bulk_index(batch.as_slice(), self.config.request_timeout)
            .await
            .map_err(|e| {
                error!(error = %e, count = count, "Bulk request failed");
                IngestError::loader(format!("Failed to bulk index {} documents: {}", count, e))
            })?;

        if summary.failed > 0 {
            debug!(
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Bulk request completed with some failures"
            );
            if self.config.report_failures {
                for failure in summary.failures() {
                    warn!(
                        id = %failure.id,
                        status = failure.status,
                        error = failure.error.as_deref().unwrap_or("missing from bulk response"),
                        "Document was not indexed"
                    );
                }
            }
        }

        report.record(&summary);
        batch.clear();
        Ok(())
    }
}

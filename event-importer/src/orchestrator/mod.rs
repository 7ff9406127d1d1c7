//! Orchestrator module for the import.
//!
//! Streams every source record through the processor and the bulk loader,
//! reports the outcome and releases the source connection.

use std::time::Instant;

use event_importer_repository::SourceStore;
use futures::StreamExt;
use tracing::{error, info, instrument, warn};

use crate::errors::IngestError;
use crate::loader::{BulkLoader, LoadReport};
use crate::processor::RecordProcessor;

/// How an import run ended.
#[derive(Debug)]
pub enum ImportOutcome {
    /// Every record was submitted. Some may have been rejected by the index.
    Completed(LoadReport),
    /// The source collection had no records; nothing was submitted.
    SourceEmpty,
    /// The run stopped early. Records submitted before the failure stay indexed.
    Failed(IngestError),
}

impl ImportOutcome {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed(report) if report.failed > 0 => "completed_with_failures",
            Self::Completed(_) => "completed",
            Self::SourceEmpty => "source_empty",
            Self::Failed(_) => "failed",
        }
    }
}

/// Orchestrator that coordinates the import components.
///
/// The orchestrator owns the source store for the whole run and closes it
/// before `run` returns, whatever the outcome.
pub struct Orchestrator {
    source: Box<dyn SourceStore>,
    processor: RecordProcessor,
    loader: BulkLoader,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(source: Box<dyn SourceStore>, processor: RecordProcessor, loader: BulkLoader) -> Self {
        Self {
            source,
            processor,
            loader,
        }
    }

    /// Run the import.
    ///
    /// Failures after the stores are connected are logged and reported in the
    /// returned outcome rather than propagated.
    #[instrument(skip(self), fields(index = %self.processor.index()))]
    pub async fn run(self) -> ImportOutcome {
        let started = Instant::now();
        let outcome = self.transfer().await;

        self.source.close().await;
        info!(
            outcome = outcome.label(),
            elapsed_secs = format!("{:.2}", started.elapsed().as_secs_f64()),
            "Source connection closed"
        );

        outcome
    }

    async fn transfer(&self) -> ImportOutcome {
        let total = match self.source.count_records().await {
            Ok(total) => total,
            Err(e) => {
                error!(error = %e, "Failed to count source records");
                return ImportOutcome::Failed(e.into());
            }
        };

        if total == 0 {
            warn!("No records in the source collection to import");
            return ImportOutcome::SourceEmpty;
        }
        info!(total = total, "Found records to import");

        info!("Starting bulk load");
        match self.load().await {
            Ok(report) => {
                info!(
                    succeeded = report.succeeded,
                    failed = report.failed,
                    batches = report.batches,
                    "Bulk load finished"
                );
                if report.failed > 0 {
                    warn!(failed = report.failed, "Some records could not be indexed");
                }
                ImportOutcome::Completed(report)
            }
            Err(e) => {
                error!(error = %e, "Bulk load failed");
                ImportOutcome::Failed(e)
            }
        }
    }

    async fn load(&self) -> Result<LoadReport, IngestError> {
        let records = self.source.stream_records().await?;
        let processor = &self.processor;
        let actions = records.map(|record| {
            record
                .map(|record| processor.process(record))
                .map_err(IngestError::from)
        });

        self.loader.load(actions).await
    }
}

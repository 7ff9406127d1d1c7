//! Event Importer Main Entry Point
//!
//! One-shot job that copies the event collection from MongoDB into the
//! search index, then exits.

use dotenv::dotenv;
use event_importer::config::LogFormat;
use event_importer::{Dependencies, ImporterConfig, IndexingError};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing(format: LogFormat) -> Result<(), IndexingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("event_importer=info,event_importer_repository=info")
    });

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true),
                )
                .try_init()
                .map_err(|e| IndexingError::config(format!("Failed to init tracing: {}", e)))?;

            info!(
                service_name = "event-importer",
                service_version = env!("CARGO_PKG_VERSION"),
                "Tracing initialized with JSON format"
            );
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
                .try_init()
                .map_err(|e| IndexingError::config(format!("Failed to init tracing: {}", e)))?;

            info!(
                service_name = "event-importer",
                service_version = env!("CARGO_PKG_VERSION"),
                "Tracing initialized with console output"
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing(LogFormat::from_env())?;

    info!("Starting event import");

    let config = ImporterConfig::from_env();

    let deps = match Dependencies::new(&config).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(IndexingError::ConnectionError(reason)) => {
            error!(reason = %reason, "Import aborted due to connection problems");
            return Ok(());
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let outcome = deps.orchestrator.run().await;
    info!(outcome = outcome.label(), "Import finished");

    Ok(())
}

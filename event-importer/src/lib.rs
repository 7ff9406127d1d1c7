//! # Event Importer
//!
//! One-shot importer that copies event records from a MongoDB collection
//! into a search index.
//!
//! ## Architecture
//!
//! The import runs strictly top to bottom:
//!
//! 1. **Prober**: Waits for the source store, then the search cluster
//! 2. **Schema**: Creates the destination index with its mapping if missing
//! 3. **Processor**: Transforms each source record into an index action
//! 4. **Loader**: Submits actions in fixed-size bulk batches
//! 5. **Orchestrator**: Streams records through the steps above, reports
//!    counts and closes the source connection
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`prober`]: Availability probing with a bounded retry budget
//! - [`schema`]: Destination index initialization
//! - [`processor`]: Record transform
//! - [`loader`]: Bulk loading and failure accounting
//! - [`orchestrator`]: Coordinates the import
//! - [`errors`]: Error types for the import

pub mod config;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod prober;
pub mod schema;

pub use config::{Dependencies, ImporterConfig};
pub use errors::IngestError;

use thiserror::Error;

/// Errors that can occur during importer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A store could not be reached within its retry budget.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }
}

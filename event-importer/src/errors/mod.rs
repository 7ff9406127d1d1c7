//! Error types for the import.

use event_importer_repository::SourceStoreError;
use thiserror::Error;

/// Errors that can occur while importing records.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Error reading from the source store.
    #[error("Source error: {0}")]
    SourceError(String),

    /// Error from the loader component.
    #[error("Loader error: {0}")]
    LoaderError(String),

    /// Error checking for or creating the destination index.
    #[error("Schema error: {0}")]
    SchemaError(String),
}

impl IngestError {
    /// Create a source error.
    pub fn source_store(msg: impl Into<String>) -> Self {
        Self::SourceError(msg.into())
    }

    /// Create a loader error.
    pub fn loader(msg: impl Into<String>) -> Self {
        Self::LoaderError(msg.into())
    }

    /// Create a schema error.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::SchemaError(msg.into())
    }
}

impl From<SourceStoreError> for IngestError {
    fn from(err: SourceStoreError) -> Self {
        Self::SourceError(err.to_string())
    }
}

//! Source store error types.

use thiserror::Error;

/// Errors from reading the source collection.
#[derive(Debug, Clone, Error)]
pub enum SourceStoreError {
    /// Failed to reach the source store or its health check failed.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A query (count, find) was rejected.
    #[error("Query error: {0}")]
    QueryError(String),

    /// The cursor failed while iterating.
    #[error("Cursor error: {0}")]
    CursorError(String),

    /// A stored document could not be converted into a record.
    #[error("Conversion error: {0}")]
    ConversionError(String),
}

impl SourceStoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a cursor error.
    pub fn cursor(msg: impl Into<String>) -> Self {
        Self::CursorError(msg.into())
    }

    /// Create a conversion error.
    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::ConversionError(msg.into())
    }
}

impl From<mongodb::error::Error> for SourceStoreError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::QueryError(err.to_string())
    }
}

//! # Event Importer Repository
//!
//! This crate provides traits and implementations for the two stores the
//! importer talks to: the MongoDB collection records are read from, and the
//! search index they are bulk loaded into. It includes definitions for
//! errors, interfaces, bulk result types and the fixed index mapping.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod mongo;
pub mod opensearch;
pub mod types;

pub use config::{SearchIndexConfig, SourceStoreConfig};
pub use errors::{SearchIndexError, SourceStoreError};
pub use interfaces::{RecordStream, SearchIndexProvider, SourceStore};
pub use mongo::MongoSourceStore;
pub use opensearch::OpenSearchProvider;
pub use types::{BulkItemResult, BulkSummary};

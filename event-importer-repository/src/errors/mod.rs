//! Error types for the importer repository.
//!
//! One error type per store: `SearchIndexError` for the destination index
//! and `SourceStoreError` for the source collection.

mod search_index_error;
mod source_store_error;

pub use search_index_error::SearchIndexError;
pub use source_store_error::SourceStoreError;

//! Interface definitions for the source store and the search index.
//!
//! These traits allow dependency injection and swappable backend
//! implementations, and let the importer be tested against mocks.

mod search_index_provider;
mod source_store;

pub use search_index_provider::SearchIndexProvider;
pub use source_store::{RecordStream, SourceStore};

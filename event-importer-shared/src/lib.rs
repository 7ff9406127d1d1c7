//! # Event Importer Shared
//!
//! This crate defines the record types that flow from the source store,
//! through the transform step, into the search index. It also names the
//! fields the transform cares about.

pub mod fields;
pub mod types;

pub use types::index_action::{GeoPoint, IndexAction};
pub use types::source_record::SourceRecord;

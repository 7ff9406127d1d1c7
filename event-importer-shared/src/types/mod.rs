//! This module defines the core data structures used across the importer.
//! It re-exports `SourceRecord`, `IndexAction` and `GeoPoint`.

pub mod index_action;
pub mod source_record;

pub use index_action::{GeoPoint, IndexAction};
pub use source_record::SourceRecord;

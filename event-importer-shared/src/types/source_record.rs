//! Source record types.
//!
//! This module defines the record as it is read from the source store,
//! before any transform is applied.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A document read from the source store.
///
/// The store-assigned identifier is kept apart from the remaining fields so
/// that it never leaks into the indexed `_source`.
///
/// # Fields
///
/// - `store_id`: The store-assigned identifier rendered as a string
/// - `fields`: Every other field of the stored document, in source order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceRecord {
    pub store_id: String,
    pub fields: Map<String, Value>,
}

impl SourceRecord {
    /// Create a new source record.
    ///
    /// # Example
    ///
    /// ```
    /// use event_importer_shared::SourceRecord;
    /// use serde_json::{json, Map};
    ///
    /// let mut fields = Map::new();
    /// fields.insert("comuna".to_string(), json!("Santiago"));
    ///
    /// let record = SourceRecord::new("665f1c2e9b1e8a3d4c2b1a00", fields);
    /// assert!(record.contains("comuna"));
    /// ```
    pub fn new(store_id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            store_id: store_id.into(),
            fields,
        }
    }

    /// Get a field value by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Whether the record carries the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }
}

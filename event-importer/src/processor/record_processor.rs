//! Record processor implementation.
//!
//! Transforms source records into `IndexAction`s for the bulk loader.

use event_importer_shared::{fields, GeoPoint, IndexAction, SourceRecord};
use serde_json::Value;

/// Processor that turns source records into index actions.
///
/// The processor is responsible for:
/// - Choosing the document id (`id_original` when declared, else the store id)
/// - Folding `latitud`/`longitud` into a single `location` geo point
/// - Tagging each action with the destination index
#[derive(Debug, Clone)]
pub struct RecordProcessor {
    index: String,
}

impl RecordProcessor {
    /// Create a processor for the given destination index.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
        }
    }

    /// Destination index name.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Transform a single record.
    ///
    /// Records carrying only one of the two coordinates keep it as is.
    pub fn process(&self, record: SourceRecord) -> IndexAction {
        let id = Self::document_id(&record);
        let mut source = record.fields;

        if source.contains_key(fields::LATITUDE) && source.contains_key(fields::LONGITUDE) {
            let lat = source.shift_remove(fields::LATITUDE).unwrap_or(Value::Null);
            let lon = source.shift_remove(fields::LONGITUDE).unwrap_or(Value::Null);
            source.insert(
                fields::LOCATION.to_string(),
                GeoPoint::new(lat, lon).into_value(),
            );
        }

        IndexAction::new(self.index.clone(), id, source)
    }

    /// Pick the document id for a record.
    ///
    /// A null `id_original` counts as absent. Non-string ids are rendered as JSON text.
    fn document_id(record: &SourceRecord) -> String {
        match record.get(fields::ID_ORIGINAL) {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Null) | None => record.store_id.clone(),
            Some(other) => other.to_string(),
        }
    }
}

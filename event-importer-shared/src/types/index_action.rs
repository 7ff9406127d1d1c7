//! Index action types for the search index.
//!
//! This module defines the document structure submitted to the bulk API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Geospatial point as accepted by a `geo_point` mapping.
///
/// Coordinates are carried exactly as the source stored them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: Value,
    pub lon: Value,
}

impl GeoPoint {
    /// Create a new geo point from latitude and longitude values.
    pub fn new(lat: Value, lon: Value) -> Self {
        Self { lat, lon }
    }

    /// Render the point as a JSON object (`{"lat": .., "lon": ..}`).
    pub fn into_value(self) -> Value {
        let mut point = Map::with_capacity(2);
        point.insert("lat".to_string(), self.lat);
        point.insert("lon".to_string(), self.lon);
        Value::Object(point)
    }
}

/// A single document to be indexed.
///
/// Serialises with the bulk metadata names (`_index`, `_id`, `_source`).
///
/// # Fields
///
/// - `index`: Destination index name
/// - `id`: Document identifier in the destination index
/// - `source`: Document body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexAction {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source")]
    pub source: Map<String, Value>,
}

impl IndexAction {
    /// Create a new index action.
    pub fn new(index: impl Into<String>, id: impl Into<String>, source: Map<String, Value>) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
            source,
        }
    }
}

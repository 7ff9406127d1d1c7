//! Conversion of stored BSON documents into source records.

use bson::{Bson, Document};
use chrono::SecondsFormat;
use event_importer_shared::{fields, SourceRecord};
use serde_json::{Map, Number, Value};

use crate::errors::SourceStoreError;

/// Convert a BSON value into the JSON value that will be indexed.
///
/// Datetimes become RFC 3339 strings (UTC, millisecond precision) so `date`
/// mappings accept them; ObjectIds become their hex form. Non-finite doubles
/// have no JSON form and become `null`. Types without a natural JSON
/// counterpart use relaxed extended JSON.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(i) => Value::from(i),
        Bson::Int64(i) => Value::from(i),
        Bson::Double(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        Bson::String(s) => Value::String(s),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => {
            Value::String(dt.to_chrono().to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        Bson::Array(values) => Value::Array(values.into_iter().map(bson_to_json).collect()),
        Bson::Document(doc) => Value::Object(document_to_map(doc)),
        other => other.into_relaxed_extjson(),
    }
}

/// Render a store-assigned identifier as a string.
///
/// ObjectIds use their 24 character hex form and strings are kept verbatim;
/// anything else is rendered as JSON text.
pub fn render_store_id(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => bson_to_json(other.clone()).to_string(),
    }
}

/// Split a stored document into its identifier and remaining fields.
///
/// # Returns
///
/// * `Ok(SourceRecord)` - The record, without `_id` among its fields
/// * `Err(SourceStoreError::ConversionError)` - If the document has no `_id`
pub fn document_to_record(mut doc: Document) -> Result<SourceRecord, SourceStoreError> {
    let id = doc
        .remove(fields::STORE_ID)
        .ok_or_else(|| SourceStoreError::conversion("Document has no _id field"))?;

    Ok(SourceRecord::new(render_store_id(&id), document_to_map(doc)))
}

fn document_to_map(doc: Document) -> Map<String, Value> {
    doc.into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect()
}

//! Parsing of bulk API responses.

use event_importer_shared::IndexAction;
use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::types::{BulkItemResult, BulkSummary};

/// Build a `BulkSummary` from a bulk response body.
///
/// The response carries one entry per submitted action, in submission order,
/// each keyed by its operation type (`{"index": {"_id", "status", "error"?}}`).
///
/// # Arguments
///
/// * `actions` - The actions that were submitted
/// * `body` - The decoded response body
///
/// # Returns
///
/// * `Ok(BulkSummary)` - Counts and per-item results
/// * `Err(SearchIndexError::ParseError)` - If the body has no `items` array
pub fn parse_bulk_response(
    actions: &[IndexAction],
    body: &Value,
) -> Result<BulkSummary, SearchIndexError> {
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchIndexError::parse("Bulk response has no items array"))?;

    // entries past the submitted actions have nothing to account for
    let results = items
        .iter()
        .take(actions.len())
        .enumerate()
        .map(|(position, entry)| parse_item(entry, actions.get(position)))
        .collect();

    Ok(BulkSummary::from_items(actions.len(), results))
}

fn parse_item(entry: &Value, action: Option<&IndexAction>) -> BulkItemResult {
    // Each entry is a single-key object; the key is the operation type.
    let item = entry
        .as_object()
        .and_then(|ops| ops.values().next())
        .unwrap_or(&Value::Null);

    let id = item
        .get("_id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| action.map(|a| a.id.clone()))
        .unwrap_or_default();

    let status = item
        .get("status")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
        .unwrap_or(0);

    BulkItemResult {
        id,
        status,
        error: item.get("error").map(describe_error),
    }
}

fn describe_error(error: &Value) -> String {
    match error {
        Value::String(reason) => reason.clone(),
        Value::Object(fields) => {
            let kind = fields.get("type").and_then(Value::as_str);
            let reason = fields.get("reason").and_then(Value::as_str);
            match (kind, reason) {
                (Some(kind), Some(reason)) => format!("{}: {}", kind, reason),
                (Some(only), None) | (None, Some(only)) => only.to_string(),
                (None, None) => error.to_string(),
            }
        }
        other => other.to_string(),
    }
}

//! Index settings and mappings for the event index.

use serde_json::{json, Value};

/// Default name of the event index.
pub const DEFAULT_INDEX_NAME: &str = "waze_events";

/// Get the field mappings for the event index.
///
/// - **keyword**: identifiers and categories used for filters and aggregations
/// - **geo_point**: the combined `location` field
/// - **date**: event and scrape timestamps
/// - **text** with the `spanish` analyzer: the free-text description
pub fn get_index_mappings() -> Value {
    json!({
        "properties": {
            "id_original": { "type": "keyword" },
            "tipo_waze_original": { "type": "keyword" },
            "location": { "type": "geo_point" },
            "timestamp_evento": { "type": "date" },
            "timestamp_scrape": { "type": "date" },
            "tipo_incidente_general": { "type": "keyword" },
            "subtipo_incidente": { "type": "keyword" },
            "descripcion": { "type": "text", "analyzer": "spanish" },
            "confianza": { "type": "integer" },
            "fiabilidad": { "type": "integer" },
            "comuna": { "type": "keyword" },
            "velocidad_kmh": { "type": "float" },
            "retraso_segundos": { "type": "integer" },
            "dia_semana_evento": { "type": "integer" },
            "hora_dia_evento": { "type": "integer" }
        }
    })
}

/// Get the index creation body for the event index.
pub fn get_index_settings() -> Value {
    json!({ "mappings": get_index_mappings() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_settings_structure() {
        let settings = get_index_settings();
        let properties = settings["mappings"]["properties"]
            .as_object()
            .expect("properties object");

        assert_eq!(properties.len(), 15);
        assert_eq!(properties["location"]["type"], "geo_point");
        assert_eq!(properties["descripcion"]["type"], "text");
        assert_eq!(properties["descripcion"]["analyzer"], "spanish");
        assert_eq!(properties["velocidad_kmh"]["type"], "float");
        assert_eq!(properties["timestamp_evento"]["type"], "date");
        assert_eq!(properties["timestamp_scrape"]["type"], "date");
    }

    #[test]
    fn test_keyword_and_integer_fields() {
        let mappings = get_index_mappings();
        for field in [
            "id_original",
            "tipo_waze_original",
            "tipo_incidente_general",
            "subtipo_incidente",
            "comuna",
        ] {
            assert_eq!(mappings["properties"][field]["type"], "keyword", "{}", field);
        }
        for field in [
            "confianza",
            "fiabilidad",
            "retraso_segundos",
            "dia_semana_evento",
            "hora_dia_evento",
        ] {
            assert_eq!(mappings["properties"][field]["type"], "integer", "{}", field);
        }
    }

    #[test]
    fn test_index_name() {
        assert_eq!(DEFAULT_INDEX_NAME, "waze_events");
    }
}

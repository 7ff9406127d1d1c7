//! Field names with special meaning during the transform.

/// Store-assigned identifier of a source document.
pub const STORE_ID: &str = "_id";

/// Identifier declared by the upstream scraper. Preferred over [`STORE_ID`].
pub const ID_ORIGINAL: &str = "id_original";

/// Source latitude field.
pub const LATITUDE: &str = "latitud";

/// Source longitude field.
pub const LONGITUDE: &str = "longitud";

/// Combined geo point field written to the index.
pub const LOCATION: &str = "location";

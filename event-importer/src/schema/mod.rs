//! Destination index initialization.

use event_importer_repository::opensearch::get_index_settings;
use event_importer_repository::SearchIndexProvider;
use tracing::{error, info, instrument};

use crate::errors::IngestError;

/// Make sure the destination index exists, creating it with the event
/// mapping if it does not.
///
/// An existing index is left untouched, whatever its mapping.
///
/// # Returns
///
/// * `Ok(())` - If the index exists or was created
/// * `Err(IngestError::SchemaError)` - If the check or the creation failed
#[instrument(skip(provider))]
pub async fn ensure_index(provider: &dyn SearchIndexProvider, index: &str) -> Result<(), IngestError> {
    let exists = provider.index_exists(index).await.map_err(|e| {
        error!(index = %index, error = %e, "Failed to check whether the index exists");
        IngestError::schema(format!("Failed to check index '{}': {}", index, e))
    })?;

    if exists {
        info!(index = %index, "Index already exists, it will not be created again");
        return Ok(());
    }

    info!(index = %index, "Creating index with event mapping");
    provider
        .create_index(index, &get_index_settings())
        .await
        .map_err(|e| {
            error!(index = %index, error = %e, "Failed to create index");
            IngestError::schema(format!("Failed to create index '{}': {}", index, e))
        })
}

//! Source store trait definition.

use async_trait::async_trait;
use event_importer_shared::SourceRecord;
use futures::stream::BoxStream;

use crate::errors::SourceStoreError;

/// Forward-only stream of records read from the source collection.
pub type RecordStream = BoxStream<'static, Result<SourceRecord, SourceStoreError>>;

/// Abstracts the collection records are migrated from.
///
/// A store handle is connected when constructed; `close` releases it and must
/// be called exactly once by the owner when it is done with the store.
#[async_trait]
pub trait SourceStore: Send + Sync {
    /// Run the store's health check.
    async fn ping(&self) -> Result<(), SourceStoreError>;

    /// Count the records in the collection.
    async fn count_records(&self) -> Result<u64, SourceStoreError>;

    /// Open a cursor over every record in the collection.
    ///
    /// The stream is lazy: records are fetched from the store as it is polled.
    async fn stream_records(&self) -> Result<RecordStream, SourceStoreError>;

    /// Release the connection to the store.
    async fn close(&self);
}

//! MongoDB source store.

use async_trait::async_trait;
use bson::{doc, Document};
use futures::StreamExt;
use mongodb::{
    options::{ClientOptions, FindOptions},
    Client, Collection,
};
use tracing::{debug, info};

use crate::config::SourceStoreConfig;
use crate::errors::SourceStoreError;
use crate::interfaces::{RecordStream, SourceStore};
use crate::mongo::convert::document_to_record;

/// Application name reported to the MongoDB server.
const APP_NAME: &str = "event-importer";

/// Source store backed by a MongoDB collection.
pub struct MongoSourceStore {
    client: Client,
    collection: Collection<Document>,
}

impl MongoSourceStore {
    /// Create a client for the configured collection.
    ///
    /// The driver connects lazily, so this does not prove the server is up;
    /// use [`MongoSourceStore::connect`] for that.
    pub async fn new(config: &SourceStoreConfig) -> Result<Self, SourceStoreError> {
        let mut options = ClientOptions::parse(config.uri())
            .await
            .map_err(|e| SourceStoreError::connection(e.to_string()))?;
        options.server_selection_timeout = Some(config.server_selection_timeout);
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options)
            .map_err(|e| SourceStoreError::connection(e.to_string()))?;
        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.collection);

        debug!(
            uri = %config.uri(),
            database = %config.database,
            collection = %config.collection,
            "Created MongoDB client"
        );

        Ok(Self { client, collection })
    }

    /// Create a client and run the `ping` health check.
    ///
    /// The client is shut down again if the health check fails.
    pub async fn connect(config: &SourceStoreConfig) -> Result<Self, SourceStoreError> {
        let store = Self::new(config).await?;
        if let Err(e) = store.ping().await {
            store.close().await;
            return Err(e);
        }

        info!(uri = %config.uri(), "Connected to MongoDB");
        Ok(store)
    }
}

#[async_trait]
impl SourceStore for MongoSourceStore {
    async fn ping(&self) -> Result<(), SourceStoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| SourceStoreError::connection(e.to_string()))?;
        Ok(())
    }

    async fn count_records(&self) -> Result<u64, SourceStoreError> {
        self.collection
            .count_documents(doc! {}, None)
            .await
            .map_err(|e| SourceStoreError::query(e.to_string()))
    }

    /// Open a cursor over the whole collection.
    ///
    /// The cursor is opened with `no_cursor_timeout` so a slow load cannot
    /// lose it server side halfway through.
    async fn stream_records(&self) -> Result<RecordStream, SourceStoreError> {
        let options = FindOptions::builder().no_cursor_timeout(true).build();
        let cursor = self.collection.find(doc! {}, options).await?;

        Ok(cursor
            .map(|result| match result {
                Ok(doc) => document_to_record(doc),
                Err(e) => Err(SourceStoreError::cursor(e.to_string())),
            })
            .boxed())
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        debug!("MongoDB client shut down");
    }
}

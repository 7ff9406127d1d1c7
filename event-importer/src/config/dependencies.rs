//! Dependency initialization and wiring for the importer.

use std::future::Future;
use std::sync::Arc;

use event_importer_repository::{
    MongoSourceStore, OpenSearchProvider, SearchIndexProvider, SourceStore,
};
use tracing::{error, info};

use super::ImporterConfig;
use crate::loader::BulkLoader;
use crate::orchestrator::Orchestrator;
use crate::prober::{ProbeError, Prober};
use crate::processor::RecordProcessor;
use crate::schema::ensure_index;
use crate::IndexingError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Connect to both stores and prepare the destination index.
    ///
    /// The source store is probed first, then the search cluster. Each probe
    /// follows its own retry policy from `config`.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError::ConnectionError)` - If a store stayed unreachable
    /// * `Err(IndexingError::IngestError)` - If the destination index could not be prepared
    pub async fn new(config: &ImporterConfig) -> Result<Self, IndexingError> {
        info!(
            source_uri = %config.source.uri(),
            database = %config.source.database,
            collection = %config.source.collection,
            search_url = %config.search.url(),
            index = %config.index_name,
            "Initializing dependencies"
        );

        let source_config = &config.source;
        let search_config = &config.search;
        let source_prober = Prober::new("MongoDB", config.source_probe);
        let search_prober = Prober::new("Search cluster", config.search_probe);

        Self::assemble(
            config,
            source_prober.probe(move || async move {
                MongoSourceStore::connect(source_config)
                    .await
                    .map(|store| Box::new(store) as Box<dyn SourceStore>)
            }),
            search_prober.probe(move || async move {
                OpenSearchProvider::connect(search_config)
                    .await
                    .map(|provider| Arc::new(provider) as Arc<dyn SearchIndexProvider>)
            }),
        )
        .await
    }

    /// Wire the import from two pending connections.
    ///
    /// `connect_source` is awaited before `connect_search`. Once the source
    /// is connected it is closed again on every failure path, since no
    /// orchestrator will exist to close it.
    pub async fn assemble<SF, DF>(
        config: &ImporterConfig,
        connect_source: SF,
        connect_search: DF,
    ) -> Result<Self, IndexingError>
    where
        SF: Future<Output = Result<Box<dyn SourceStore>, ProbeError>>,
        DF: Future<Output = Result<Arc<dyn SearchIndexProvider>, ProbeError>>,
    {
        let source = connect_source.await.map_err(|e| {
            error!(error = %e, "Source store unavailable");
            IndexingError::connection(e.to_string())
        })?;
        info!("Source store connection established");

        let search = match connect_search.await {
            Ok(search) => search,
            Err(e) => {
                error!(error = %e, "Search cluster unavailable");
                source.close().await;
                return Err(IndexingError::connection(e.to_string()));
            }
        };
        info!("Search cluster connection established");

        if let Err(e) = ensure_index(search.as_ref(), &config.index_name).await {
            source.close().await;
            return Err(e.into());
        }

        let processor = RecordProcessor::new(config.index_name.clone());
        let loader = BulkLoader::with_config(search, config.loader.clone());
        let orchestrator = Orchestrator::new(source, processor, loader);

        Ok(Self { orchestrator })
    }
}

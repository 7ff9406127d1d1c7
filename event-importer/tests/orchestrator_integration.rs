//! Integration tests for the import orchestrator.
//!
//! These tests use the real Orchestrator, RecordProcessor and BulkLoader but
//! mock both stores (SourceStore and SearchIndexProvider).

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use serde_json::{json, Map, Value};
use tokio::time::timeout;

use event_importer::errors::IngestError;
use event_importer::loader::{BulkLoader, LoaderConfig};
use event_importer::orchestrator::{ImportOutcome, Orchestrator};
use event_importer::prober::ProbeError;
use event_importer::processor::RecordProcessor;
use event_importer::{Dependencies, ImporterConfig, IndexingError};
use event_importer_repository::{
    BulkItemResult, BulkSummary, RecordStream, SearchIndexError, SearchIndexProvider, SourceStore,
    SourceStoreError,
};
use event_importer_shared::{IndexAction, SourceRecord};

// Mock source store for testing
struct MockSourceStore {
    records: Vec<SourceRecord>,
    fail_count: bool,
    fail_stream_after: Option<usize>,
    closed: Arc<AtomicUsize>,
}

impl MockSourceStore {
    fn new(records: Vec<SourceRecord>) -> Self {
        Self {
            records,
            fail_count: false,
            fail_stream_after: None,
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn close_counter(&self) -> Arc<AtomicUsize> {
        self.closed.clone()
    }
}

#[async_trait]
impl SourceStore for MockSourceStore {
    async fn ping(&self) -> Result<(), SourceStoreError> {
        Ok(())
    }

    async fn count_records(&self) -> Result<u64, SourceStoreError> {
        if self.fail_count {
            return Err(SourceStoreError::query("not authorized on waze_db"));
        }
        Ok(self.records.len() as u64)
    }

    async fn stream_records(&self) -> Result<RecordStream, SourceStoreError> {
        let mut items: Vec<Result<SourceRecord, SourceStoreError>> =
            self.records.iter().cloned().map(Ok).collect();
        if let Some(after) = self.fail_stream_after {
            items.truncate(after);
            items.push(Err(SourceStoreError::cursor("cursor id not found")));
        }
        Ok(stream::iter(items).boxed())
    }

    async fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

// Mock search provider for testing
struct MockSearchProvider {
    index_exists: bool,
    fail_create: bool,
    fail_bulk: bool,
    rejected_ids: HashSet<String>,
    created: Mutex<Vec<String>>,
    indexed: Mutex<Vec<IndexAction>>,
    batches: Mutex<Vec<usize>>,
}

impl MockSearchProvider {
    fn new() -> Self {
        Self {
            index_exists: true,
            fail_create: false,
            fail_bulk: false,
            rejected_ids: HashSet::new(),
            created: Mutex::new(Vec::new()),
            indexed: Mutex::new(Vec::new()),
            batches: Mutex::new(Vec::new()),
        }
    }

    fn indexed(&self) -> Vec<IndexAction> {
        self.indexed.lock().unwrap().clone()
    }

    fn batches(&self) -> Vec<usize> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchIndexProvider for MockSearchProvider {
    async fn ping(&self) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn index_exists(&self, _index: &str) -> Result<bool, SearchIndexError> {
        Ok(self.index_exists)
    }

    async fn create_index(&self, index: &str, _body: &Value) -> Result<(), SearchIndexError> {
        if self.fail_create {
            return Err(SearchIndexError::index_creation("illegal_argument_exception"));
        }
        self.created.lock().unwrap().push(index.to_string());
        Ok(())
    }

    async fn bulk_index(
        &self,
        actions: &[IndexAction],
        _timeout: Duration,
    ) -> Result<BulkSummary, SearchIndexError> {
        if self.fail_bulk {
            return Err(SearchIndexError::bulk_index("request timed out"));
        }
        self.batches.lock().unwrap().push(actions.len());

        let mut items = Vec::with_capacity(actions.len());
        for action in actions {
            if self.rejected_ids.contains(&action.id) {
                items.push(BulkItemResult {
                    id: action.id.clone(),
                    status: 400,
                    error: Some("mapper_parsing_exception: failed to parse".to_string()),
                });
            } else {
                self.indexed.lock().unwrap().push(action.clone());
                items.push(BulkItemResult {
                    id: action.id.clone(),
                    status: 201,
                    error: None,
                });
            }
        }
        Ok(BulkSummary::from_items(actions.len(), items))
    }
}

fn record(store_id: &str, fields: Value) -> SourceRecord {
    let fields: Map<String, Value> = match fields {
        Value::Object(map) => map,
        _ => panic!("record fields must be an object"),
    };
    SourceRecord::new(store_id, fields)
}

fn events(count: usize) -> Vec<SourceRecord> {
    (0..count)
        .map(|i| {
            record(
                &format!("oid-{}", i),
                json!({
                    "id_original": format!("W-{}", i),
                    "latitud": -33.4,
                    "longitud": -70.6,
                    "tipo_incidente_general": "JAM"
                }),
            )
        })
        .collect()
}

/// Helper to create a test orchestrator with mocked stores
fn create_test_orchestrator(
    source: MockSourceStore,
    provider: MockSearchProvider,
    chunk_size: usize,
) -> (Orchestrator, Arc<MockSearchProvider>, Arc<AtomicUsize>) {
    let closed = source.close_counter();
    let provider = Arc::new(provider);
    let loader = BulkLoader::with_config(
        provider.clone(),
        LoaderConfig {
            chunk_size,
            ..LoaderConfig::default()
        },
    );
    let orchestrator = Orchestrator::new(
        Box::new(source),
        RecordProcessor::new("waze_events"),
        loader,
    );

    (orchestrator, provider, closed)
}

async fn run(orchestrator: Orchestrator) -> ImportOutcome {
    timeout(Duration::from_secs(5), orchestrator.run())
        .await
        .expect("import should not hang")
}

#[tokio::test]
async fn test_reference_record_through_pipeline() {
    let source = MockSourceStore::new(vec![record(
        "x1",
        json!({
            "id_original": "W-42",
            "latitud": -33.45,
            "longitud": -70.66,
            "tipo_incidente_general": "ACCIDENT"
        }),
    )]);
    let (orchestrator, provider, closed) =
        create_test_orchestrator(source, MockSearchProvider::new(), 1000);

    let outcome = run(orchestrator).await;

    assert!(matches!(outcome, ImportOutcome::Completed(report) if report.succeeded == 1));
    assert_eq!(closed.load(Ordering::SeqCst), 1);

    let indexed = provider.indexed();
    assert_eq!(indexed.len(), 1);
    assert_eq!(
        serde_json::to_value(&indexed[0]).unwrap(),
        json!({
            "_index": "waze_events",
            "_id": "W-42",
            "_source": {
                "id_original": "W-42",
                "tipo_incidente_general": "ACCIDENT",
                "location": { "lat": -33.45, "lon": -70.66 }
            }
        })
    );
}

#[tokio::test]
async fn test_full_import_in_batches() {
    let source = MockSourceStore::new(events(2500));
    let (orchestrator, provider, closed) =
        create_test_orchestrator(source, MockSearchProvider::new(), 1000);

    let outcome = run(orchestrator).await;

    match outcome {
        ImportOutcome::Completed(report) => {
            assert_eq!(report.submitted, 2500);
            assert_eq!(report.succeeded, 2500);
            assert_eq!(report.failed, 0);
            assert_eq!(report.batches, 3);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(provider.batches(), vec![1000, 1000, 500]);
    assert_eq!(closed.load(Ordering::SeqCst), 1);

    let ids: HashSet<String> = provider.indexed().into_iter().map(|a| a.id).collect();
    assert_eq!(ids.len(), 2500);
    assert!(ids.contains("W-0") && ids.contains("W-2499"));
}

#[tokio::test]
async fn test_store_id_used_without_id_original() {
    let source = MockSourceStore::new(vec![
        record("665f1c2e9b1e8a3d4c2b1a00", json!({ "comuna": "Maipú" })),
        record("665f1c2e9b1e8a3d4c2b1a01", json!({ "id_original": null })),
    ]);
    let (orchestrator, provider, _closed) =
        create_test_orchestrator(source, MockSearchProvider::new(), 1000);

    run(orchestrator).await;

    let ids: Vec<String> = provider.indexed().into_iter().map(|a| a.id).collect();
    assert_eq!(
        ids,
        vec!["665f1c2e9b1e8a3d4c2b1a00", "665f1c2e9b1e8a3d4c2b1a01"]
    );
}

#[tokio::test]
async fn test_empty_source_sends_nothing() {
    let (orchestrator, provider, closed) =
        create_test_orchestrator(MockSourceStore::new(vec![]), MockSearchProvider::new(), 1000);

    let outcome = run(orchestrator).await;

    assert!(matches!(outcome, ImportOutcome::SourceEmpty));
    assert!(provider.batches().is_empty());
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_partial_failures_are_counted() {
    let provider = MockSearchProvider {
        rejected_ids: ["W-3", "W-7", "W-8"].iter().map(|s| s.to_string()).collect(),
        ..MockSearchProvider::new()
    };
    let (orchestrator, provider, closed) =
        create_test_orchestrator(MockSourceStore::new(events(10)), provider, 4);

    let outcome = run(orchestrator).await;

    match outcome {
        ImportOutcome::Completed(report) => {
            assert_eq!(report.succeeded, 7);
            assert_eq!(report.failed, 3);
            assert_eq!(report.batches, 3);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(provider.indexed().len(), 7);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_bulk_error_fails_and_closes_source() {
    let provider = MockSearchProvider {
        fail_bulk: true,
        ..MockSearchProvider::new()
    };
    let (orchestrator, _provider, closed) =
        create_test_orchestrator(MockSourceStore::new(events(3)), provider, 1000);

    let outcome = run(orchestrator).await;

    assert!(matches!(
        outcome,
        ImportOutcome::Failed(IngestError::LoaderError(_))
    ));
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cursor_error_fails_and_closes_source() {
    let source = MockSourceStore {
        fail_stream_after: Some(5),
        ..MockSourceStore::new(events(10))
    };
    let (orchestrator, provider, closed) =
        create_test_orchestrator(source, MockSearchProvider::new(), 2);

    let outcome = run(orchestrator).await;

    assert!(matches!(
        outcome,
        ImportOutcome::Failed(IngestError::SourceError(_))
    ));
    // batches flushed before the cursor failed stay indexed
    assert_eq!(provider.batches(), vec![2, 2]);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_count_error_fails_and_closes_source() {
    let source = MockSourceStore {
        fail_count: true,
        ..MockSourceStore::new(events(3))
    };
    let (orchestrator, provider, closed) =
        create_test_orchestrator(source, MockSearchProvider::new(), 1000);

    let outcome = run(orchestrator).await;

    assert!(matches!(outcome, ImportOutcome::Failed(_)));
    assert!(provider.batches().is_empty());
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

fn connected_source(
    store: MockSourceStore,
) -> impl std::future::Future<Output = Result<Box<dyn SourceStore>, ProbeError>> {
    async move { Ok(Box::new(store) as Box<dyn SourceStore>) }
}

fn connected_search(
    provider: Arc<MockSearchProvider>,
) -> impl std::future::Future<Output = Result<Arc<dyn SearchIndexProvider>, ProbeError>> {
    async move { Ok(provider as Arc<dyn SearchIndexProvider>) }
}

fn unreachable(target: &str, attempts: u32) -> ProbeError {
    ProbeError::Exhausted {
        target: target.to_string(),
        attempts,
        last_error: "connection refused".to_string(),
    }
}

#[tokio::test]
async fn test_assemble_creates_missing_index_and_runs() {
    let config = ImporterConfig::default();
    let source = MockSourceStore::new(events(3));
    let closed = source.close_counter();
    let provider = Arc::new(MockSearchProvider {
        index_exists: false,
        ..MockSearchProvider::new()
    });

    let deps = Dependencies::assemble(
        &config,
        connected_source(source),
        connected_search(provider.clone()),
    )
    .await
    .unwrap();

    assert_eq!(*provider.created.lock().unwrap(), vec!["waze_events"]);
    assert_eq!(closed.load(Ordering::SeqCst), 0);

    let outcome = run(deps.orchestrator).await;
    assert_eq!(outcome.label(), "completed");
    assert_eq!(provider.indexed().len(), 3);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_assemble_source_unreachable() {
    let config = ImporterConfig::default();
    let provider = Arc::new(MockSearchProvider::new());

    let result = Dependencies::assemble(
        &config,
        async { Err::<Box<dyn SourceStore>, _>(unreachable("MongoDB", 10)) },
        connected_search(provider.clone()),
    )
    .await;

    assert!(matches!(result, Err(IndexingError::ConnectionError(_))));
    assert!(provider.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_assemble_search_unreachable_closes_source() {
    let config = ImporterConfig::default();
    let source = MockSourceStore::new(events(3));
    let closed = source.close_counter();

    let result = Dependencies::assemble(&config, connected_source(source), async {
        Err::<Arc<dyn SearchIndexProvider>, _>(unreachable("Search cluster", 15))
    })
    .await;

    assert!(matches!(result, Err(IndexingError::ConnectionError(_))));
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_assemble_schema_failure_closes_source() {
    let config = ImporterConfig::default();
    let source = MockSourceStore::new(events(3));
    let closed = source.close_counter();
    let provider = Arc::new(MockSearchProvider {
        index_exists: false,
        fail_create: true,
        ..MockSearchProvider::new()
    });

    let result =
        Dependencies::assemble(&config, connected_source(source), connected_search(provider)).await;

    assert!(matches!(
        result,
        Err(IndexingError::IngestError(IngestError::SchemaError(_)))
    ));
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

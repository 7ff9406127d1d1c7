//! Configuration and dependency initialization for the importer.
//!
//! Every setting comes from the environment (optionally seeded from a `.env`
//! file) and falls back to a default when unset. Values that do not parse
//! are logged and replaced by their default.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::str::FromStr;
use std::time::Duration;

use event_importer_repository::opensearch::DEFAULT_INDEX_NAME;
use event_importer_repository::{SearchIndexConfig, SourceStoreConfig};
use tracing::warn;

use crate::loader::{LoaderConfig, DEFAULT_CHUNK_SIZE, DEFAULT_REQUEST_TIMEOUT};
use crate::prober::RetryPolicy;

const DEFAULT_MONGO_HOST: &str = "localhost";
const DEFAULT_MONGO_PORT: u16 = 27017;
const DEFAULT_MONGO_DB: &str = "waze_db";
const DEFAULT_MONGO_COLLECTION: &str = "eventos_homogeneizados";
const DEFAULT_MONGO_PROBE_ATTEMPTS: u32 = 10;
const DEFAULT_MONGO_PROBE_DELAY_SECS: u64 = 5;

const DEFAULT_ELASTIC_HOST: &str = "localhost";
const DEFAULT_ELASTIC_PORT: u16 = 9200;
const DEFAULT_ELASTIC_PROBE_ATTEMPTS: u32 = 15;
const DEFAULT_ELASTIC_PROBE_DELAY_SECS: u64 = 10;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable console output.
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Read the format from `LOG_FORMAT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the format through `lookup`.
    ///
    /// Valid values: "pretty" or "json" (case-insensitive).
    /// Defaults to "pretty" if not set or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup("LOG_FORMAT")
            .unwrap_or_else(|| "pretty".to_string())
            .trim()
            .to_lowercase()
            .as_str()
        {
            "json" => Self::Json,
            // tracing is not initialized yet, unknown values are not reported
            _ => Self::Pretty,
        }
    }
}

/// Settings for one import run.
#[derive(Debug, Clone, PartialEq)]
pub struct ImporterConfig {
    /// Source collection settings.
    pub source: SourceStoreConfig,
    /// Destination cluster settings.
    pub search: SearchIndexConfig,
    /// Destination index name.
    pub index_name: String,
    /// Retry budget for reaching the source store.
    pub source_probe: RetryPolicy,
    /// Retry budget for reaching the search cluster.
    pub search_probe: RetryPolicy,
    /// Bulk loader settings.
    pub loader: LoaderConfig,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ImporterConfig {
    /// Load the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MONGO_HOST`: Source host (default: localhost)
    /// - `MONGO_PORT`: Source port (default: 27017)
    /// - `MONGO_DB`: Source database (default: waze_db)
    /// - `MONGO_COLLECTION`: Source collection (default: eventos_homogeneizados)
    /// - `MONGO_PROBE_ATTEMPTS`: Source connection attempts (default: 10)
    /// - `MONGO_PROBE_DELAY_SECS`: Wait between source attempts (default: 5)
    /// - `ELASTIC_HOST`: Search cluster host (default: localhost)
    /// - `ELASTIC_PORT`: Search cluster port (default: 9200)
    /// - `ELASTIC_INDEX`: Destination index (default: waze_events)
    /// - `ELASTIC_PROBE_ATTEMPTS`: Search cluster connection attempts (default: 15)
    /// - `ELASTIC_PROBE_DELAY_SECS`: Wait between search cluster attempts (default: 10)
    /// - `BULK_CHUNK_SIZE`: Documents per bulk request (default: 1000)
    /// - `BULK_REQUEST_TIMEOUT_SECS`: Timeout per bulk request, at least 1 (default: 60)
    /// - `BULK_REPORT_FAILURES`: Log every rejected document (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let source = SourceStoreConfig::new(
            text("MONGO_HOST", DEFAULT_MONGO_HOST),
            parse_or(&lookup, "MONGO_PORT", DEFAULT_MONGO_PORT),
            text("MONGO_DB", DEFAULT_MONGO_DB),
            text("MONGO_COLLECTION", DEFAULT_MONGO_COLLECTION),
        );

        let search = SearchIndexConfig::new(
            text("ELASTIC_HOST", DEFAULT_ELASTIC_HOST),
            parse_or(&lookup, "ELASTIC_PORT", DEFAULT_ELASTIC_PORT),
        );

        let source_probe = RetryPolicy::new(
            parse_or(&lookup, "MONGO_PROBE_ATTEMPTS", DEFAULT_MONGO_PROBE_ATTEMPTS).max(1),
            Duration::from_secs(parse_or(
                &lookup,
                "MONGO_PROBE_DELAY_SECS",
                DEFAULT_MONGO_PROBE_DELAY_SECS,
            )),
        );
        let search_probe = RetryPolicy::new(
            parse_or(&lookup, "ELASTIC_PROBE_ATTEMPTS", DEFAULT_ELASTIC_PROBE_ATTEMPTS).max(1),
            Duration::from_secs(parse_or(
                &lookup,
                "ELASTIC_PROBE_DELAY_SECS",
                DEFAULT_ELASTIC_PROBE_DELAY_SECS,
            )),
        );

        let loader = LoaderConfig {
            chunk_size: parse_or(&lookup, "BULK_CHUNK_SIZE", DEFAULT_CHUNK_SIZE).max(1),
            request_timeout: Duration::from_secs(
                parse_or(
                    &lookup,
                    "BULK_REQUEST_TIMEOUT_SECS",
                    DEFAULT_REQUEST_TIMEOUT.as_secs(),
                )
                .max(1),
            ),
            report_failures: parse_flag(&lookup, "BULK_REPORT_FAILURES"),
        };

        Self {
            source,
            search,
            index_name: text("ELASTIC_INDEX", DEFAULT_INDEX_NAME),
            source_probe,
            search_probe,
            loader,
        }
    }
}

/// Parse `key`, falling back to `default` when unset or malformed.
fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key = key, value = %raw, default = %default, "Invalid value, using default");
            default
        }),
        _ => default,
    }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    match lookup(key).map(|v| v.trim().to_lowercase()) {
        None => false,
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" | "" => false,
            _ => {
                warn!(key = key, value = %v, "Invalid flag, using false");
                false
            }
        },
    }
}

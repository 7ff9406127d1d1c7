//! Connection settings for the source store and the search index.

use std::time::Duration;

/// Default server selection timeout for a single source connection attempt.
pub const DEFAULT_SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(2);

/// Connection settings for the MongoDB source collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStoreConfig {
    /// Hostname of the MongoDB server.
    pub host: String,
    /// Port of the MongoDB server.
    pub port: u16,
    /// Database holding the collection.
    pub database: String,
    /// Collection records are read from.
    pub collection: String,
    /// How long one connection attempt waits for a usable server.
    pub server_selection_timeout: Duration,
}

impl SourceStoreConfig {
    /// Create settings with the default server selection timeout.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            collection: collection.into(),
            server_selection_timeout: DEFAULT_SERVER_SELECTION_TIMEOUT,
        }
    }

    /// Connection URI (`mongodb://host:port`).
    pub fn uri(&self) -> String {
        format!("mongodb://{}:{}", self.host, self.port)
    }
}

/// Connection settings for the destination search index.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchIndexConfig {
    /// Hostname of the search cluster.
    pub host: String,
    /// HTTP port of the search cluster.
    pub port: u16,
}

impl SearchIndexConfig {
    /// Create new search index settings.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Plain HTTP URL of the cluster (`http://host:port`).
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

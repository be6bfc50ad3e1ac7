//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::metrics::{OperationStats, StatsSnapshot};

/// Response body for the GET operation (GET /get/:key)
///
/// A miss is reported with `found: false` and an empty value.
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value, empty on a miss
    pub value: String,
    /// Whether a live entry was found
    pub found: bool,
}

impl GetResponse {
    /// Builds a response from an engine lookup
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            found: value.is_some(),
            value: value.unwrap_or_default(),
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    pub success: bool,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            success: true,
            key: key.into(),
        }
    }
}

/// Response body for DELETE /del/:key and POST /expire/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// The key that was removed
    pub key: String,
    /// Whether a live entry existed before the call
    pub existed: bool,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>, existed: bool) -> Self {
        Self {
            key: key.into(),
            existed,
        }
    }
}

/// Response body for the SEARCH operation (POST /search)
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    /// Matching live keys, in no particular order
    pub keys: Vec<String>,
}

/// Response body for the RESET operation (POST /reset)
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    /// Number of entries that were present before the reset
    pub keys_cleared: usize,
}

impl ResetResponse {
    pub fn new(keys_cleared: usize) -> Self {
        Self {
            success: true,
            keys_cleared,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Per-operation counters
    pub operations: Vec<OperationStats>,
    /// Total time spent waiting for the shared lock, in microseconds
    pub read_wait_micros: u64,
    /// Total time spent waiting for the exclusive lock, in microseconds
    pub write_wait_micros: u64,
    /// Entry count at the last size report
    pub item_count: u64,
    /// Estimated key and value bytes at the last size report
    pub memory_bytes: u64,
    /// Hit rate of get calls (hits / gets)
    pub hit_rate: f64,
}

impl From<StatsSnapshot> for StatsResponse {
    fn from(snapshot: StatsSnapshot) -> Self {
        let hit_rate = snapshot.hit_rate();
        Self {
            operations: snapshot.operations,
            read_wait_micros: snapshot.read_wait_micros,
            write_wait_micros: snapshot.write_wait_micros,
            item_count: snapshot.item_count,
            memory_bytes: snapshot.memory_bytes,
            hit_rate,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

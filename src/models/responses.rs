//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The cached value
    pub value: Value,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for the keys listing (GET /keys)
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    /// Non-expired keys, sorted
    pub keys: Vec<String>,
    /// Number of keys
    pub count: usize,
}

impl KeysResponse {
    /// Creates a new KeysResponse, sorting the keys for stable output
    pub fn new(mut keys: Vec<String>) -> Self {
        keys.sort();
        Self {
            count: keys.len(),
            keys,
        }
    }
}

/// Response body for the membership check (GET /contains/:key)
#[derive(Debug, Clone, Serialize)]
pub struct ContainsResponse {
    pub key: String,
    pub exists: bool,
}

impl ContainsResponse {
    pub fn new(key: impl Into<String>, exists: bool) -> Self {
        Self {
            key: key.into(),
            exists,
        }
    }
}

/// Response body for the FLUSH operation (POST /flush)
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    /// Success message
    pub message: String,
    /// Number of store records removed
    pub removed: usize,
}

impl FlushResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Flushed {} entries", removed),
            removed,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Lookups served from the memo
    pub memo_hits: u64,
    /// Lookups served from the store
    pub store_hits: u64,
    /// Lookups that missed
    pub misses: u64,
    /// Corrupt records purged
    pub corrupt_purges: u64,
    /// Expired entries dropped
    pub expirations: u64,
    /// Current number of memo entries
    pub memo_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            memo_hits: stats.memo_hits,
            store_hits: stats.store_hits,
            misses: stats.misses,
            corrupt_purges: stats.corrupt_purges,
            expirations: stats.expirations,
            memo_entries: stats.memo_entries,
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

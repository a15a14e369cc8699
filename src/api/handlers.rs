//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::cache::Cache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    ContainsResponse, DeleteResponse, FlushResponse, GetResponse, HealthResponse, KeysResponse,
    SetRequest, SetResponse, StatsResponse,
};
use crate::store::MongoStore;

/// Application state shared across all handlers.
///
/// Every cache operation may touch the memo, so handlers take the write
/// lock; only stats reads share the lock.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache engine
    pub cache: Arc<RwLock<Cache>>,
}

impl AppState {
    /// Creates a new AppState with the given cache.
    pub fn new(cache: Cache) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Connects to the configured MongoDB collection and builds the cache
    /// over it. Fails with `StoreUnavailable` if the server cannot be reached.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = MongoStore::connect(
            &config.connection,
            Duration::from_secs(config.store_timeout),
        )
        .await?;
        Ok(Self::new(Cache::new(Arc::new(store), config.timeout)?))
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut cache = state.cache.write().await;
    cache.set(&req.key, req.value).await?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let mut cache = state.cache.write().await;
    let value = cache.get(&key).await?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let mut cache = state.cache.write().await;
    cache.delete(&key).await?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /keys
pub async fn keys_handler(State(state): State<AppState>) -> Result<Json<KeysResponse>> {
    let mut cache = state.cache.write().await;
    let keys = cache.keys().await?;

    Ok(Json(KeysResponse::new(keys)))
}

/// Handler for GET /contains/:key
pub async fn contains_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ContainsResponse>> {
    let mut cache = state.cache.write().await;
    let exists = cache.contains(&key).await?;

    Ok(Json(ContainsResponse::new(key, exists)))
}

/// Handler for POST /flush
pub async fn flush_handler(State(state): State<AppState>) -> Result<Json<FlushResponse>> {
    let mut cache = state.cache.write().await;
    let removed = cache.flush().await?;

    Ok(Json(FlushResponse::new(removed)))
}

/// Handler for GET /copy
///
/// Returns every non-expired entry as a single JSON object.
pub async fn copy_handler(State(state): State<AppState>) -> Result<Json<HashMap<String, Value>>> {
    let mut cache = state.cache.write().await;
    let snapshot = cache.copy().await?;

    Ok(Json(snapshot))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::from(cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

//! Error types for the document cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine, the store adapters and the HTTP layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key absent, empty or expired
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Stored value could not be decoded; the record has been purged
    #[error(
        "Cache entry '{0}' was corrupt or did not contain valid data. \
         It has been removed, so the operation can be re-run now."
    )]
    CorruptCache(String),

    /// Transport-level failure talking to the backing store
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Value could not be encoded for storage
    #[error("Codec error: {0}")]
    Codec(String),
}

impl CacheError {
    /// Returns true for errors a caller should treat as a plain cache miss.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::KeyNotFound(_) | CacheError::CorruptCache(_))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::KeyNotFound(_) => StatusCode::NOT_FOUND,
            CacheError::CorruptCache(_) => StatusCode::CONFLICT,
            CacheError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::InvalidRequest(_) | CacheError::Codec(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

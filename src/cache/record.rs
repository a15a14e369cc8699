//! Cache Record Module
//!
//! Defines the persisted unit stored in the document collection.

use chrono::Utc;
use serde::{Deserialize, Serialize};

// == Cache Record ==
/// A single document in the backing collection.
///
/// Serialized as `{ "key": .., "value": .., "time": .. }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Unique, non-empty key
    pub key: String,
    /// Encoded value; foreign writers may leave it null
    pub value: Option<String>,
    /// Write timestamp (Unix epoch seconds)
    pub time: f64,
}

impl CacheRecord {
    // == Constructor ==
    /// Creates a record stamped with the current time.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::at(key, Some(value.into()), current_timestamp())
    }

    /// Creates a record with an explicit timestamp.
    pub fn at(key: impl Into<String>, value: Option<String>, time: f64) -> Self {
        Self {
            key: key.into(),
            value,
            time,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in fractional seconds.
pub fn current_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

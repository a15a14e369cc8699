//! Document Store Module
//!
//! Capability surface the cache needs from its backing document collection,
//! with a MongoDB backend and an in-process collection for tests and
//! embedding.

mod memory;
mod mongo;

use async_trait::async_trait;

use crate::cache::CacheRecord;
use crate::error::Result;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Minimal document collection operations.
///
/// Implementations report transport failures as
/// [`CacheError::StoreUnavailable`](crate::error::CacheError::StoreUnavailable).
/// Records are matched on their `key` field and there is at most one record
/// per key.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Looks up the record stored under `key`.
    async fn find_by_key(&self, key: &str) -> Result<Option<CacheRecord>>;

    /// Inserts the record, or replaces the existing record with the same key.
    async fn upsert(&self, record: CacheRecord) -> Result<()>;

    /// Removes the record stored under `key`. Absent keys are not an error.
    async fn delete_by_key(&self, key: &str) -> Result<()>;

    /// Returns every record in the collection.
    ///
    /// Each call performs a fresh scan; order is unspecified.
    async fn scan_all(&self) -> Result<Vec<CacheRecord>>;
}

//! In-process document collection.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::DocumentStore;
use crate::cache::CacheRecord;
use crate::error::Result;

// == Memory Store ==
/// A document collection held in process memory.
///
/// Nothing is persisted and nothing is shared across processes. Share it
/// between cache instances through an `Arc` to model several clients of the
/// same collection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Documents keyed by their `key` field
    records: RwLock<HashMap<String, CacheRecord>>,
}

impl MemoryStore {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored documents.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if the collection holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_by_key(&self, key: &str) -> Result<Option<CacheRecord>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn upsert(&self, record: CacheRecord) -> Result<()> {
        let mut records = self.records.write().await;
        if records.insert(record.key.clone(), record).is_some() {
            debug!("Replaced existing document");
        }
        Ok(())
    }

    async fn delete_by_key(&self, key: &str) -> Result<()> {
        self.records.write().await.remove(key);
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<CacheRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}

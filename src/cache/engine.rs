//! Cache Engine Module
//!
//! Combines the in-process memo with the backing document store and the
//! expiration policy.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{codec, current_timestamp, CacheRecord, CacheStats, ExpirationPolicy};
use crate::config::check_timeout;
use crate::error::{CacheError, Result};
use crate::store::DocumentStore;

// == Cache ==
/// Expiring key-value cache over a document store.
///
/// The memo is consulted first and is never authoritative: the store is the
/// system of record and may be changed by other clients at any time. A memo
/// hit is returned as-is, without checking the store timestamp.
pub struct Cache {
    /// Decoded values of recently set or fetched keys
    memo: HashMap<String, Value>,
    /// Backing collection, held for the cache's whole lifetime
    store: Arc<dyn DocumentStore>,
    /// TTL applied to store timestamps
    policy: ExpirationPolicy,
    /// Lookup statistics
    stats: CacheStats,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache over `store` with an expiration timeout in seconds.
    ///
    /// A timeout of 0 disables expiration. Negative or non-finite timeouts
    /// fail with [`CacheError::Config`].
    pub fn new(store: Arc<dyn DocumentStore>, timeout: f64) -> Result<Self> {
        Ok(Self {
            memo: HashMap::new(),
            store,
            policy: ExpirationPolicy::new(check_timeout(timeout)?),
            stats: CacheStats::new(),
        })
    }

    // == Set ==
    /// Stores `value` under `key` with the current timestamp.
    ///
    /// The store record is replaced if present (one write per call) and the
    /// memo entry is overwritten.
    pub async fn set(&mut self, key: &str, value: Value) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
        }

        let encoded = codec::encode(&value)?;
        self.store.upsert(CacheRecord::new(key, encoded)).await?;

        self.memo.insert(key.to_string(), value);
        self.stats.set_memo_entries(self.memo.len());
        debug!("Cached key '{}'", key);

        Ok(())
    }

    // == Get ==
    /// Retrieves the value for `key`.
    ///
    /// Memo hits skip the store entirely. On a memo miss the store record is
    /// checked for expiry, fetched and decoded; a missing or undecodable
    /// record is purged from both layers.
    pub async fn get(&mut self, key: &str) -> Result<Value> {
        if let Some(value) = self.memo.get(key) {
            self.stats.record_memo_hit();
            return Ok(value.clone());
        }

        if key.is_empty() || self.has_expired(key).await {
            self.stats.record_miss();
            return Err(CacheError::KeyNotFound(key.to_string()));
        }

        let raw = match self.store.find_by_key(key).await?.and_then(|r| r.value) {
            Some(raw) => raw,
            None => {
                self.purge(key).await?;
                self.stats.record_miss();
                return Err(CacheError::KeyNotFound(key.to_string()));
            }
        };

        match codec::decode(&raw) {
            Ok(value) => {
                self.memo.insert(key.to_string(), value.clone());
                self.stats.set_memo_entries(self.memo.len());
                self.stats.record_store_hit();
                Ok(value)
            }
            Err(e) => {
                warn!(
                    "Stored value for '{}' could not be decoded ({}); erasing it",
                    key, e
                );
                self.purge(key).await?;
                self.stats.record_corrupt_purge();
                self.stats.record_miss();
                Err(CacheError::CorruptCache(key.to_string()))
            }
        }
    }

    // == Keys ==
    /// Returns the keys of all non-expired records in the store.
    ///
    /// The memo is not consulted, but memo entries whose record turns out to
    /// be expired are evicted along the way.
    pub async fn keys(&mut self) -> Result<Vec<String>> {
        let now = current_timestamp();
        let records = self.store.scan_all().await?;

        let mut keys = Vec::with_capacity(records.len());
        for record in records {
            if self.policy.is_expired(Some(record.time), now) {
                self.evict_expired(&record.key);
            } else {
                keys.push(record.key);
            }
        }

        Ok(keys)
    }

    // == Contains ==
    /// Checks whether `key` is cached.
    ///
    /// True on a memo hit; otherwise false for expired records, else true iff
    /// the store holds a record for the key.
    pub async fn contains(&mut self, key: &str) -> Result<bool> {
        if self.memo.contains_key(key) {
            return Ok(true);
        }

        if self.has_expired(key).await {
            return Ok(false);
        }

        Ok(self.store.find_by_key(key).await?.is_some())
    }

    // == Has Expired ==
    /// Checks the store record of `key` against the timeout.
    ///
    /// An expired key is also dropped from the memo. A missing record or a
    /// failed lookup counts as not expired.
    pub async fn has_expired(&mut self, key: &str) -> bool {
        if self.policy.is_disabled() {
            return false;
        }

        let record_time = match self.store.find_by_key(key).await {
            Ok(record) => record.map(|r| r.time),
            Err(e) => {
                warn!("Expiry lookup for '{}' failed: {}", key, e);
                None
            }
        };

        if !self.policy.is_expired(record_time, current_timestamp()) {
            return false;
        }

        self.evict_expired(key);
        true
    }

    // == Delete ==
    /// Removes `key` from the memo and the store.
    ///
    /// Succeeds when the key is present in either layer and fails with
    /// [`CacheError::KeyNotFound`] when it is in neither.
    pub async fn delete(&mut self, key: &str) -> Result<()> {
        let in_memo = self.memo.contains_key(key);
        if !in_memo && self.store.find_by_key(key).await?.is_none() {
            return Err(CacheError::KeyNotFound(key.to_string()));
        }

        self.purge(key).await?;
        debug!("Deleted key '{}'", key);
        Ok(())
    }

    // == Flush ==
    /// Clears the memo and deletes every non-expired record from the store.
    ///
    /// Returns the number of records deleted.
    pub async fn flush(&mut self) -> Result<usize> {
        self.memo.clear();
        self.stats.set_memo_entries(0);

        let mut removed = 0;
        for key in self.keys().await? {
            match self.delete(&key).await {
                Ok(()) => removed += 1,
                // Deleted by another client since the scan
                Err(CacheError::KeyNotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        info!("Flushed {} cache entries", removed);
        Ok(removed)
    }

    // == Copy ==
    /// Returns a snapshot of every non-expired entry.
    ///
    /// Performs one lookup per key. Keys that disappear or turn out corrupt
    /// between the scan and the lookup are left out.
    pub async fn copy(&mut self) -> Result<HashMap<String, Value>> {
        let mut snapshot = HashMap::new();
        for key in self.keys().await? {
            match self.get(&key).await {
                Ok(value) => {
                    snapshot.insert(key, value);
                }
                Err(e) if e.is_miss() => debug!("Skipping '{}' in copy: {}", key, e),
                Err(e) => return Err(e),
            }
        }
        Ok(snapshot)
    }

    // == State Export / Import ==
    /// Returns a snapshot of the memo. The store is not read.
    pub fn export_state(&self) -> HashMap<String, Value> {
        self.memo.clone()
    }

    /// Replaces the memo with `state`. The store is not written.
    pub fn import_state(&mut self, state: HashMap<String, Value>) {
        self.memo = state;
        self.stats.set_memo_entries(self.memo.len());
    }

    // == Purge Expired ==
    /// Removes every expired record from the store and the memo.
    ///
    /// Each candidate from the scan is looked up again right before it is
    /// deleted, so a record rewritten by another client after the scan is
    /// kept. A write landing between that lookup and the delete is still
    /// lost.
    ///
    /// Returns the number of records removed.
    pub async fn purge_expired(&mut self) -> Result<usize> {
        if self.policy.is_disabled() {
            return Ok(0);
        }

        let now = current_timestamp();
        let candidates: Vec<String> = self
            .store
            .scan_all()
            .await?
            .into_iter()
            .filter(|record| self.policy.is_expired(Some(record.time), now))
            .map(|record| record.key)
            .collect();

        let mut removed = 0;
        for key in candidates {
            let current = self.store.find_by_key(&key).await?;
            let still_expired = current
                .map(|record| self.policy.is_expired(Some(record.time), current_timestamp()))
                .unwrap_or(false);

            if still_expired {
                self.purge(&key).await?;
                removed += 1;
            } else {
                debug!("Skipping '{}' in sweep: rewritten since scan", key);
            }
        }

        self.stats.record_expirations(removed as u64);
        Ok(removed)
    }

    // == Accessors ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_memo_entries(self.memo.len());
        stats
    }

    /// Returns true if `key` is held in the memo.
    pub fn is_memoized(&self, key: &str) -> bool {
        self.memo.contains_key(key)
    }

    /// Returns the number of memo entries.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Returns the expiration timeout in seconds.
    pub fn timeout(&self) -> f64 {
        self.policy.timeout()
    }

    // == Internal Helpers ==
    /// Drops `key` from both layers without checking presence.
    async fn purge(&mut self, key: &str) -> Result<()> {
        self.memo.remove(key);
        self.stats.set_memo_entries(self.memo.len());
        self.store.delete_by_key(key).await
    }

    fn evict_expired(&mut self, key: &str) {
        if self.memo.remove(key).is_some() {
            self.stats.record_expirations(1);
            self.stats.set_memo_entries(self.memo.len());
            debug!("Evicted expired key '{}' from memo", key);
        }
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("memo_entries", &self.memo.len())
            .field("policy", &self.policy)
            .field("stats", &self.stats)
            .finish()
    }
}

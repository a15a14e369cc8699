//! Cache Statistics Module
//!
//! Tracks where lookups were served from and how often the cache healed itself.

use serde::Serialize;

// == Cache Stats ==
/// Lookup and self-healing counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the memo
    pub memo_hits: u64,
    /// Lookups answered by fetching from the store
    pub store_hits: u64,
    /// Lookups that ended in a miss (absent, empty, expired or corrupt)
    pub misses: u64,
    /// Records removed because their value could not be decoded
    pub corrupt_purges: u64,
    /// Memo entries or store records dropped for being expired
    pub expirations: u64,
    /// Current number of memo entries
    pub memo_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total successful lookups.
    pub fn hits(&self) -> u64 {
        self.memo_hits + self.store_hits
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits() + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }

    pub fn record_memo_hit(&mut self) {
        self.memo_hits += 1;
    }

    pub fn record_store_hit(&mut self) {
        self.store_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_corrupt_purge(&mut self) {
        self.corrupt_purges += 1;
    }

    pub fn record_expirations(&mut self, count: u64) {
        self.expirations += count;
    }

    /// Updates the memo entry count.
    pub fn set_memo_entries(&mut self, count: usize) {
        self.memo_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits(), 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.corrupt_purges, 0);
        assert_eq!(stats.memo_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_counts_both_layers() {
        let mut stats = CacheStats::new();
        stats.record_memo_hit();
        stats.record_store_hit();
        stats.record_miss();
        stats.record_miss();
        assert_eq!(stats.hits(), 2);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_record_expirations() {
        let mut stats = CacheStats::new();
        stats.record_expirations(3);
        stats.record_expirations(1);
        assert_eq!(stats.expirations, 4);
    }
}

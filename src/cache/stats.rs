//! Cache Statistics Module
//!
//! Tracks cache activity: lookups, insertions, evictions, and bytes held.

use serde::Serialize;

// == Cache Stats ==
/// Running counters for a single cache instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of lookups that found their key
    pub hits: u64,
    /// Number of lookups that did not
    pub misses: u64,
    /// Number of new keys stored
    pub insertions: u64,
    /// Number of puts that overwrote an existing key
    pub replacements: u64,
    /// Number of entries evicted due to LRU policy
    pub evictions: u64,
    /// Number of entries removed explicitly
    pub removals: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Current payload bytes held by the cache
    pub total_bytes: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Counts a new entry holding `bytes` of payload.
    pub fn record_insertion(&mut self, bytes: usize) {
        self.insertions += 1;
        self.total_entries += 1;
        self.total_bytes += bytes;
    }

    /// Counts an in-place overwrite from `old_bytes` to `new_bytes`.
    pub fn record_replacement(&mut self, old_bytes: usize, new_bytes: usize) {
        self.replacements += 1;
        self.total_bytes = self.total_bytes - old_bytes + new_bytes;
    }

    pub fn record_eviction(&mut self, bytes: usize) {
        self.evictions += 1;
        self.release(bytes);
    }

    pub fn record_removal(&mut self, bytes: usize) {
        self.removals += 1;
        self.release(bytes);
    }

    fn release(&mut self, bytes: usize) {
        self.total_entries -= 1;
        self.total_bytes -= bytes;
    }
}

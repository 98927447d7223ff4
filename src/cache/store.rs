//! Cache Store Module
//!
//! Main cache engine combining the key index with the recency list.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::cache::entry::copy_payload;
use crate::cache::{
    CacheEvent, CacheObserver, CacheStats, Entry, Index, RecencyList, MAX_KEY_LENGTH,
    MAX_PAYLOAD_SIZE,
};
use crate::error::{CacheError, Result};

// == Put Outcome ==
/// What a successful `put` did to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// A new key was stored without exceeding capacity
    Inserted,
    /// The key already existed and was overwritten in place
    Replaced,
    /// A new key was stored and the least recently used key was evicted
    Evicted { key: String },
}

// == Teardown Report ==
/// Resources released by `LruCache::destroy`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeardownReport {
    pub entries_disposed: usize,
    pub bytes_released: usize,
}

// == LRU Cache ==
/// Fixed-capacity cache with least-recently-used eviction.
///
/// Every entry is linked in the recency list and mapped by the index. The
/// two always hold exactly the same keys, and never more than `max_size`.
///
/// The cache takes `&mut self` for lookups because a hit reorders the list.
/// Callers sharing it across tasks must guard the whole cache with one lock.
pub struct LruCache {
    list: RecencyList,
    index: Index,
    stats: CacheStats,
    max_size: usize,
    observer: Option<Box<dyn CacheObserver>>,
}

impl fmt::Debug for LruCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("max_size", &self.max_size)
            .field("len", &self.list.len())
            .field("stats", &self.stats)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl LruCache {
    // == Constructor ==
    /// Creates an empty cache holding at most `max_size` entries.
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of entries, must be at least 1
    /// * `index_hint` - Initial index capacity, 0 selects the default
    pub fn create(max_size: usize, index_hint: usize) -> Result<Self> {
        if max_size < 1 {
            return Err(CacheError::InvalidCapacity(max_size));
        }
        let index = Index::with_hint(index_hint)?;

        debug!(max_size, index_hint, "cache created");
        Ok(Self {
            list: RecencyList::new(),
            index,
            stats: CacheStats::new(),
            max_size,
            observer: None,
        })
    }

    /// Installs an observer notified of every entry transition.
    pub fn set_observer<O>(&mut self, observer: O)
    where
        O: CacheObserver + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    // == Put ==
    /// Stores a copy of `payload` under `key`.
    ///
    /// An existing key is overwritten in place and promoted without changing
    /// the entry count. A new key is linked at the head; if that pushes the
    /// cache over capacity, exactly one entry is evicted from the tail.
    ///
    /// On error the cache is left unchanged.
    pub fn put(&mut self, key: &str, content_type: &str, payload: &[u8]) -> Result<PutOutcome> {
        validate_key(key)?;
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(CacheError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }

        if let Some(id) = self.index.get(key) {
            let payload = copy_payload(payload)?;
            let new_length = payload.len();
            let old_length = match self.list.get_mut(id) {
                Some(entry) => entry.replace(content_type.to_string(), payload),
                None => {
                    return Err(CacheError::InvariantViolation(format!(
                        "index maps '{}' to an empty slot",
                        key
                    )))
                }
            };
            self.list.move_to_head(id);
            self.stats.record_replacement(old_length, new_length);
            emit(
                &mut self.observer,
                CacheEvent::Replaced {
                    key,
                    old_length,
                    new_length,
                },
            );
            return Ok(PutOutcome::Replaced);
        }

        let entry = Entry::new(key.to_string(), content_type.to_string(), payload)?;
        let length = entry.length();
        let id = self.list.insert_at_head(entry)?;
        if let Err(e) = self.index.put(key, id) {
            self.list.unlink(id);
            return Err(e);
        }
        self.stats.record_insertion(length);
        emit(&mut self.observer, CacheEvent::Inserted { key, length });

        if self.list.len() > self.max_size {
            if let Some(evicted) = self.evict_tail() {
                return Ok(PutOutcome::Evicted { key: evicted });
            }
        }
        Ok(PutOutcome::Inserted)
    }

    // == Get ==
    /// Looks up `key`, promoting it to most recently used on a hit.
    ///
    /// Returns None on a miss, leaving the recency order untouched.
    pub fn get(&mut self, key: &str) -> Option<&Entry> {
        let Some(id) = self.index.get(key) else {
            self.stats.record_miss();
            trace!(key, "cache miss");
            return None;
        };

        self.stats.record_hit();
        if self.list.head() != Some(id) {
            self.list.move_to_head(id);
            emit(&mut self.observer, CacheEvent::Promoted { key });
        }
        self.list.get(id)
    }

    // == Peek ==
    /// Looks up `key` without touching recency order or statistics.
    pub fn peek(&self, key: &str) -> Option<&Entry> {
        self.index.get(key).and_then(|id| self.list.get(id))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains(key)
    }

    // == Remove ==
    /// Unlinks `key` from the cache and hands its entry back to the caller.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        let id = self.index.delete(key)?;
        let entry = self.list.unlink(id)?;
        self.stats.record_removal(entry.length());
        emit(
            &mut self.observer,
            CacheEvent::Removed {
                key,
                length: entry.length(),
            },
        );
        Some(entry)
    }

    // == Destroy ==
    /// Tears the cache down, disposing every entry and the index.
    pub fn destroy(mut self) -> TeardownReport {
        let mut report = TeardownReport::default();
        let observer = &mut self.observer;

        for entry in self.list.drain() {
            report.entries_disposed += 1;
            report.bytes_released += entry.length();
            emit(
                observer,
                CacheEvent::Disposed {
                    key: entry.key(),
                    length: entry.length(),
                },
            );
        }

        info!(
            entries = report.entries_disposed,
            bytes = report.bytes_released,
            "cache destroyed"
        );
        report
    }

    // == Accessors ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Payload bytes currently held.
    pub fn total_bytes(&self) -> usize {
        self.stats.total_bytes
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    /// Keys from most to least recently used.
    pub fn keys_by_recency(&self) -> impl Iterator<Item = &str> {
        self.list.iter().map(|(_, entry)| entry.key())
    }

    // == Invariant Check ==
    /// Verifies that the list, the index, and the counters agree.
    pub fn check_invariants(&self) -> Result<()> {
        let violation = |msg: String| Err(CacheError::InvariantViolation(msg));

        if let Some(head) = self.list.head().and_then(|id| self.list.get(id)) {
            if head.prev.is_some() {
                return violation(format!("head '{}' has a back-link", head.key()));
            }
        }

        let mut previous = None;
        let mut count = 0;
        let mut bytes = 0;
        for (id, entry) in self.list.iter() {
            count += 1;
            if count > self.list.len() {
                return violation("recency list contains a cycle".to_string());
            }
            if entry.prev != previous {
                return violation(format!("'{}' has a broken back-link", entry.key()));
            }
            if self.index.get(entry.key()) != Some(id) {
                return violation(format!("'{}' is linked but not indexed", entry.key()));
            }
            bytes += entry.length();
            previous = Some(id);
        }

        if previous != self.list.tail() {
            return violation("walk did not end at the tail".to_string());
        }
        if count != self.list.len() || count != self.index.len() {
            return violation(format!(
                "list walk found {} entries, list reports {}, index holds {}",
                count,
                self.list.len(),
                self.index.len()
            ));
        }
        if count > self.max_size {
            return violation(format!("{} entries exceed capacity {}", count, self.max_size));
        }
        if count != self.stats.total_entries || bytes != self.stats.total_bytes {
            return violation(format!(
                "stats report {} entries / {} bytes, found {} / {}",
                self.stats.total_entries, self.stats.total_bytes, count, bytes
            ));
        }
        Ok(())
    }

    // == Internal Helpers ==
    fn evict_tail(&mut self) -> Option<String> {
        let entry = self.list.remove_tail()?;
        self.index.delete(entry.key());
        self.stats.record_eviction(entry.length());
        emit(
            &mut self.observer,
            CacheEvent::Evicted {
                key: entry.key(),
                length: entry.length(),
            },
        );
        debug!(key = entry.key(), "evicted least recently used entry");
        Some(entry.into_key())
    }
}

fn emit(observer: &mut Option<Box<dyn CacheObserver>>, event: CacheEvent<'_>) {
    trace!(%event, "cache transition");
    if let Some(observer) = observer.as_mut() {
        observer.on_event(&event);
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key must not be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

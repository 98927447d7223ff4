//! Cache Module
//!
//! Provides a fixed-capacity in-memory cache with LRU eviction.

mod entry;
mod events;
mod index;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::{Entry, EntryId};
pub use events::{CacheEvent, CacheObserver};
pub use index::Index;
pub use lru::RecencyList;
pub use stats::CacheStats;
pub use store::{LruCache, PutOutcome, TeardownReport};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 4096;

/// Maximum allowed payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024; // 16 MB

/// Index capacity used when the caller passes a hint of 0
pub const DEFAULT_INDEX_HINT: usize = 128;

/// Largest index capacity accepted at creation
pub const MAX_INDEX_HINT: usize = 1 << 24;

//! Response DTOs for the file cache
//!
//! Defines what a fetch hands back to its caller and how it is reported.

use serde::Serialize;

use crate::cache::{CacheStats, Entry, TeardownReport};

/// A file served either from the cache or from disk.
///
/// Carries everything needed to build a response without touching the cache
/// again. The body is left out of the JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct CachedFile {
    /// Normalized request path, also the cache key
    pub path: String,
    pub content_type: String,
    /// Body length in bytes
    pub length: usize,
    #[serde(skip)]
    pub body: Vec<u8>,
    /// True when the body came from the cache
    pub hit: bool,
    /// RFC3339 timestamp of the fetch
    pub fetched_at: String,
}

impl CachedFile {
    /// Creates a new CachedFile
    pub fn new(
        path: impl Into<String>,
        content_type: impl Into<String>,
        body: Vec<u8>,
        hit: bool,
    ) -> Self {
        Self {
            path: path.into(),
            content_type: content_type.into(),
            length: body.len(),
            body,
            hit,
            fetched_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Copies a cache entry out so the cache lock can be released.
    pub fn from_entry(entry: &Entry, hit: bool) -> Self {
        Self::new(
            entry.key(),
            entry.content_type(),
            entry.payload().to_vec(),
            hit,
        )
    }
}

/// Summary printed when the host shuts down.
#[derive(Debug, Clone, Serialize)]
pub struct ShutdownReport {
    pub stats: CacheStats,
    pub hit_rate: f64,
    /// None when other handles to the cache were still alive
    pub teardown: Option<TeardownReport>,
}

impl ShutdownReport {
    /// Creates a new ShutdownReport
    pub fn new(stats: CacheStats, teardown: Option<TeardownReport>) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
            teardown,
        }
    }
}

//! File Cache Host
//!
//! Serves file contents by path, reading from disk only on a cache miss.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::{CacheStats, LruCache, PutOutcome, TeardownReport, MAX_PAYLOAD_SIZE};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::host::mime::content_type_for;
use crate::models::CachedFile;

/// Shared handle to a path-keyed cache in front of a directory.
///
/// The engine itself is unsynchronized. Every access goes through one
/// exclusive lock since even a lookup reorders the recency list.
#[derive(Clone)]
pub struct FileCache {
    cache: Arc<Mutex<LruCache>>,
    root: PathBuf,
}

impl FileCache {
    /// Wraps an existing cache, serving files under `root`.
    pub fn new(cache: LruCache, root: impl Into<PathBuf>) -> Self {
        Self {
            cache: Arc::new(Mutex::new(cache)),
            root: root.into(),
        }
    }

    /// Creates the cache from configuration.
    ///
    /// Fails when the configured capacity or index hint is out of range.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = LruCache::create(config.max_entries, config.index_hint)?;
        Ok(Self::new(cache, config.root.clone()))
    }

    // == Fetch ==
    /// Returns the file at `path`, loading and caching it on a miss.
    ///
    /// The lock is not held while reading from disk, so two concurrent misses
    /// for the same path may both load it; the second put overwrites the first.
    /// Files larger than `MAX_PAYLOAD_SIZE` are served straight from disk and
    /// never cached.
    pub async fn fetch(&self, path: &str) -> Result<CachedFile> {
        let key = normalize_path(path)?;

        {
            let mut cache = self.cache.lock().await;
            if let Some(entry) = cache.get(&key) {
                debug!(path = %key, "served from cache");
                return Ok(CachedFile::from_entry(entry, true));
            }
        }

        let file_path = self.root.join(key.trim_start_matches('/'));
        let body = tokio::fs::read(&file_path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => CacheError::NotFound(key.clone()),
            _ => CacheError::Io(e),
        })?;
        let content_type = content_type_for(&key);

        if body.len() > MAX_PAYLOAD_SIZE {
            debug!(path = %key, bytes = body.len(), "file exceeds payload limit, served uncached");
            return Ok(CachedFile::new(key, content_type, body, false));
        }

        let outcome = self.cache.lock().await.put(&key, content_type, &body)?;
        if let PutOutcome::Evicted { key: evicted } = outcome {
            info!(path = %key, evicted = %evicted, "cached file, evicted least recently used");
        } else {
            debug!(path = %key, bytes = body.len(), "cached file");
        }

        Ok(CachedFile::new(key, content_type, body, false))
    }

    // == Invalidate ==
    /// Drops `path` from the cache so the next fetch rereads it.
    ///
    /// Returns whether the path was cached.
    pub async fn invalidate(&self, path: &str) -> Result<bool> {
        let key = normalize_path(path)?;
        Ok(self.cache.lock().await.remove(&key).is_some())
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.lock().await.stats()
    }

    // == Shutdown ==
    /// Destroys the cache if this is the last handle to it.
    ///
    /// Returns None, leaving the cache alive, while clones are outstanding.
    pub fn shutdown(self) -> Option<TeardownReport> {
        match Arc::try_unwrap(self.cache) {
            Ok(cache) => Some(cache.into_inner().destroy()),
            Err(_) => None,
        }
    }
}

// == Utility Functions ==
/// Turns a request path into a cache key of the form `/a/b.txt`.
///
/// Segments are split on `/` and the platform separator, so a backslash is
/// an ordinary file name character on Unix. Empty and `.` segments are
/// dropped; `..` segments are rejected so keys can never resolve outside
/// the root.
pub fn normalize_path(path: &str) -> Result<String> {
    let mut key = String::with_capacity(path.len() + 1);
    for segment in path.split(|c: char| c == '/' || c == std::path::MAIN_SEPARATOR) {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(CacheError::InvalidKey(format!(
                    "path '{}' escapes the root",
                    path
                )))
            }
            _ => {
                key.push('/');
                key.push_str(segment);
            }
        }
    }

    if key.is_empty() {
        return Err(CacheError::InvalidKey(format!("path '{}' names no file", path)));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn host_with_files(capacity: usize, files: &[(&str, &str)]) -> (tempfile::TempDir, FileCache) {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            std::fs::write(dir.path().join(name), body).unwrap();
        }
        let cache = LruCache::create(capacity, 0).unwrap();
        let host = FileCache::new(cache, dir.path());
        (dir, host)
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("index.html").unwrap(), "/index.html");
        assert_eq!(normalize_path("/a//b/./c.txt").unwrap(), "/a/b/c.txt");
        assert!(matches!(normalize_path("/../etc/passwd"), Err(CacheError::InvalidKey(_))));
        assert!(matches!(normalize_path("/"), Err(CacheError::InvalidKey(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_backslash_is_part_of_unix_file_name() {
        assert_eq!(normalize_path("a\\b.txt").unwrap(), "/a\\b.txt");
        assert_eq!(normalize_path("a\\..\\b").unwrap(), "/a\\..\\b");

        let (_dir, host) = host_with_files(4, &[("a\\b.txt", "literal")]);
        let file = assert_ok!(host.fetch("a\\b.txt").await);
        assert_eq!(file.body, b"literal");
        assert!(host.cache.lock().await.contains("/a\\b.txt"));
    }

    #[tokio::test]
    async fn test_fetch_miss_then_hit() {
        let (_dir, host) = host_with_files(4, &[("index.html", "<h1>home</h1>")]);

        let first = assert_ok!(host.fetch("/index.html").await);
        assert!(!first.hit);
        assert_eq!(first.content_type, "text/html");
        assert_eq!(first.body, b"<h1>home</h1>");

        let second = assert_ok!(host.fetch("index.html").await);
        assert!(second.hit);
        assert_eq!(second.length, first.length);

        let stats = host.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let (_dir, host) = host_with_files(4, &[]);

        let err = assert_err!(host.fetch("/nope.txt").await);
        assert!(matches!(err, CacheError::NotFound(_)));
        assert!(host.cache.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_oversized_file_served_uncached() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("big.bin"), vec![7u8; MAX_PAYLOAD_SIZE + 1]).unwrap();
        let host = FileCache::new(LruCache::create(4, 0).unwrap(), dir.path());

        let first = assert_ok!(host.fetch("/big.bin").await);
        assert!(!first.hit);
        assert_eq!(first.length, MAX_PAYLOAD_SIZE + 1);
        assert_eq!(first.body.len(), MAX_PAYLOAD_SIZE + 1);

        let second = assert_ok!(host.fetch("/big.bin").await);
        assert!(!second.hit);
        assert!(host.cache.lock().await.is_empty());

        let stats = host.stats().await;
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.total_bytes, 0);
    }

    #[tokio::test]
    async fn test_fetch_evicts_least_recently_used() {
        let (_dir, host) = host_with_files(
            2,
            &[("a.txt", "a"), ("b.txt", "b"), ("c.txt", "c")],
        );

        host.fetch("a.txt").await.unwrap();
        host.fetch("b.txt").await.unwrap();
        host.fetch("a.txt").await.unwrap();
        host.fetch("c.txt").await.unwrap();

        let cache = host.cache.lock().await;
        assert!(cache.contains("/a.txt"));
        assert!(!cache.contains("/b.txt"));
        assert!(cache.contains("/c.txt"));
    }

    #[tokio::test]
    async fn test_cached_copy_survives_file_change_until_invalidated() {
        let (dir, host) = host_with_files(4, &[("page.txt", "v1")]);

        host.fetch("page.txt").await.unwrap();
        std::fs::write(dir.path().join("page.txt"), b"v2").unwrap();

        assert_eq!(host.fetch("page.txt").await.unwrap().body, b"v1");
        assert!(host.invalidate("page.txt").await.unwrap());
        assert!(!host.invalidate("page.txt").await.unwrap());
        assert_eq!(host.fetch("page.txt").await.unwrap().body, b"v2");
    }

    #[tokio::test]
    async fn test_shutdown_last_handle() {
        let (_dir, host) = host_with_files(4, &[("a.txt", "abc")]);
        host.fetch("a.txt").await.unwrap();

        let clone = host.clone();
        assert!(clone.shutdown().is_none());

        let report = host.shutdown().unwrap();
        assert_eq!(report.entries_disposed, 1);
        assert_eq!(report.bytes_released, 3);
    }
}

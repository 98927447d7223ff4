//! Mini File Cache - A fixed-capacity in-memory LRU cache
//!
//! Provides an O(1) cache engine with least-recently-used eviction, and a
//! small host that serves file contents by path through it.

pub mod cache;
pub mod config;
pub mod error;
pub mod host;
pub mod models;

pub use cache::LruCache;
pub use config::Config;
pub use error::{CacheError, Result};
pub use host::FileCache;

//! Error types for the file cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine and its file host.
///
/// Lookup misses inside the engine are reported as `None`, not as an error.
/// `NotFound` is only produced by the host when the backing file is missing.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backing resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Capacity must hold at least one entry
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// Index sizing hint out of range
    #[error("Invalid index hint: {0}")]
    InvalidIndexHint(usize),

    /// Key rejected (empty, too long, or escaping the root)
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Payload exceeds the configured maximum
    #[error("Payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// Storage for an entry or the index could not be allocated
    #[error("Allocation failed: {0}")]
    AllocationFailed(String),

    /// Internal list/index bookkeeping disagrees
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Error reading from the backing store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the file cache.
pub type Result<T> = std::result::Result<T, CacheError>;

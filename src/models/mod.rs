//! Data models returned by the file cache host.

pub mod responses;

// Re-export commonly used types
pub use responses::{CachedFile, ShutdownReport};

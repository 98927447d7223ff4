//! Host Module
//!
//! Puts the cache engine in front of a directory of files.

pub mod file_cache;
pub mod mime;

pub use file_cache::{normalize_path, FileCache};
pub use mime::content_type_for;

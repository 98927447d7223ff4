//! Cache Entry Module
//!
//! Defines a single cached item and the handle used to address it.

use crate::error::{CacheError, Result};

// == Entry Id ==
/// Stable handle of an entry inside the recency list arena.
///
/// Handles are only meaningful for the list that issued them and are
/// recycled once the entry they name is disposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(pub(crate) usize);

impl EntryId {
    /// Returns the raw arena slot.
    pub fn slot(self) -> usize {
        self.0
    }
}

// == Cache Entry ==
/// One cached key/payload record.
///
/// The payload is always owned by the entry; callers hand in a borrowed
/// slice and the cache keeps its own copy.
#[derive(Debug)]
pub struct Entry {
    key: String,
    content_type: String,
    payload: Box<[u8]>,
    pub(crate) prev: Option<EntryId>,
    pub(crate) next: Option<EntryId>,
}

impl Entry {
    // == Constructor ==
    /// Creates an unlinked entry, copying `payload` into cache-owned storage.
    ///
    /// Fails with `AllocationFailed` instead of aborting when the copy cannot
    /// be allocated.
    pub fn new(key: String, content_type: String, payload: &[u8]) -> Result<Self> {
        Ok(Self {
            key,
            content_type,
            payload: copy_payload(payload)?,
            prev: None,
            next: None,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Byte count of the payload.
    pub fn length(&self) -> usize {
        self.payload.len()
    }

    // == Replace ==
    /// Swaps in a new content type and payload, keeping key and links.
    ///
    /// Returns the length of the payload that was released.
    pub(crate) fn replace(&mut self, content_type: String, payload: Box<[u8]>) -> usize {
        let released = self.payload.len();
        self.content_type = content_type;
        self.payload = payload;
        released
    }

    /// Consumes the entry, releasing its payload and keeping only the key.
    pub(crate) fn into_key(self) -> String {
        self.key
    }

    /// Clears both list links.
    pub(crate) fn reset_links(&mut self) {
        self.prev = None;
        self.next = None;
    }
}

// == Utility Functions ==
/// Copies a caller-owned buffer into a fresh boxed slice.
pub(crate) fn copy_payload(payload: &[u8]) -> Result<Box<[u8]>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(payload.len()).map_err(|e| {
        CacheError::AllocationFailed(format!("payload of {} bytes: {}", payload.len(), e))
    })?;
    buf.extend_from_slice(payload);
    Ok(buf.into_boxed_slice())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = Entry::new("/index.html".to_string(), "text/html".to_string(), b"<h1>hi</h1>")
            .unwrap();

        assert_eq!(entry.key(), "/index.html");
        assert_eq!(entry.content_type(), "text/html");
        assert_eq!(entry.payload(), b"<h1>hi</h1>");
        assert_eq!(entry.length(), 11);
        assert!(entry.prev.is_none());
        assert!(entry.next.is_none());
    }

    #[test]
    fn test_entry_copies_payload() {
        let mut source = vec![1u8, 2, 3];
        let entry = Entry::new("k".to_string(), "application/octet-stream".to_string(), &source)
            .unwrap();

        source[0] = 99;
        assert_eq!(entry.payload(), &[1, 2, 3]);
    }

    #[test]
    fn test_entry_empty_payload() {
        let entry = Entry::new("empty".to_string(), "text/plain".to_string(), &[]).unwrap();
        assert_eq!(entry.length(), 0);
        assert!(entry.payload().is_empty());
    }

    #[test]
    fn test_entry_binary_payload_with_nul() {
        let data = [0u8, 0xff, 0, 7];
        let entry = Entry::new("bin".to_string(), "image/png".to_string(), &data).unwrap();
        assert_eq!(entry.length(), 4);
        assert_eq!(entry.payload(), &data);
    }

    #[test]
    fn test_entry_replace() {
        let mut entry = Entry::new("k".to_string(), "text/plain".to_string(), b"old").unwrap();
        entry.prev = Some(EntryId(3));

        let released = entry.replace("text/html".to_string(), copy_payload(b"newer").unwrap());

        assert_eq!(released, 3);
        assert_eq!(entry.content_type(), "text/html");
        assert_eq!(entry.payload(), b"newer");
        assert_eq!(entry.prev, Some(EntryId(3)));
    }

    #[test]
    fn test_entry_reset_links() {
        let mut entry = Entry::new("k".to_string(), "text/plain".to_string(), b"v").unwrap();
        entry.prev = Some(EntryId(1));
        entry.next = Some(EntryId(2));

        entry.reset_links();

        assert!(entry.prev.is_none());
        assert!(entry.next.is_none());
    }
}

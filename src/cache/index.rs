//! Index Module
//!
//! Hash-based key lookup over recency list handles.

use std::collections::HashMap;

use crate::cache::{EntryId, DEFAULT_INDEX_HINT, MAX_INDEX_HINT};
use crate::error::{CacheError, Result};

// == Index ==
/// Maps keys to the handles of the entries holding them.
///
/// The index never owns entries; it only stores `EntryId`s issued by the
/// recency list.
#[derive(Debug, Default)]
pub struct Index {
    map: HashMap<String, EntryId>,
    /// Forces the next growth to fail
    #[cfg(test)]
    pub(crate) fail_growth: bool,
}

impl Index {
    // == Constructor ==
    /// Creates an index with room for `hint` keys.
    ///
    /// A hint of 0 selects `DEFAULT_INDEX_HINT`. Hints above `MAX_INDEX_HINT`
    /// are rejected rather than clamped.
    pub fn with_hint(hint: usize) -> Result<Self> {
        if hint > MAX_INDEX_HINT {
            return Err(CacheError::InvalidIndexHint(hint));
        }
        let hint = if hint == 0 { DEFAULT_INDEX_HINT } else { hint };

        let mut map = HashMap::new();
        map.try_reserve(hint)
            .map_err(|e| CacheError::AllocationFailed(format!("index of {} keys: {}", hint, e)))?;
        Ok(Self {
            map,
            #[cfg(test)]
            fail_growth: false,
        })
    }

    // == Put ==
    /// Inserts or overwrites the mapping for `key`.
    ///
    /// Returns the handle previously mapped to `key`, if any.
    pub fn put(&mut self, key: &str, id: EntryId) -> Result<Option<EntryId>> {
        if let Some(slot) = self.map.get_mut(key) {
            return Ok(Some(std::mem::replace(slot, id)));
        }
        self.map
            .try_reserve(self.growth_request())
            .map_err(|e| CacheError::AllocationFailed(format!("index growth: {}", e)))?;
        self.map.insert(key.to_string(), id);
        Ok(None)
    }

    #[cfg(not(test))]
    fn growth_request(&self) -> usize {
        1
    }

    #[cfg(test)]
    fn growth_request(&self) -> usize {
        if self.fail_growth {
            usize::MAX
        } else {
            1
        }
    }

    // == Get ==
    pub fn get(&self, key: &str) -> Option<EntryId> {
        self.map.get(key).copied()
    }

    // == Delete ==
    /// Removes the mapping for `key`. Returns None if it was absent.
    pub fn delete(&mut self, key: &str) -> Option<EntryId> {
        self.map.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over every indexed key in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_default_hint() {
        let index = Index::with_hint(0).unwrap();
        assert!(index.is_empty());
        assert!(index.map.capacity() >= DEFAULT_INDEX_HINT);
    }

    #[test]
    fn test_index_rejects_oversized_hint() {
        let result = Index::with_hint(MAX_INDEX_HINT + 1);
        assert!(matches!(result, Err(CacheError::InvalidIndexHint(_))));
    }

    #[test]
    fn test_index_put_and_get() {
        let mut index = Index::with_hint(4).unwrap();

        assert_eq!(index.put("a", EntryId(0)).unwrap(), None);
        assert_eq!(index.put("b", EntryId(1)).unwrap(), None);

        assert_eq!(index.get("a"), Some(EntryId(0)));
        assert_eq!(index.get("b"), Some(EntryId(1)));
        assert_eq!(index.get("c"), None);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_index_put_overwrites() {
        let mut index = Index::with_hint(4).unwrap();

        index.put("a", EntryId(0)).unwrap();
        let previous = index.put("a", EntryId(5)).unwrap();

        assert_eq!(previous, Some(EntryId(0)));
        assert_eq!(index.get("a"), Some(EntryId(5)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_index_delete() {
        let mut index = Index::with_hint(4).unwrap();
        index.put("a", EntryId(0)).unwrap();

        assert_eq!(index.delete("a"), Some(EntryId(0)));
        assert!(!index.contains("a"));
        assert!(index.is_empty());
    }

    #[test]
    fn test_index_delete_missing_is_noop() {
        let mut index = Index::with_hint(4).unwrap();
        index.put("a", EntryId(0)).unwrap();

        assert_eq!(index.delete("missing"), None);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_index_growth_failure_leaves_map_unchanged() {
        let mut index = Index::with_hint(4).unwrap();
        index.put("a", EntryId(0)).unwrap();
        index.fail_growth = true;

        let result = index.put("b", EntryId(1));
        assert!(matches!(result, Err(CacheError::AllocationFailed(_))));
        assert_eq!(index.len(), 1);
        assert!(!index.contains("b"));

        // Overwriting an existing key needs no growth
        assert_eq!(index.put("a", EntryId(2)).unwrap(), Some(EntryId(0)));
    }

    #[test]
    fn test_index_keys() {
        let mut index = Index::with_hint(4).unwrap();
        index.put("x", EntryId(0)).unwrap();
        index.put("y", EntryId(1)).unwrap();

        let mut keys: Vec<&str> = index.keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["x", "y"]);
    }
}

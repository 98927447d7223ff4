//! Recency List Module
//!
//! Implements the doubly-linked recency ordering used for LRU eviction.

use crate::cache::{Entry, EntryId};
use crate::error::{CacheError, Result};

// == Recency List ==
/// Doubly-linked list of entries ordered by access time.
///
/// Entries live in an arena of slots and link to each other through
/// `EntryId` handles:
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// Freed slots are recycled through a free list, so handles stay stable for
/// as long as the entry they name is linked.
#[derive(Debug, Default)]
pub struct RecencyList {
    /// Entry arena, `None` marks a free slot
    slots: Vec<Option<Entry>>,
    /// Free slot indices available for reuse
    free: Vec<usize>,
    head: Option<EntryId>,
    tail: Option<EntryId>,
    len: usize,
    /// Forces the next arena growth to fail
    #[cfg(test)]
    pub(crate) fail_growth: bool,
}

impl RecencyList {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert At Head ==
    /// Links `entry` as the new head and returns its handle.
    ///
    /// Any link state carried by `entry` is discarded. If the list was empty
    /// the entry also becomes the tail.
    pub fn insert_at_head(&mut self, mut entry: Entry) -> Result<EntryId> {
        entry.reset_links();
        let id = self.alloc_slot(entry)?;
        self.attach_head(id);
        self.len += 1;
        Ok(id)
    }

    // == Move To Head ==
    /// Promotes an entry to most recently used.
    ///
    /// No-op when the entry is already the head or the handle is stale.
    pub fn move_to_head(&mut self, id: EntryId) {
        if self.head == Some(id) || self.get(id).is_none() {
            return;
        }
        self.detach(id);
        self.attach_head(id);
    }

    // == Remove Tail ==
    /// Unlinks and returns the least recently used entry.
    ///
    /// Returns None if the list is empty.
    pub fn remove_tail(&mut self) -> Option<Entry> {
        let id = self.tail?;
        self.release(id)
    }

    // == Unlink ==
    /// Unlinks and returns an arbitrary entry by handle.
    pub fn unlink(&mut self, id: EntryId) -> Option<Entry> {
        self.get(id)?;
        self.release(id)
    }

    // == Drain ==
    /// Unlinks every entry, yielding them from head to tail.
    pub fn drain(&mut self) -> impl Iterator<Item = Entry> + '_ {
        std::iter::from_fn(move || {
            let id = self.head?;
            self.release(id)
        })
    }

    // == Accessors ==
    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Handle of the most recently used entry.
    pub fn head(&self) -> Option<EntryId> {
        self.head
    }

    /// Handle of the least recently used entry.
    pub fn tail(&self) -> Option<EntryId> {
        self.tail
    }

    /// Returns the number of linked entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Walks the list from head (MRU) to tail (LRU).
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Internal Helpers ==
    fn alloc_slot(&mut self, entry: Entry) -> Result<EntryId> {
        if let Some(slot) = self.free.pop() {
            self.slots[slot] = Some(entry);
            return Ok(EntryId(slot));
        }

        // Keep the free list able to hold every slot so releasing never allocates.
        let free_needed = self.slots.len() + 1 - self.free.len();
        self.slots
            .try_reserve(self.growth_request())
            .and_then(|_| self.free.try_reserve(free_needed))
            .map_err(|e| CacheError::AllocationFailed(format!("recency list slot: {}", e)))?;

        self.slots.push(Some(entry));
        Ok(EntryId(self.slots.len() - 1))
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

    fn attach_head(&mut self, id: EntryId) {
        let old_head = self.head;
        if let Some(entry) = self.get_mut(id) {
            entry.prev = None;
            entry.next = old_head;
        }
        match old_head {
            Some(old) => {
                if let Some(entry) = self.get_mut(old) {
                    entry.prev = Some(id);
                }
            }
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    fn detach(&mut self, id: EntryId) {
        let (prev, next) = match self.get_mut(id) {
            Some(entry) => {
                let links = (entry.prev, entry.next);
                entry.reset_links();
                links
            }
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(entry) = self.get_mut(p) {
                    entry.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(entry) = self.get_mut(n) {
                    entry.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn release(&mut self, id: EntryId) -> Option<Entry> {
        self.detach(id);
        let entry = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(entry)
    }
}

// == Iterator ==
/// Head-to-tail iterator over `(handle, entry)` pairs.
pub struct Iter<'a> {
    list: &'a RecencyList,
    cursor: Option<EntryId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (EntryId, &'a Entry);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let entry = self.list.get(id)?;
        self.cursor = entry.next;
        Some((id, entry))
    }
}

//! Cache Events Module
//!
//! Observer hook invoked at each entry state transition.

use std::fmt;

// == Cache Event ==
/// A state transition of a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEvent<'a> {
    /// A new key was linked at the head
    Inserted { key: &'a str, length: usize },
    /// An existing entry was moved to the head by a lookup
    Promoted { key: &'a str },
    /// An existing key was overwritten in place
    Replaced {
        key: &'a str,
        old_length: usize,
        new_length: usize,
    },
    /// The tail entry was dropped to make room
    Evicted { key: &'a str, length: usize },
    /// An entry was unlinked on request and handed back to the caller
    Removed { key: &'a str, length: usize },
    /// An entry was released during teardown
    Disposed { key: &'a str, length: usize },
}

impl CacheEvent<'_> {
    /// Key of the entry this event concerns.
    pub fn key(&self) -> &str {
        match self {
            CacheEvent::Inserted { key, .. }
            | CacheEvent::Promoted { key }
            | CacheEvent::Replaced { key, .. }
            | CacheEvent::Evicted { key, .. }
            | CacheEvent::Removed { key, .. }
            | CacheEvent::Disposed { key, .. } => key,
        }
    }
}

impl fmt::Display for CacheEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheEvent::Inserted { key, length } => write!(f, "inserted {} ({} bytes)", key, length),
            CacheEvent::Promoted { key } => write!(f, "promoted {}", key),
            CacheEvent::Replaced {
                key,
                old_length,
                new_length,
            } => write!(f, "replaced {} ({} -> {} bytes)", key, old_length, new_length),
            CacheEvent::Evicted { key, length } => write!(f, "evicted {} ({} bytes)", key, length),
            CacheEvent::Removed { key, length } => write!(f, "removed {} ({} bytes)", key, length),
            CacheEvent::Disposed { key, length } => write!(f, "disposed {} ({} bytes)", key, length),
        }
    }
}

// == Cache Observer ==
/// Receives every `CacheEvent` emitted by a cache.
///
/// Observers cannot influence the operation that emitted the event.
pub trait CacheObserver: Send {
    fn on_event(&mut self, event: &CacheEvent<'_>);
}

impl<F> CacheObserver for F
where
    F: FnMut(&CacheEvent<'_>) + Send,
{
    fn on_event(&mut self, event: &CacheEvent<'_>) {
        self(event)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_key() {
        let event = CacheEvent::Evicted {
            key: "/a.txt",
            length: 3,
        };
        assert_eq!(event.key(), "/a.txt");
        assert_eq!(CacheEvent::Promoted { key: "b" }.key(), "b");
    }

    #[test]
    fn test_event_display() {
        let event = CacheEvent::Replaced {
            key: "k",
            old_length: 1,
            new_length: 4,
        };
        assert_eq!(event.to_string(), "replaced k (1 -> 4 bytes)");
    }

    fn emit_all<F: FnMut(&CacheEvent<'_>) + Send>(mut observer: F) {
        observer.on_event(&CacheEvent::Promoted { key: "x" });
        observer.on_event(&CacheEvent::Promoted { key: "y" });
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        emit_all(|event| seen.push(event.key().to_string()));
        assert_eq!(seen, vec!["x", "y"]);
    }
}

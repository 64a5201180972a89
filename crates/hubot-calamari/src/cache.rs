use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::leave::Leave;

/// Process-wide handle to the leave cache.
pub type SharedLeaveCache = Arc<Mutex<LeaveCache>>;

/// Build a shared cache holding at most `capacity` users.
pub fn shared_cache(capacity: usize) -> SharedLeaveCache {
    Arc::new(Mutex::new(LeaveCache::new(capacity)))
}

/// Bounded per-user leave store with least-recently-used eviction.
///
/// Keys are user slugs. Entries never expire; they only leave the cache when
/// a new user is inserted into a full cache. Map order doubles as recency
/// order: the front is the least recently used entry.
#[derive(Debug)]
pub struct LeaveCache {
    entries: IndexMap<String, Vec<Leave>>,
    capacity: usize,
}

impl LeaveCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: IndexMap::with_capacity(capacity),
            capacity,
        }
    }

    /// Whether `key` is cached. Does not count as a use.
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Cached leave for `key`, sorted by start date. Marks `key` as most recently used.
    pub fn get(&mut self, key: &str) -> Option<&[Leave]> {
        let (key, value) = self.entries.shift_remove_entry(key)?;
        self.entries.insert(key, value);
        self.entries.last().map(|(_, leave)| leave.as_slice())
    }

    /// Insert or replace the leave for `key`, evicting the least recently
    /// used entry if the cache is full.
    pub fn set(&mut self, key: &str, mut leave: Vec<Leave>) {
        leave.sort_by_key(|l| l.from);
        if self.entries.shift_remove(key).is_none() && self.entries.len() >= self.capacity {
            if let Some((evicted, _)) = self.entries.shift_remove_index(0) {
                debug!(evicted = %evicted, "leave cache full, evicted least recently used user");
            }
        }
        self.entries.insert(key.to_string(), leave);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

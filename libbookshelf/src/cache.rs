//! Time-bounded cache of search results
//!
//! Entries are keyed by [`QueryKey`] and are considered fresh for a fixed
//! time-to-live from the moment they were written. Expiry is checked lazily
//! on lookup: stale entries stay in the map until they are overwritten or the
//! cache is cleared.
//!
//! The store has no public insert. New data enters only through
//! [`CatalogState::set_results`](crate::state::CatalogState::set_results).

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;

use crate::types::{Book, QueryKey, SortDirection};

/// Five minutes
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// One cached search result
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub data: Vec<Book>,
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub direction: SortDirection,
}

impl CacheEntry {
    /// True while `now - timestamp < ttl`
    ///
    /// A timestamp in the future (clock stepped back) counts as fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match now.signed_duration_since(self.timestamp).to_std() {
            Ok(age) => age < ttl,
            Err(_) => true,
        }
    }

    fn matches(&self, key: &QueryKey) -> bool {
        self.query == key.query && self.direction == key.direction
    }
}

#[derive(Debug, Clone)]
pub struct CacheStore {
    entries: HashMap<QueryKey, CacheEntry>,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up fresh data for `key`
    ///
    /// Returns `None` when there is no entry, the entry has expired, or the
    /// entry's recorded query/direction disagree with the key.
    pub fn get(&self, key: &QueryKey, now: DateTime<Utc>) -> Option<&[Book]> {
        let entry = self.entries.get(key)?;
        if entry.is_fresh(now, self.ttl) && entry.matches(key) {
            Some(&entry.data)
        } else {
            None
        }
    }

    /// Raw entry access, ignoring freshness
    pub fn peek(&self, key: &QueryKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn store(&mut self, key: QueryKey, data: Vec<Book>, now: DateTime<Utc>) {
        let entry = CacheEntry {
            data,
            timestamp: now,
            query: key.query.clone(),
            direction: key.direction,
        };
        self.entries.insert(key, entry);
    }

    /// Every entry's book list, fresh or not
    pub(crate) fn sequences_mut(&mut self) -> impl Iterator<Item = &mut Vec<Book>> {
        self.entries.values_mut().map(|entry| &mut entry.data)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub(crate) fn entry_mut(&mut self, key: &QueryKey) -> Option<&mut CacheEntry> {
        self.entries.get_mut(key)
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

//! In-memory time-to-live cache
//!
//! Entries expire by elapsed time only; there is no explicit invalidation
//! protocol. The cache is owned by whoever memoizes through it and is mutated
//! through `&mut self`, so no locking is involved.

use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

struct StoredEntry<T> {
    value: T,
    expires_at: Instant,
}

pub struct TtlCache<T> {
    default_ttl: Duration,
    entries: HashMap<String, StoredEntry<T>>,
}

impl<T: Clone> TtlCache<T> {
    #[must_use]
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Stores a value with the cache's default time-to-live.
    pub fn put(&mut self, key: &str, value: T) {
        self.put_with_ttl(key, value, self.default_ttl);
    }

    /// Stores a value with an explicit time-to-live.
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub fn put_with_ttl(&mut self, key: &str, value: T, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.entries
            .insert(key.to_string(), StoredEntry { value, expires_at });
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub fn get(&mut self, key: &str) -> Option<T> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if now < entry.expires_at => {
                tracing::debug!("Key found and still fresh");
                Some(entry.value.clone())
            }
            Some(_) => {
                tracing::debug!("Key found but expired");
                self.entries.remove(key);
                None
            }
            None => {
                tracing::debug!("Key not found");
                None
            }
        }
    }

    /// Drops every expired entry.
    pub fn purge_expired(&mut self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| now < entry.expires_at);
    }

    /// Number of stored entries, expired ones included until touched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

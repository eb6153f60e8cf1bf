//! Summary caching.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Key/value cache with per-entry time-to-live.
///
/// Implementations must be safe to share between threads. No single-flight guarantee is
/// expected: two callers missing the same key may both compute and store a value.
pub trait Cache<V>: Send + Sync {
    /// Live value stored under `key`.
    fn get(&self, key: &str) -> Option<V>;

    /// Store `value` under `key` for `ttl`.
    fn set(&self, key: &str, value: V, ttl: Duration);

    /// Drop `key`.
    fn remove(&self, key: &str);
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// In-process cache backed by a mutex-guarded map.
///
/// Expired entries are dropped lazily on lookup, or eagerly by [`InMemoryCache::remove_expired`].
#[derive(Debug)]
pub struct InMemoryCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    max_entries: usize,
}

impl<V> InMemoryCache<V> {
    /// Creates a cache holding at most 1000 entries.
    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    /// Creates a cache holding at most `max_entries` entries; the entry closest to expiry is
    /// evicted when full.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes expired entries.
    pub fn remove_expired(&self) {
        let now = Instant::now();
        if let Ok(mut g) = self.entries.lock() {
            g.retain(|_, e| e.is_live(now));
        }
    }

    pub fn clear(&self) {
        if let Ok(mut g) = self.entries.lock() {
            g.clear();
        }
    }
}

impl<V> Default for InMemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send> Cache<V> for InMemoryCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let mut g = self.entries.lock().ok()?;
        match g.get(key) {
            Some(e) if e.is_live(Instant::now()) => Some(e.value.clone()),
            Some(_) => {
                g.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, value: V, ttl: Duration) {
        let Ok(mut g) = self.entries.lock() else {
            return;
        };
        if g.len() >= self.max_entries && !g.contains_key(key) {
            let oldest = g
                .iter()
                .min_by_key(|(_, e)| (e.expires_at.is_none(), e.expires_at))
                .map(|(k, _)| k.clone());
            if let Some(k) = oldest {
                g.remove(&k);
            }
        }
        g.insert(
            key.to_owned(),
            CacheEntry {
                value,
                expires_at: Instant::now().checked_add(ttl),
            },
        );
    }

    fn remove(&self, key: &str) {
        if let Ok(mut g) = self.entries.lock() {
            g.remove(key);
        }
    }
}

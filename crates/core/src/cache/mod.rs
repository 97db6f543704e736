//! Result cache - time-bounded memoization in front of the video API.
//!
//! Two independent namespaces are kept: search results keyed by
//! [`SearchSignature`] and detail lookups keyed by video id. Expiry is
//! checked lazily when an entry is read; there is no background eviction.

mod types;

pub use types::*;

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::TimeDelta;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::video_source::{VideoDetails, VideoRecord};

/// One namespace of timestamped entries.
struct TtlMap<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K: Eq + Hash, V: Clone> TtlMap<K, V> {
    fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn get(&self, key: &K, clock: &dyn Clock, expiry: TimeDelta) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let now = clock.now();
        match entries.get(key) {
            Some(entry) if entry.is_valid(now, expiry) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&self, key: K, value: V, clock: &dyn Clock) {
        let entry = CacheEntry::new(value, clock.now());
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);
    }

    fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn purge_expired(&self, clock: &dyn Clock, expiry: TimeDelta) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let now = clock.now();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_valid(now, expiry));
        before - entries.len()
    }

    fn stats(&self, clock: &dyn Clock, expiry: TimeDelta) -> NamespaceStats {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let now = clock.now();
        let live = entries
            .values()
            .filter(|entry| entry.is_valid(now, expiry))
            .count();
        NamespaceStats {
            live,
            expired: entries.len() - live,
        }
    }
}

/// Memoizes search and detail results for a fixed expiry window.
///
/// Constructed explicitly and owned by whoever needs it; there is no
/// process-wide instance.
pub struct ResultCache {
    expiry: TimeDelta,
    clock: Arc<dyn Clock>,
    searches: TtlMap<SearchSignature, Vec<VideoRecord>>,
    details: TtlMap<String, VideoDetails>,
    disposed: AtomicBool,
}

impl ResultCache {
    /// Create a cache using the system clock.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache with an injected clock.
    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            expiry: config.expiry(),
            clock,
            searches: TtlMap::new(),
            details: TtlMap::new(),
            disposed: AtomicBool::new(false),
        }
    }

    /// The configured expiry window.
    pub fn expiry(&self) -> TimeDelta {
        self.expiry
    }

    /// Cached search results, if present and not expired.
    pub fn get_search(&self, signature: &SearchSignature) -> Option<Vec<VideoRecord>> {
        if self.is_disposed() {
            return None;
        }
        let hit = self.searches.get(signature, self.clock.as_ref(), self.expiry);
        debug!(key = %signature, hit = hit.is_some(), "Search cache lookup");
        hit
    }

    /// Store search results, replacing any previous entry.
    pub fn put_search(&self, signature: SearchSignature, videos: Vec<VideoRecord>) {
        if self.is_disposed() {
            return;
        }
        self.searches.put(signature, videos, self.clock.as_ref());
    }

    /// Cached video details, if present and not expired.
    pub fn get_details(&self, video_id: &str) -> Option<VideoDetails> {
        if self.is_disposed() {
            return None;
        }
        let hit = self
            .details
            .get(&video_id.to_string(), self.clock.as_ref(), self.expiry);
        debug!(video_id = video_id, hit = hit.is_some(), "Details cache lookup");
        hit
    }

    /// Store video details, replacing any previous entry.
    pub fn put_details(&self, video_id: &str, details: VideoDetails) {
        if self.is_disposed() {
            return;
        }
        self.details
            .put(video_id.to_string(), details, self.clock.as_ref());
    }

    /// Drop every entry in both namespaces.
    pub fn clear(&self) {
        self.searches.clear();
        self.details.clear();
        debug!("Result cache cleared");
    }

    /// Drop expired entries in both namespaces. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.searches.purge_expired(self.clock.as_ref(), self.expiry)
            + self.details.purge_expired(self.clock.as_ref(), self.expiry)
    }

    /// Clear the cache and stop accepting new entries.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        self.clear();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Live and expired entry counts per namespace.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            searches: self.searches.stats(self.clock.as_ref(), self.expiry),
            details: self.details.stats(self.clock.as_ref(), self.expiry),
        }
    }
}

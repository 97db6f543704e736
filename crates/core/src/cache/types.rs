//! Types for the result cache.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::video_source::VideoDuration;

/// Result cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long an entry stays valid, in seconds (default: 30 minutes).
    #[serde(default = "default_expiry_secs")]
    pub expiry_secs: u64,
}

fn default_expiry_secs() -> u64 {
    30 * 60
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            expiry_secs: default_expiry_secs(),
        }
    }
}

impl CacheConfig {
    /// The expiry window as a chrono delta.
    pub fn expiry(&self) -> TimeDelta {
        i64::try_from(self.expiry_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }
}

/// A stored value together with the time it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub created_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, created_at: DateTime<Utc>) -> Self {
        Self { value, created_at }
    }

    /// An entry is valid while its age is strictly below the expiry window.
    pub fn is_valid(&self, now: DateTime<Utc>, expiry: TimeDelta) -> bool {
        now - self.created_at < expiry
    }
}

/// Key of the search namespace: the realized request parameters.
///
/// Built from the composed query string, not the mood, so two keyword
/// choices for the same mood are cached independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchSignature {
    pub query: String,
    pub max_results: u32,
    pub duration: VideoDuration,
    pub category_id: String,
}

impl std::fmt::Display for SearchSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.query,
            self.max_results,
            self.duration.as_str(),
            self.category_id
        )
    }
}

/// Entry counts for one cache namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceStats {
    pub live: usize,
    pub expired: usize,
}

/// Entry counts for both namespaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub searches: NamespaceStats,
    pub details: NamespaceStats,
}

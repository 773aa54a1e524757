//! TTL-bounded result cache.
//!
//! Entries live in a persistent [`CacheStore`]. An entry whose expiry is at or
//! before the current time reads as absent; the row is left in place and
//! overwritten by the next `put`. Store faults never reach the caller: a failed
//! read is a miss and a failed write is a no-op.

use anyhow::Result;
use chrono::{DateTime, Utc};
use shared::{AnimeSummary, CacheEntry};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Key/value persistence behind the cache
pub trait CacheStore: Send + Sync {
    /// Stored row for `key`, expired or not
    fn load(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Insert or replace the row for `entry.key`
    fn upsert(&self, entry: &CacheEntry) -> Result<()>;
}

pub struct ResultCache {
    store: Arc<dyn CacheStore>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.get_at(key, Utc::now())
    }

    /// Unexpired entry for `key` as seen at `now`
    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        match self.store.load(key) {
            Ok(Some(entry)) if entry.is_expired_at(now) => {
                debug!(key = key, expires_at = %entry.expires_at, "Cache entry expired");
                None
            }
            Ok(Some(entry)) => {
                debug!(key = key, items = entry.value.len(), "Cache hit");
                Some(entry)
            }
            Ok(None) => {
                debug!(key = key, "Cache miss");
                None
            }
            Err(e) => {
                warn!(key = key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    pub fn put(&self, key: &str, value: Vec<AnimeSummary>, ttl: Duration) {
        self.put_at(key, value, ttl, Utc::now())
    }

    /// Store `value` so that it expires `ttl` after `now`
    pub fn put_at(&self, key: &str, value: Vec<AnimeSummary>, ttl: Duration, now: DateTime<Utc>) {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl));

        let Some(expires_at) = expires_at else {
            warn!(key = key, ttl_secs = ttl.as_secs(), "Cache TTL out of range, not storing");
            return;
        };

        let entry = CacheEntry {
            key: key.to_string(),
            value,
            expires_at,
            updated_at: now,
        };

        match self.store.upsert(&entry) {
            Ok(()) => debug!(
                key = key,
                items = entry.value.len(),
                expires_at = %expires_at,
                "Cache stored"
            ),
            Err(e) => warn!(key = key, error = %e, "Cache write failed, ignoring"),
        }
    }
}

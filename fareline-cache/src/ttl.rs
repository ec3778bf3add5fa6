use chrono::{DateTime, Duration, Utc};
use fareline_shared::models::CacheEntry;
use fareline_shared::Clock;
use fareline_store::CacheStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Memoizes expensive-to-regenerate data under string keys with a fixed
/// time-to-live.
///
/// An entry past its TTL is not an error, it is a miss: the generator
/// runs again and the fresh value replaces the stale one.
pub struct TtlCache {
    store: CacheStore,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl TtlCache {
    pub fn new(store: CacheStore, clock: Arc<dyn Clock>, ttl_seconds: i64) -> Self {
        Self {
            store,
            clock,
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    /// Return the cached value for `key` while it is fresh; otherwise
    /// invoke `generate`, persist its output with a new timestamp, and
    /// return it. The generator is not invoked on a hit.
    pub fn get_or_generate<T, F>(&self, key: &str, generate: F) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let now = self.clock.now();
        if let Some(value) = self.lookup_fresh(key, now) {
            return value;
        }

        let value = generate();
        self.store_value(key, &value, now);
        value
    }

    /// Fallible-generator variant: a failing generator propagates its
    /// error and leaves the cache unchanged for that key.
    pub fn try_get_or_generate<T, E, F>(&self, key: &str, generate: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
    {
        let now = self.clock.now();
        if let Some(value) = self.lookup_fresh(key, now) {
            return Ok(value);
        }

        let value = generate()?;
        self.store_value(key, &value, now);
        Ok(value)
    }

    /// Drop every entry whose age reached the TTL. The cache record is
    /// rewritten only when something was actually removed. Returns the
    /// number of dropped entries.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.store.load();
        let before = entries.len();

        entries.retain(|_, entry| entry.is_fresh(now, self.ttl));

        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "swept expired cache entries");
            self.store.save(&entries);
        }
        removed
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn size_bytes(&self) -> u64 {
        self.store.size_bytes()
    }

    fn lookup_fresh<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let entries = self.store.load();
        let entry = entries.get(key)?;
        if !entry.is_fresh(now, self.ttl) {
            return None;
        }

        match serde_json::from_value(entry.data.clone()) {
            Ok(value) => Some(value),
            Err(err) => {
                // stored under this key by an older build; treat as a miss
                warn!(key, %err, "cached payload does not match requested shape");
                None
            }
        }
    }

    fn store_value<T: Serialize>(&self, key: &str, value: &T, now: DateTime<Utc>) {
        let data = match serde_json::to_value(value) {
            Ok(data) => data,
            Err(err) => {
                warn!(key, %err, "generated value is not serializable, skipping cache write");
                return;
            }
        };

        let mut entries = self.store.load();
        entries.insert(key.to_string(), CacheEntry::new(data, now));
        self.store.save(&entries);
    }
}

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A memoized value plus the instant it was generated.
///
/// `timestamp` is unix milliseconds, matching the stored format of
/// earlier releases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    pub data: serde_json::Value,
    pub timestamp: i64,
}

impl CacheEntry {
    pub fn new(data: serde_json::Value, generated_at: DateTime<Utc>) -> Self {
        Self {
            data,
            timestamp: generated_at.timestamp_millis(),
        }
    }

    /// An entry is fresh while its age is strictly below the TTL.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.timestamp_millis() - self.timestamp < ttl.num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freshness_boundary() {
        let generated = Utc::now();
        let entry = CacheEntry::new(serde_json::json!({"v": 1}), generated);
        let ttl = Duration::hours(24);

        assert!(entry.is_fresh(generated, ttl));
        assert!(entry.is_fresh(generated + Duration::hours(23), ttl));
        // age == TTL is already stale
        assert!(!entry.is_fresh(generated + Duration::hours(24), ttl));
    }
}

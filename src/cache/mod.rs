//! In-memory query cache with per-resource staleness windows.
//!
//! Keys combine a resource name with a parameter string, so the same
//! resource fetched with different periods caches independently while
//! invalidation can still sweep the whole resource at once. Everything
//! here is an explicit service handed to the query layer — page code
//! never touches the cache directly, it only goes through the query
//! service, which keeps the invalidation rules in one auditable place.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

/// Default staleness window for portfolio and analytics resources
pub const DEFAULT_TTL_SECS: i64 = 5 * 60;
/// Sync status goes stale fast; it is the freshness signal itself
pub const SYNC_STATUS_TTL_SECS: i64 = 30;
/// Optimization runs are the most expensive analytics upstream
pub const OPTIMIZATION_TTL_SECS: i64 = 15 * 60;

/// Cache key: resource name plus a parameter string (e.g. `days=90`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    resource: &'static str,
    params: String,
}

impl CacheKey {
    pub fn new(resource: &'static str, params: impl Into<String>) -> Self {
        Self {
            resource,
            params: params.into(),
        }
    }

    pub fn bare(resource: &'static str) -> Self {
        Self::new(resource, "")
    }

    pub fn resource(&self) -> &str {
        self.resource
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.params.is_empty() {
            f.write_str(self.resource)
        } else {
            write!(f, "{}?{}", self.resource, self.params)
        }
    }
}

struct CacheEntry {
    value: Value,
    inserted_at: DateTime<Utc>,
    ttl: Duration,
}

impl CacheEntry {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.inserted_at < self.ttl
    }
}

/// A typed cache hit, fresh or stale
pub struct Cached<T> {
    pub value: T,
    pub stale: bool,
}

#[derive(Default)]
pub struct QueryCache {
    entries: DashMap<CacheKey, CacheEntry>,
    in_flight: DashMap<CacheKey, ()>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key, reporting staleness rather than dropping stale
    /// entries: the query layer serves stale data while it refreshes in
    /// the background.
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<Cached<T>> {
        let entry = self.entries.get(key)?;
        let stale = !entry.is_fresh(Utc::now());
        match serde_json::from_value(entry.value.clone()) {
            Ok(value) => {
                trace!(%key, stale, "cache hit");
                Some(Cached { value, stale })
            }
            // A shape mismatch means the payload model changed under the
            // cached value; treat it as a miss and let a refetch repopulate.
            Err(_) => None,
        }
    }

    pub fn put<T: Serialize>(&self, key: CacheKey, ttl_secs: i64, value: &T) {
        let Ok(json) = serde_json::to_value(value) else {
            return;
        };
        self.entries.insert(
            key,
            CacheEntry {
                value: json,
                inserted_at: Utc::now(),
                ttl: Duration::seconds(ttl_secs),
            },
        );
    }

    pub fn invalidate(&self, key: &CacheKey) {
        self.entries.remove(key);
    }

    /// Drop every entry for a resource, regardless of parameters.
    /// Returns how many entries were removed.
    pub fn invalidate_resource(&self, resource: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.resource() != resource);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(resource, removed, "cache invalidated");
        }
        removed
    }

    pub fn invalidate_resources(&self, resources: &[&str]) -> usize {
        resources
            .iter()
            .map(|resource| self.invalidate_resource(resource))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Claim the refresh slot for a key. Only one background refresh per
    /// key runs at a time; later requests for the same stale key are
    /// deduplicated until the in-flight one completes.
    pub fn begin_refresh(&self, key: CacheKey) -> bool {
        use dashmap::mapref::entry::Entry;
        match self.in_flight.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(());
                true
            }
        }
    }

    pub fn end_refresh(&self, key: &CacheKey) {
        self.in_flight.remove(key);
    }

    #[cfg(test)]
    fn put_with_age<T: Serialize>(&self, key: CacheKey, ttl_secs: i64, age_secs: i64, value: &T) {
        let json = serde_json::to_value(value).unwrap();
        self.entries.insert(
            key,
            CacheEntry {
                value: json,
                inserted_at: Utc::now() - Duration::seconds(age_secs),
                ttl: Duration::seconds(ttl_secs),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_entry_round_trips() {
        let cache = QueryCache::new();
        let key = CacheKey::new("portfolio", "days=90");
        cache.put(key.clone(), DEFAULT_TTL_SECS, &vec![1.0, 2.0]);

        let hit: Cached<Vec<f64>> = cache.get(&key).unwrap();
        assert!(!hit.stale);
        assert_eq!(hit.value, vec![1.0, 2.0]);
    }

    #[test]
    fn test_entry_goes_stale_after_ttl() {
        let cache = QueryCache::new();
        let key = CacheKey::bare("sync");
        cache.put_with_age(key.clone(), SYNC_STATUS_TTL_SECS, SYNC_STATUS_TTL_SECS + 1, &42u32);

        let hit: Cached<u32> = cache.get(&key).unwrap();
        assert!(hit.stale);
        assert_eq!(hit.value, 42);
    }

    #[test]
    fn test_invalidate_resource_sweeps_all_parameter_variants() {
        let cache = QueryCache::new();
        cache.put(CacheKey::new("portfolio", "days=30"), DEFAULT_TTL_SECS, &1u32);
        cache.put(CacheKey::new("portfolio", "days=90"), DEFAULT_TTL_SECS, &2u32);
        cache.put(CacheKey::new("transactions", ""), DEFAULT_TTL_SECS, &3u32);

        assert_eq!(cache.invalidate_resource("portfolio"), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get::<u32>(&CacheKey::new("transactions", "")).is_some());
    }

    #[test]
    fn test_shape_mismatch_is_a_miss() {
        let cache = QueryCache::new();
        let key = CacheKey::bare("portfolio");
        cache.put(key.clone(), DEFAULT_TTL_SECS, &"a string");
        assert!(cache.get::<Vec<f64>>(&key).is_none());
    }

    #[test]
    fn test_refresh_slot_deduplicates() {
        let cache = QueryCache::new();
        let key = CacheKey::bare("holdings");
        assert!(cache.begin_refresh(key.clone()));
        assert!(!cache.begin_refresh(key.clone()));
        cache.end_refresh(&key);
        assert!(cache.begin_refresh(key));
    }
}

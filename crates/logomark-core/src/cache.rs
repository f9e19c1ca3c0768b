use crate::domain::NormalizedKey;
use crate::error::CoreError;
use crate::time::{minutes_to_millis, now_millis};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::debug;

pub const DEFAULT_TTL_MINUTES: i64 = 30;
pub const DEFAULT_TTL_MILLIS: i64 = DEFAULT_TTL_MINUTES * 60_000;

/// A terminal resolution: `url: None` records that every provider failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub url: Option<String>,
    pub timestamp: i64,
}

impl CacheEntry {
    pub fn new(url: Option<String>, timestamp: i64) -> Self {
        Self { url, timestamp }
    }

    pub fn is_fresh(&self, now: i64, ttl_millis: i64) -> bool {
        now.saturating_sub(self.timestamp) < ttl_millis
    }

    pub fn is_negative(&self) -> bool {
        self.url.is_none()
    }
}

/// Shared store of resolved logos keyed by normalized organization name.
///
/// Readers check staleness lazily: an entry older than the TTL is reported
/// as a miss by [`LogoCache::get_at`] but stays in place until it is
/// overwritten or pruned. Writers never fail; last writer wins.
pub trait LogoCache {
    fn ttl_millis(&self) -> i64;

    /// Raw entry regardless of age.
    fn peek(&self, key: &NormalizedKey) -> Option<CacheEntry>;

    fn set_at(&self, key: &NormalizedKey, url: Option<&str>, now: i64);

    fn entries(&self) -> Vec<(NormalizedKey, CacheEntry)>;

    fn remove(&self, key: &NormalizedKey) -> bool;

    fn clear(&self) -> usize;

    fn prune_expired(&self, now: i64) -> usize;

    fn get_at(&self, key: &NormalizedKey, now: i64) -> Option<CacheEntry> {
        self.peek(key)
            .filter(|entry| entry.is_fresh(now, self.ttl_millis()))
    }

    fn get(&self, key: &NormalizedKey) -> Option<CacheEntry> {
        self.get_at(key, now_millis())
    }

    fn set(&self, key: &NormalizedKey, url: Option<&str>) {
        self.set_at(key, url, now_millis());
    }
}

/// In-process cache. `MemoryCache::global()` is the process-wide instance.
#[derive(Debug)]
pub struct MemoryCache {
    ttl_millis: i64,
    max_entries: Option<usize>,
    entries: Mutex<HashMap<NormalizedKey, CacheEntry>>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self {
            ttl_millis: DEFAULT_TTL_MILLIS,
            max_entries: None,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl_millis(ttl_millis: i64) -> Result<Self, CoreError> {
        if ttl_millis <= 0 {
            return Err(CoreError::InvalidTtl(ttl_millis));
        }
        Ok(Self {
            ttl_millis,
            ..Self::default()
        })
    }

    pub fn with_ttl_minutes(minutes: i64) -> Result<Self, CoreError> {
        Self::with_ttl_millis(minutes_to_millis(minutes))
    }

    /// Bounds the cache; the least recently written entry is evicted first.
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max.max(1));
        self
    }

    pub fn global() -> &'static MemoryCache {
        static GLOBAL: OnceLock<MemoryCache> = OnceLock::new();
        GLOBAL.get_or_init(MemoryCache::new)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<NormalizedKey, CacheEntry>> {
        // entries stay consistent even if a holder panicked mid-call
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogoCache for MemoryCache {
    fn ttl_millis(&self) -> i64 {
        self.ttl_millis
    }

    fn peek(&self, key: &NormalizedKey) -> Option<CacheEntry> {
        self.lock().get(key).cloned()
    }

    fn set_at(&self, key: &NormalizedKey, url: Option<&str>, now: i64) {
        if key.is_empty() {
            return;
        }
        let mut entries = self.lock();
        if let Some(max) = self.max_entries {
            if !entries.contains_key(key) && entries.len() >= max {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.timestamp)
                    .map(|(key, _)| key.clone());
                if let Some(oldest) = oldest {
                    debug!(key = %oldest, "evicting oldest logo cache entry");
                    entries.remove(&oldest);
                }
            }
        }
        entries.insert(
            key.clone(),
            CacheEntry::new(url.map(str::to_string), now),
        );
    }

    fn entries(&self) -> Vec<(NormalizedKey, CacheEntry)> {
        let mut items: Vec<_> = self
            .lock()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();
        items.sort_by(|a, b| a.0.cmp(&b.0));
        items
    }

    fn remove(&self, key: &NormalizedKey) -> bool {
        self.lock().remove(key).is_some()
    }

    fn clear(&self) -> usize {
        let mut entries = self.lock();
        let count = entries.len();
        entries.clear();
        count
    }

    fn prune_expired(&self, now: i64) -> usize {
        let ttl = self.ttl_millis;
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now, ttl));
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{CacheEntry, LogoCache, MemoryCache, DEFAULT_TTL_MILLIS};
    use crate::domain::NormalizedKey;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn set_then_get_round_trips() {
        let cache = MemoryCache::new();
        let key = NormalizedKey::new("PwC");
        cache.set_at(&key, Some("https://logo.clearbit.com/pwc.com"), NOW);
        let entry = cache.get_at(&key, NOW + 1_000).expect("entry");
        assert_eq!(
            entry,
            CacheEntry::new(Some("https://logo.clearbit.com/pwc.com".to_string()), NOW)
        );
    }

    #[test]
    fn negative_entries_are_not_misses() {
        let cache = MemoryCache::new();
        let key = NormalizedKey::new("Nobody Corp");
        cache.set_at(&key, None, NOW);
        let entry = cache.get_at(&key, NOW).expect("negative entry");
        assert!(entry.is_negative());
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = MemoryCache::new();
        let key = NormalizedKey::new("acme");
        cache.set_at(&key, Some("https://a"), NOW - DEFAULT_TTL_MILLIS);
        assert!(cache.get_at(&key, NOW).is_none());
        assert!(cache.peek(&key).is_some());

        cache.set_at(&key, Some("https://b"), NOW - DEFAULT_TTL_MILLIS + 1);
        assert!(cache.get_at(&key, NOW).is_some());
    }

    #[test]
    fn wall_clock_helpers_stamp_now() {
        let cache = MemoryCache::new();
        let key = NormalizedKey::new("acme");
        let before = crate::time::now_millis();
        cache.set(&key, None);
        let after = crate::time::now_millis();
        let entry = cache.get(&key).expect("entry");
        assert!(entry.timestamp >= before && entry.timestamp <= after);
    }

    #[test]
    fn empty_keys_are_ignored() {
        let cache = MemoryCache::new();
        cache.set_at(&NormalizedKey::new("  "), Some("https://a"), NOW);
        assert!(cache.is_empty());
    }

    #[test]
    fn bounded_cache_evicts_oldest_write() {
        let cache = MemoryCache::new().max_entries(2);
        cache.set_at(&NormalizedKey::new("a"), None, NOW);
        cache.set_at(&NormalizedKey::new("b"), None, NOW + 1);
        cache.set_at(&NormalizedKey::new("a"), None, NOW + 2);
        cache.set_at(&NormalizedKey::new("c"), None, NOW + 3);
        assert_eq!(cache.len(), 2);
        assert!(cache.peek(&NormalizedKey::new("b")).is_none());
        assert!(cache.peek(&NormalizedKey::new("a")).is_some());
    }

    #[test]
    fn prune_removes_only_stale_entries() {
        let cache = MemoryCache::with_ttl_minutes(1).expect("cache");
        cache.set_at(&NormalizedKey::new("old"), None, NOW - 120_000);
        cache.set_at(&NormalizedKey::new("new"), None, NOW);
        assert_eq!(cache.prune_expired(NOW), 1);
        let keys: Vec<String> = cache
            .entries()
            .into_iter()
            .map(|(key, _)| key.to_string())
            .collect();
        assert_eq!(keys, vec!["new"]);
    }

    #[test]
    fn invalid_ttl_is_rejected() {
        assert!(MemoryCache::with_ttl_millis(0).is_err());
    }
}

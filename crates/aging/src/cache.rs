//! Memoized aggregates keyed by (view, dataset version).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::model::AreaAggregate;
use crate::view::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub view: View,
    pub dataset_version: u64,
}

impl CacheKey {
    pub fn new(view: View, dataset_version: u64) -> Self {
        Self { view, dataset_version }
    }

    /// Every key a dataset version can produce.
    pub fn all_for(dataset_version: u64) -> Vec<CacheKey> {
        View::ALL.iter().map(|v| Self::new(*v, dataset_version)).collect()
    }
}

/// Look-up / store / invalidate capability the session memoizes through.
pub trait AggregateCache {
    fn get(&mut self, key: &CacheKey) -> Option<AreaAggregate>;
    fn put(&mut self, key: CacheKey, value: AreaAggregate);
    fn invalidate(&mut self, keys: &[CacheKey]);
}

/// In-memory cache whose entries expire `ttl` after insertion.
#[derive(Debug)]
pub struct TtlCache {
    ttl: Duration,
    entries: HashMap<CacheKey, (Instant, AreaAggregate)>,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AggregateCache for TtlCache {
    fn get(&mut self, key: &CacheKey) -> Option<AreaAggregate> {
        let (stored_at, value) = self.entries.get(key)?;
        if stored_at.elapsed() < self.ttl {
            return Some(value.clone());
        }
        self.entries.remove(key);
        None
    }

    fn put(&mut self, key: CacheKey, value: AreaAggregate) {
        self.entries.insert(key, (Instant::now(), value));
    }

    fn invalidate(&mut self, keys: &[CacheKey]) {
        for key in keys {
            self.entries.remove(key);
        }
    }
}

/// Never stores anything; every lookup recomputes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl AggregateCache for NoCache {
    fn get(&mut self, _key: &CacheKey) -> Option<AreaAggregate> {
        None
    }

    fn put(&mut self, _key: CacheKey, _value: AreaAggregate) {}

    fn invalidate(&mut self, _keys: &[CacheKey]) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::AgeCategory;

    fn sample() -> AreaAggregate {
        let mut agg = AreaAggregate::new();
        agg.entry("North").increment(AgeCategory::UpToOneMonth);
        agg
    }

    #[test]
    fn hit_within_ttl() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        let key = CacheKey::new(View::Disconnected, 1);
        cache.put(key, sample());
        assert_eq!(cache.get(&key), Some(sample()));
        assert_eq!(cache.get(&CacheKey::new(View::Disconnected, 2)), None);
    }

    #[test]
    fn zero_ttl_always_misses_and_evicts() {
        let mut cache = TtlCache::new(Duration::ZERO);
        let key = CacheKey::new(View::Revisit, 1);
        cache.put(key, sample());
        assert_eq!(cache.get(&key), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidate_by_key_set() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        for key in CacheKey::all_for(1) {
            cache.put(key, sample());
        }
        cache.put(CacheKey::new(View::Disconnected, 2), sample());
        cache.invalidate(&CacheKey::all_for(1));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&CacheKey::new(View::Disconnected, 2)).is_some());
    }

    #[test]
    fn no_cache_never_hits() {
        let mut cache = NoCache;
        let key = CacheKey::new(View::Disconnected, 1);
        cache.put(key, sample());
        assert_eq!(cache.get(&key), None);
    }
}

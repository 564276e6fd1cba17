//! Cache contract and its storage implementations.

use std::sync::{Arc, RwLock};

use lru::LruCache;
use metrics::counter;
use tracing::debug;

use super::config::CacheConfig;
use super::keys::{CacheKey, CachedValue, Region};
use super::lock::{rw_read, rw_write};

/// Invalidation counter of a region.
///
/// Every `evict` and `evict_all` advances it, whether or not an entry was
/// present. A value loaded from the store under an older epoch may predate
/// a mutation and is not cached.
pub type Epoch = u64;

/// Process-wide key/value cache partitioned into regions.
///
/// Each call is atomic for its key. Calls are not transactional with each
/// other: callers that invalidate several keys do so as a sequence.
/// Nothing expires on its own; entries leave through `evict`, `evict_all`
/// or capacity pressure.
pub trait Cache: Send + Sync {
    fn get(&self, region: Region, key: &CacheKey) -> Option<CachedValue>;

    /// Current invalidation epoch of `region`. Read-through callers take it
    /// before loading from the store and hand it to [`Cache::fill`].
    fn epoch(&self, region: Region) -> Epoch;

    fn put(&self, region: Region, key: CacheKey, value: CachedValue);

    /// Store a value loaded from the store, unless `region` was invalidated
    /// since `epoch` was read. Returns whether the value was stored.
    fn fill(&self, region: Region, key: CacheKey, value: CachedValue, epoch: Epoch) -> bool;

    fn evict(&self, region: Region, key: &CacheKey);

    /// Drop every entry of a region, for keys that cannot be enumerated.
    fn evict_all(&self, region: Region);
}

/// Build the cache described by the configuration.
pub fn build_cache(config: &CacheConfig) -> Arc<dyn Cache> {
    if config.enabled {
        Arc::new(L0Store::new(config))
    } else {
        Arc::new(NoopCache)
    }
}

// ============================================================================
// L0 Store: in-process object cache
// ============================================================================

struct RegionState {
    epoch: Epoch,
    entries: LruCache<CacheKey, CachedValue>,
}

impl RegionState {
    /// Insert or replace, reporting whether another key was pushed out.
    fn insert(&mut self, key: CacheKey, value: CachedValue) -> bool {
        let incoming = key.clone();
        self.entries
            .push(key, value)
            .is_some_and(|(displaced_key, _)| displaced_key != incoming)
    }
}

type RegionMap = RwLock<RegionState>;

/// In-memory object cache with one LRU per region.
pub struct L0Store {
    categories: RegionMap,
    posts: RegionMap,
    post_lists: RegionMap,
    comments: RegionMap,
}

impl L0Store {
    pub fn new(config: &CacheConfig) -> Self {
        let region_map = |region| {
            RwLock::new(RegionState {
                epoch: 0,
                entries: LruCache::new(config.limit_for(region)),
            })
        };
        Self {
            categories: region_map(Region::Category),
            posts: region_map(Region::Post),
            post_lists: region_map(Region::PostList),
            comments: region_map(Region::Comment),
        }
    }

    fn region(&self, region: Region) -> &RegionMap {
        match region {
            Region::Category => &self.categories,
            Region::Post => &self.posts,
            Region::PostList => &self.post_lists,
            Region::Comment => &self.comments,
        }
    }

    /// Number of entries currently held in a region.
    pub fn len(&self, region: Region) -> usize {
        rw_read(self.region(region), region.as_str(), "len")
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        Region::ALL.iter().all(|region| self.len(*region) == 0)
    }

    /// Clear all cached data.
    pub fn clear(&self) {
        for region in Region::ALL {
            self.evict_all(region);
        }
    }
}

fn record_capacity_eviction(region: Region, displaced: bool) {
    if displaced {
        counter!("quire_cache_evict_total", "region" => region.as_str()).increment(1);
    }
}

impl Cache for L0Store {
    fn get(&self, region: Region, key: &CacheKey) -> Option<CachedValue> {
        let hit = rw_write(self.region(region), region.as_str(), "get")
            .entries
            .get(key)
            .cloned();
        match hit {
            Some(_) => counter!("quire_cache_hit_total", "region" => region.as_str()).increment(1),
            None => counter!("quire_cache_miss_total", "region" => region.as_str()).increment(1),
        }
        hit
    }

    fn epoch(&self, region: Region) -> Epoch {
        rw_read(self.region(region), region.as_str(), "epoch").epoch
    }

    fn put(&self, region: Region, key: CacheKey, value: CachedValue) {
        let displaced = rw_write(self.region(region), region.as_str(), "put").insert(key, value);
        record_capacity_eviction(region, displaced);
    }

    fn fill(&self, region: Region, key: CacheKey, value: CachedValue, epoch: Epoch) -> bool {
        let outcome = {
            let mut state = rw_write(self.region(region), region.as_str(), "fill");
            if state.epoch == epoch {
                Some(state.insert(key, value))
            } else {
                None
            }
        };
        match outcome {
            Some(displaced) => {
                record_capacity_eviction(region, displaced);
                true
            }
            None => {
                debug!(
                    region = region.as_str(),
                    epoch,
                    "cache fill dropped after invalidation"
                );
                counter!("quire_cache_fill_dropped_total", "region" => region.as_str())
                    .increment(1);
                false
            }
        }
    }

    fn evict(&self, region: Region, key: &CacheKey) {
        let removed = {
            let mut state = rw_write(self.region(region), region.as_str(), "evict");
            state.epoch = state.epoch.wrapping_add(1);
            state.entries.pop(key)
        };
        if removed.is_some() {
            counter!("quire_cache_invalidate_total", "region" => region.as_str()).increment(1);
        }
    }

    fn evict_all(&self, region: Region) {
        let removed = {
            let mut state = rw_write(self.region(region), region.as_str(), "evict_all");
            state.epoch = state.epoch.wrapping_add(1);
            let removed = state.entries.len() as u64;
            state.entries.clear();
            removed
        };
        if removed > 0 {
            counter!("quire_cache_invalidate_total", "region" => region.as_str())
                .increment(removed);
        }
    }
}

/// Cache that never holds anything; every read falls through to the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl Cache for NoopCache {
    fn get(&self, _region: Region, _key: &CacheKey) -> Option<CachedValue> {
        None
    }

    fn epoch(&self, _region: Region) -> Epoch {
        0
    }

    fn put(&self, _region: Region, _key: CacheKey, _value: CachedValue) {}

    fn fill(&self, _region: Region, _key: CacheKey, _value: CachedValue, _epoch: Epoch) -> bool {
        false
    }

    fn evict(&self, _region: Region, _key: &CacheKey) {}

    fn evict_all(&self, _region: Region) {}
}

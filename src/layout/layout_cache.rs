use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::trace;
use xxhash_rust::xxh3::xxh3_64;

use crate::layout::waterfall::{ColumnSlots, WaterfallLayout};
use crate::metadata::cache::AspectRatioCache;
use crate::models::{ColumnAssignment, MediaItem};

/// Maximum number of cached layouts to keep in memory.
const MAX_CACHE_ENTRIES: usize = 8;

/// Key for the layout cache, combining column count and list hash.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
struct CacheKey {
    column_count: usize,
    list_hash: u64,
}

#[derive(Debug, Clone)]
struct CachedSlots {
    slots: ColumnSlots,
    /// Number of items this layout was computed for
    item_count: usize,
}

/// Layout cache for storing and retrieving column slots.
///
/// The greedy scan only depends on the column count, the item order, the
/// resolved heights and the insert-first flag, so that is what the key
/// covers. Resizes that keep the column count reuse the slots and only pay
/// for rebuilding the columns.
pub struct LayoutCache {
    cache: Mutex<LruCache<CacheKey, CachedSlots>>,
}

impl LayoutCache {
    pub fn new() -> Self {
        let capacity = NonZeroUsize::new(MAX_CACHE_ENTRIES).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Computes a fast hash of the list as the layout sees it.
    ///
    /// Covers each id in order together with its resolved height (or the
    /// lack of one), so reordering, loading or removing items all change
    /// the hash.
    pub fn compute_list_hash(items: &[MediaItem], ratios: &AspectRatioCache, insert_first: bool) -> u64 {
        let mut hasher_input = Vec::with_capacity(items.len() * 13 + 1);
        hasher_input.push(insert_first as u8);

        for item in items {
            hasher_input.extend_from_slice(&item.id.to_le_bytes());
            match ratios.scaled_height(item.id) {
                Some(h) => {
                    hasher_input.push(1);
                    hasher_input.extend_from_slice(&h.to_bits().to_le_bytes());
                }
                None => hasher_input.push(0),
            }
        }

        xxh3_64(&hasher_input)
    }

    /// Returns None on cache miss or when the entry was built for a list of
    /// a different length.
    pub fn get_slots(&self, column_count: usize, list_hash: u64, item_count: usize) -> Option<ColumnSlots> {
        let key = CacheKey {
            column_count,
            list_hash,
        };
        let mut cache = self.cache.lock();
        let entry = cache.get(&key)?;
        if entry.item_count != item_count {
            return None;
        }
        Some(entry.slots.clone())
    }

    pub fn set(&self, column_count: usize, list_hash: u64, slots: ColumnSlots, item_count: usize) {
        let key = CacheKey {
            column_count,
            list_hash,
        };
        self.cache.lock().put(key, CachedSlots { slots, item_count });
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Combines the waterfall layout with slot caching.
pub struct CachedWaterfall {
    pub layout: WaterfallLayout,
    pub cache: LayoutCache,
}

impl CachedWaterfall {
    pub fn new() -> Self {
        Self::with_layout(WaterfallLayout::default())
    }

    pub fn with_layout(layout: WaterfallLayout) -> Self {
        Self {
            layout,
            cache: LayoutCache::new(),
        }
    }

    /// Same result as `WaterfallLayout::compute`, reusing slots on a hit.
    pub fn compute(
        &self,
        items: &[MediaItem],
        ratios: &AspectRatioCache,
        container_width: f32,
        insert_first: bool,
    ) -> ColumnAssignment {
        let column_count = self.layout.column_count(container_width);
        let column_width = self.layout.column_width(container_width, column_count);
        let list_hash = LayoutCache::compute_list_hash(items, ratios, insert_first);

        if let Some(slots) = self.cache.get_slots(column_count, list_hash, items.len()) {
            trace!(column_count, "Layout cache hit");
            return self
                .layout
                .columns_from_slots(items, ratios, &slots, column_width);
        }

        trace!(column_count, "Layout cache miss");
        let slots = self
            .layout
            .compute_slots(items, ratios, column_count, column_width, insert_first);
        let columns = self
            .layout
            .columns_from_slots(items, ratios, &slots, column_width);
        self.cache.set(column_count, list_hash, slots, items.len());
        columns
    }

    /// Invalidates the cache, forcing recomputation on next call.
    pub fn invalidate(&self) {
        self.cache.clear();
    }
}

impl Default for CachedWaterfall {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaId;

    fn items_with_cache(n: u64) -> (Vec<MediaItem>, AspectRatioCache) {
        let mut cache = AspectRatioCache::default();
        let items = (1..=n)
            .map(|id| {
                cache.insert_dimensions(id, 100 + id as u32 * 10, 100);
                MediaItem::new(id, format!("{}", id), format!("{}.png", id))
            })
            .collect();
        (items, cache)
    }

    #[test]
    fn test_list_hash_consistency() {
        let (items, cache) = items_with_cache(5);
        let hash1 = LayoutCache::compute_list_hash(&items, &cache, false);
        let hash2 = LayoutCache::compute_list_hash(&items, &cache, false);
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_list_hash_changes_on_order() {
        let (items, cache) = items_with_cache(3);
        let mut reversed = items.clone();
        reversed.reverse();
        assert_ne!(
            LayoutCache::compute_list_hash(&items, &cache, false),
            LayoutCache::compute_list_hash(&reversed, &cache, false)
        );
    }

    #[test]
    fn test_list_hash_changes_when_an_item_resolves() {
        let (mut items, mut cache) = items_with_cache(3);
        items.push(MediaItem::new(4, "4", "4.png"));
        let before = LayoutCache::compute_list_hash(&items, &cache, false);
        cache.insert_dimensions(4, 100, 300);
        let after = LayoutCache::compute_list_hash(&items, &cache, false);
        assert_ne!(before, after);
    }

    #[test]
    fn test_list_hash_changes_on_insert_first() {
        let (items, cache) = items_with_cache(3);
        assert_ne!(
            LayoutCache::compute_list_hash(&items, &cache, false),
            LayoutCache::compute_list_hash(&items, &cache, true)
        );
    }

    #[test]
    fn test_cache_miss_then_hit() {
        let cache = LayoutCache::new();
        assert!(cache.get_slots(3, 12345, 5).is_none());

        cache.set(3, 12345, vec![vec![0, 3], vec![1, 4], vec![2]], 5);

        let slots = cache.get_slots(3, 12345, 5).unwrap();
        assert_eq!(slots.len(), 3);
        // Same key but a different item count is treated as a miss
        assert!(cache.get_slots(3, 12345, 6).is_none());
    }

    #[test]
    fn test_cache_eviction() {
        let cache = LayoutCache::new();
        for i in 0..(MAX_CACHE_ENTRIES + 5) {
            cache.set(1, i as u64, vec![vec![0]], 1);
        }
        assert_eq!(cache.len(), MAX_CACHE_ENTRIES);
        // The oldest entries went first
        assert!(cache.get_slots(1, 0, 1).is_none());
        assert!(cache.get_slots(1, (MAX_CACHE_ENTRIES + 4) as u64, 1).is_some());
    }

    #[test]
    fn test_cached_matches_uncached() {
        let computer = CachedWaterfall::new();
        let (items, cache) = items_with_cache(12);

        for width in [300.0, 700.0, 1000.0, 1010.0, 1400.0, 1000.0] {
            let cached = computer.compute(&items, &cache, width, true);
            let direct = computer.layout.compute(&items, &cache, width, true);
            assert_eq!(cached, direct, "width {}", width);
        }
        assert!(!computer.cache.is_empty());
    }

    #[test]
    fn test_resize_within_column_count_reuses_entry() {
        let computer = CachedWaterfall::new();
        let (items, cache) = items_with_cache(6);

        let a = computer.compute(&items, &cache, 1000.0, false);
        let b = computer.compute(&items, &cache, 1040.0, false);

        assert_eq!(computer.cache.len(), 1);
        assert_eq!(a.column_count(), b.column_count());
        assert!(b.column_width > a.column_width);
        let ids = |c: &ColumnAssignment| -> Vec<Vec<MediaId>> {
            c.columns.iter().map(|col| col.ids()).collect()
        };
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn test_invalidate_clears_entries() {
        let computer = CachedWaterfall::new();
        let (items, cache) = items_with_cache(4);
        computer.compute(&items, &cache, 800.0, false);
        computer.invalidate();
        assert!(computer.cache.is_empty());
    }
}

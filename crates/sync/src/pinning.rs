use std::collections::BTreeMap;

/// Write-once-per-key store used to pin an entity's spatial position to
/// its first observation.
///
/// The server may re-report a stable-id entity at slightly different
/// positions each tick; reading through this cache keeps static
/// infrastructure from jittering on screen. Entries are keyed in a
/// `BTreeMap` for stable traversal order.
///
/// Lifecycle is explicit: the owner clears the cache when the feature
/// it backs is disabled, and the cache rebuilds from scratch once
/// re-enabled.
#[derive(Debug, Clone)]
pub struct PinningCache<K: Ord, V> {
    entries: BTreeMap<K, V>,
}

impl<K: Ord, V> Default for PinningCache<K, V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord, V> PinningCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` only if `key` is unseen; returns the pinned value
    /// either way. Later writes to the same key are discarded.
    pub fn pin(&mut self, key: K, value: V) -> &V {
        self.entries.entry(key).or_insert(value)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::PinningCache;

    #[test]
    fn first_write_wins() {
        let mut cache: PinningCache<&str, [f64; 2]> = PinningCache::new();
        assert_eq!(*cache.pin("A", [37.79, -122.40]), [37.79, -122.40]);
        assert_eq!(*cache.pin("A", [37.80, -122.41]), [37.79, -122.40]);
        assert_eq!(cache.get(&"A"), Some(&[37.79, -122.40]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_forgets_all_pins() {
        let mut cache: PinningCache<&str, u32> = PinningCache::new();
        cache.pin("A", 1);
        cache.clear();
        assert!(cache.is_empty());
        // A fresh pin after clearing takes the new value.
        assert_eq!(*cache.pin("A", 2), 2);
    }
}

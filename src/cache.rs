//! A thread-safe map-backed cache.

use dashmap::DashMap;
use std::hash::Hash;

pub trait KeyValueCache<K, V>: Send + Sync {
    fn store(&self, key: K, value: V);
    fn retrieve(&self, key: &K) -> Option<V>;
}

/// Sharded-map cache, safe to share across threads by reference.
pub struct ShardedCache<K, V> {
    entries: DashMap<K, V>,
}

impl<K: Eq + Hash, V> ShardedCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash, V> Default for ShardedCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> KeyValueCache<K, V> for ShardedCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn store(&self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    fn retrieve(&self, key: &K) -> Option<V> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }
}

//! Cache capability trait.

use std::hash::{BuildHasher, Hash};
use std::time::Duration;

use crate::cache::LruCache;

/// Operations every cache in this crate supports.
///
/// All methods take `&self`; implementations synchronize internally and are
/// safe to call from many threads at once.
pub trait Cache<K, V> {
    /// Returns the current number of entries.
    fn len(&self) -> usize;

    /// Returns true if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    fn clear(&self);

    /// Inserts a key-value pair that never expires, returning the previous
    /// value for the key.
    fn add(&self, key: K, value: V) -> Option<V>;

    /// Inserts a key-value pair that expires after `ttl`. A zero `ttl`
    /// behaves like [`Cache::add`].
    fn add_with_ttl(&self, key: K, value: V, ttl: Duration) -> Option<V>;

    /// Returns the value for `key`, marking it as recently used.
    fn get(&self, key: &K) -> Option<V>;

    /// Removes `key`, returning its value if present.
    fn remove(&self, key: &K) -> Option<V>;
}

impl<K, V, S> Cache<K, V> for LruCache<K, V, S>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
    S: BuildHasher + Send + 'static,
{
    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn clear(&self) {
        LruCache::clear(self)
    }

    fn add(&self, key: K, value: V) -> Option<V> {
        LruCache::add(self, key, value)
    }

    fn add_with_ttl(&self, key: K, value: V, ttl: Duration) -> Option<V> {
        LruCache::add_with_ttl(self, key, value, ttl)
    }

    fn get(&self, key: &K) -> Option<V> {
        LruCache::get(self, key)
    }

    fn remove(&self, key: &K) -> Option<V> {
        LruCache::remove(self, key)
    }
}

//! Cache Store Module
//!
//! Main cache engine combining a key index with a recency list and per-entry
//! TTL expiry, all behind a single lock.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::entry::CacheItem;
use crate::cache::lru::RecencyList;
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::expiry::{ExpiryHandle, ExpiryScheduler};

/// Default hasher for the key index.
pub type RandomState = ahash::RandomState;

// == Cache State ==
/// Everything guarded by the cache lock.
///
/// `index` maps each key to its slot in `list`; both always hold the same
/// set of keys.
pub(crate) struct CacheState<K, V, S> {
    index: HashMap<K, usize, S>,
    list: RecencyList<CacheItem<K, V>>,
    max_items: usize,
    generation: u64,
}

impl<K, V, S> CacheState<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    pub(crate) fn with_capacity_and_hasher(max_items: usize, hash_builder: S) -> Self {
        Self {
            index: HashMap::with_capacity_and_hasher(max_items, hash_builder),
            list: RecencyList::with_capacity(max_items),
            max_items,
            generation: 0,
        }
    }

    // == Get ==
    /// Returns the live value for `key` and marks it most recently used.
    ///
    /// An item found past its deadline is removed and reported as a miss.
    pub(crate) fn get<Q>(&mut self, key: &Q, now: Instant) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = *self.index.get(key)?;
        if self.list.get(slot)?.is_expired_at(now) {
            self.remove(key);
            return None;
        }
        self.list.move_to_front(slot);
        self.list.get(slot).map(|item| &item.value)
    }

    // == Peek ==
    /// Returns the live item for `key` without touching recency.
    pub(crate) fn peek<Q>(&self, key: &Q, now: Instant) -> Option<&CacheItem<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = *self.index.get(key)?;
        self.list.get(slot).filter(|item| !item.is_expired_at(now))
    }

    // == Insert ==
    /// Stores `value` under `key` as most recently used.
    ///
    /// An existing key is overwritten in place. A new key evicts the least
    /// recently used item first when the cache is full. Returns the previous
    /// live value and the slot now holding the item.
    pub(crate) fn insert(&mut self, key: K, value: V, ttl: Duration) -> (Option<V>, usize) {
        let generation = self.next_generation();

        if let Some(&slot) = self.index.get(&key) {
            let now = Instant::now();
            let previous = self.list.get_mut(slot).and_then(|item| {
                let was_live = !item.is_expired_at(now);
                let old = item.overwrite(value, ttl, generation);
                was_live.then_some(old)
            });
            self.list.move_to_front(slot);
            return (previous, slot);
        }

        if self.list.len() >= self.max_items {
            self.evict_oldest();
        }

        let slot = self
            .list
            .push_front(CacheItem::new(key.clone(), value, ttl, generation));
        self.index.insert(key, slot);
        (None, slot)
    }

    // == Remove ==
    /// Removes `key` from both structures, cancelling any pending expiry.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.index.remove(key)?;
        self.list.remove(slot).map(|item| item.value)
    }

    // == Remove Generation ==
    /// Removes `key` only if it still holds the value written by
    /// `generation`. Returns true if an item was removed.
    pub(crate) fn remove_generation(&mut self, key: &K, generation: u64) -> bool {
        let current = self
            .index
            .get(key)
            .and_then(|&slot| self.list.get(slot))
            .is_some_and(|item| item.generation == generation);

        if current {
            self.remove(key);
        }
        current
    }

    // == Attach Expiry ==
    /// Hands `handle` to the item in `slot` if it still holds the write made
    /// by `generation`. Otherwise the handle is dropped, cancelling it.
    pub(crate) fn attach_expiry(
        &mut self,
        slot: usize,
        generation: u64,
        handle: ExpiryHandle,
    ) -> bool {
        match self.list.get_mut(slot) {
            Some(item) if item.generation == generation => {
                item.set_expiry(handle);
                true
            }
            _ => false,
        }
    }

    // == Evict Oldest ==
    /// Removes the least recently used item. Returns false if empty.
    pub(crate) fn evict_oldest(&mut self) -> bool {
        match self.list.pop_back() {
            Some(item) => {
                self.index.remove(&item.key);
                debug!(generation = item.generation, "Evicted least recently used entry");
                true
            }
            None => false,
        }
    }

    // == Purge Expired ==
    /// Removes every item past its deadline. Returns the number removed.
    pub(crate) fn purge_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<usize> = self
            .list
            .iter()
            .filter(|(_, item)| item.is_expired_at(now))
            .map(|(slot, _)| slot)
            .collect();

        for &slot in &expired {
            if let Some(item) = self.list.remove(slot) {
                self.index.remove(&item.key);
            }
        }
        expired.len()
    }

    pub(crate) fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    fn next_generation(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Panics if the index and the recency list disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.index.len(), self.list.len(), "index/list size mismatch");
        assert!(self.list.len() <= self.max_items, "capacity exceeded");
        let mut walked = 0;
        for (slot, item) in self.list.iter() {
            assert_eq!(self.index.get(&item.key), Some(&slot), "index points elsewhere");
            walked += 1;
        }
        assert_eq!(walked, self.list.len(), "list links are broken");
    }

    #[cfg(test)]
    pub(crate) fn keys_by_recency(&self) -> Vec<K> {
        self.list.iter().map(|(_, item)| item.key.clone()).collect()
    }
}

// == LRU Cache ==
/// Thread-safe, fixed-capacity LRU cache with optional per-entry TTL.
///
/// Every operation takes one exclusive lock for its whole duration, so no
/// caller ever observes a partial update. Entries added with a TTL are
/// removed by a one-shot action on the [`ExpiryScheduler`] once the TTL
/// elapses; reads also treat an entry past its deadline as missing.
///
/// Wrap the cache in an [`Arc`] to share it between threads.
pub struct LruCache<K, V, S = RandomState> {
    state: Arc<Mutex<CacheState<K, V, S>>>,
    scheduler: ExpiryScheduler,
    max_items: usize,
}

impl<K, V> LruCache<K, V, RandomState>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    /// Creates a cache holding at most `max_items` entries.
    ///
    /// Fails if `max_items` is zero or the expiry runtime cannot start.
    pub fn new(max_items: usize) -> Result<Self> {
        Self::from_config(&CacheConfig::with_max_items(max_items))
    }

    /// Creates a cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, RandomState::new())
    }

    /// Creates a cache whose expiry actions run on `scheduler`.
    pub fn with_scheduler(max_items: usize, scheduler: ExpiryScheduler) -> Result<Self> {
        Self::with_scheduler_and_hasher(max_items, scheduler, RandomState::new())
    }
}

impl<K, V, S> LruCache<K, V, S>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
    S: BuildHasher + Send + 'static,
{
    /// Creates a cache from configuration, using `hash_builder` to hash keys.
    ///
    /// Expiry runs on a dedicated runtime owned by the cache, even when called
    /// from inside another tokio runtime.
    pub fn with_config_and_hasher(config: &CacheConfig, hash_builder: S) -> Result<Self> {
        config.validate()?;
        let scheduler = ExpiryScheduler::dedicated(config.expiry_workers)?;
        Self::with_scheduler_and_hasher(config.max_items, scheduler, hash_builder)
    }

    /// Creates a cache with an explicit scheduler and hasher.
    pub fn with_scheduler_and_hasher(
        max_items: usize,
        scheduler: ExpiryScheduler,
        hash_builder: S,
    ) -> Result<Self> {
        if max_items == 0 {
            return Err(CacheError::InvalidConfig(
                "max_items must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            state: Arc::new(Mutex::new(CacheState::with_capacity_and_hasher(
                max_items,
                hash_builder,
            ))),
            scheduler,
            max_items,
        })
    }

    // == Get ==
    /// Returns a clone of the value for `key` and marks it most recently used.
    ///
    /// Returns None if the key is absent or its TTL has elapsed. A miss does
    /// not change the recency order. Store values in an [`Arc`] if cloning is
    /// expensive.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        let mut state = self.state.lock();
        state.get(key, Instant::now()).cloned()
    }

    // == Peek ==
    /// Returns a clone of the value for `key` without marking it as used.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        let state = self.state.lock();
        state
            .peek(key, Instant::now())
            .map(|item| item.value.clone())
    }

    /// Returns true if `key` holds a live entry. Does not change recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let state = self.state.lock();
        state.peek(key, Instant::now()).is_some()
    }

    /// Returns the remaining lifetime of `key`.
    ///
    /// None if the key is absent or was added without a TTL.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let state = self.state.lock();
        state
            .peek(key, Instant::now())
            .and_then(CacheItem::ttl_remaining)
    }

    // == Add ==
    /// Inserts a key-value pair that never expires.
    ///
    /// If the key was present its value is replaced, any pending expiry is
    /// cancelled and the previous value is returned. Otherwise the least
    /// recently used entry is evicted first when the cache is full.
    pub fn add(&self, key: K, value: V) -> Option<V> {
        self.add_with_ttl(key, value, Duration::ZERO)
    }

    // == Add With TTL ==
    /// Inserts a key-value pair that is removed once `ttl` elapses.
    ///
    /// Same replace/insert/evict rules as [`LruCache::add`]. A zero `ttl`
    /// means the entry never expires. Re-adding a key restarts its TTL and
    /// cancels the expiry scheduled by the earlier write.
    pub fn add_with_ttl(&self, key: K, value: V, ttl: Duration) -> Option<V> {
        let (previous, pending) = {
            let mut state = self.state.lock();
            let (previous, slot) = state.insert(key, value, ttl);
            let pending = state
                .list
                .get(slot)
                .filter(|item| item.time_to_live.is_some())
                .map(|item| (slot, item.key.clone(), item.generation));
            (previous, pending)
        };

        // Spawn outside the lock; the write may be superseded meanwhile
        if let Some((slot, key, generation)) = pending {
            let handle = self.schedule_expiry(key, generation, ttl);
            if !self.state.lock().attach_expiry(slot, generation, handle) {
                trace!(generation, "Write superseded before its expiry was attached");
            }
        }

        previous
    }

    // == Remove ==
    /// Removes `key`, returning its value if it was live.
    ///
    /// Removing an absent key is a no-op.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let mut state = self.state.lock();
        let live = state.peek(key, Instant::now()).is_some();
        state.remove(key).filter(|_| live)
    }

    // == Clear ==
    /// Removes every entry and cancels all pending expiries.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        let dropped = state.len();
        state.clear();
        debug!(dropped, "Cache cleared");
    }

    // == Purge Expired ==
    /// Removes entries whose TTL has elapsed but whose expiry has not run yet.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let removed = self.state.lock().purge_expired(Instant::now());
        if removed > 0 {
            debug!(removed, "Purged expired entries");
        }
        removed
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries the cache can hold.
    pub fn capacity(&self) -> usize {
        self.max_items
    }

    fn schedule_expiry(&self, key: K, generation: u64, ttl: Duration) -> ExpiryHandle {
        let state = Arc::downgrade(&self.state);
        self.scheduler
            .spawn_after(ttl, move || expire(&state, &key, generation))
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        self.state.lock().assert_consistent();
    }

    #[cfg(test)]
    pub(crate) fn keys_by_recency(&self) -> Vec<K> {
        self.state.lock().keys_by_recency()
    }
}

/// Expiry action: removes `key` if it still holds the write it was
/// scheduled for.
fn expire<K, V, S>(state: &Weak<Mutex<CacheState<K, V, S>>>, key: &K, generation: u64)
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    let Some(state) = state.upgrade() else {
        trace!(generation, "Cache dropped before expiry fired");
        return;
    };

    if state.lock().remove_generation(key, generation) {
        debug!(generation, "Expired entry removed");
    } else {
        trace!(generation, "Stale expiry ignored");
    }
}

impl<K, V, S> fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("max_items", &self.max_items)
            .field("len", &self.state.lock().index.len())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

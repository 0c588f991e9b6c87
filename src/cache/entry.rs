//! Cache Entry Module
//!
//! Defines the structure for individual cache items with TTL support.

use std::time::{Duration, Instant};

use crate::expiry::ExpiryHandle;

// == Cache Item ==
/// A single cached key/value pair with its expiry metadata.
#[derive(Debug)]
pub(crate) struct CacheItem<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// When the item was inserted or last overwritten
    pub(crate) inserted_at: Instant,
    /// Lifetime from `inserted_at`, None = no expiration
    pub(crate) time_to_live: Option<Duration>,
    /// Identifies the write that produced the current value
    pub(crate) generation: u64,
    /// Pending removal, cancelled when the item is dropped
    expiry: Option<ExpiryHandle>,
}

impl<K, V> CacheItem<K, V> {
    // == Constructor ==
    /// Creates a new item.
    ///
    /// A zero `ttl`, or one so large its deadline cannot be represented,
    /// means the item never expires.
    pub(crate) fn new(key: K, value: V, ttl: Duration, generation: u64) -> Self {
        let inserted_at = Instant::now();
        Self {
            key,
            value,
            inserted_at,
            time_to_live: effective_ttl(inserted_at, ttl),
            generation,
            expiry: None,
        }
    }

    // == Overwrite ==
    /// Replaces the value and restarts the TTL, returning the old value.
    ///
    /// Any pending expiry of the old value is cancelled.
    pub(crate) fn overwrite(&mut self, value: V, ttl: Duration, generation: u64) -> V {
        self.cancel_expiry();
        self.inserted_at = Instant::now();
        self.time_to_live = effective_ttl(self.inserted_at, ttl);
        self.generation = generation;
        std::mem::replace(&mut self.value, value)
    }

    // == Expiry Handle ==
    /// Attaches the scheduled removal for the current generation.
    pub(crate) fn set_expiry(&mut self, handle: ExpiryHandle) {
        self.cancel_expiry();
        self.expiry = Some(handle);
    }

    fn cancel_expiry(&mut self) {
        if let Some(handle) = self.expiry.take() {
            handle.cancel();
        }
    }

    // == Expires At ==
    pub(crate) fn expires_at(&self) -> Option<Instant> {
        self.time_to_live.map(|ttl| self.inserted_at + ttl)
    }

    // == Is Expired ==
    /// Checks if the item has expired at `now`.
    ///
    /// An item is expired once `now` reaches its deadline.
    pub(crate) fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at() {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if the item never expires.
    ///
    /// Returns `Some(Duration::ZERO)` once the deadline has passed.
    pub(crate) fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

fn effective_ttl(inserted_at: Instant, ttl: Duration) -> Option<Duration> {
    if ttl.is_zero() {
        return None;
    }
    inserted_at.checked_add(ttl).map(|_| ttl)
}

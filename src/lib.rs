//! TTL LRU Cache - A thread-safe, fixed-capacity in-process cache
//!
//! Entries are evicted least-recently-used first once the cache is full, and
//! may carry a time-to-live after which they are removed automatically.
//!
//! # Examples
//!
//! ```rust
//! use std::time::Duration;
//! use ttl_lru_cache::LruCache;
//!
//! # fn main() -> Result<(), ttl_lru_cache::CacheError> {
//! let cache = LruCache::new(2)?;
//!
//! cache.add("a", 1);
//! cache.add("b", 2);
//! cache.get("a");
//! cache.add("c", 3); // evicts "b", the least recently used
//!
//! assert_eq!(cache.get("b"), None);
//! assert_eq!(cache.len(), 2);
//!
//! cache.add_with_ttl("session", 42, Duration::from_secs(30));
//! assert_eq!(cache.get("session"), Some(42));
//! # Ok(())
//! # }
//! ```
//!
//! Keys must support value equality and hashing. Types without it are
//! rejected at compile time:
//!
//! ```compile_fail
//! use ttl_lru_cache::LruCache;
//!
//! let cache: LruCache<f64, &str> = LruCache::new(8).unwrap();
//! cache.add(1.5, "no Eq or Hash for f64");
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod expiry;

pub use cache::{Cache, LruCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use expiry::{ExpiryHandle, ExpiryScheduler};

//! Cache Module
//!
//! Provides in-memory caching with LRU eviction and TTL expiration.

mod entry;
mod lru;
mod store;
mod traits;


// Re-export public types
pub use store::{LruCache, RandomState};
pub use traits::Cache;

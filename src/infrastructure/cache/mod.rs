//! Caching layer for fast redirect lookups.
//!
//! Provides a [`CacheService`] trait with three implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`MemoryCache`] - In-process Moka cache
//! - [`NullCache`] - No-op implementation for disabled caching

mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};

#[cfg(test)]
pub use service::MockCacheService;

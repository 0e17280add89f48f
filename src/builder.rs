//! Builder for [`Cache`] instances.
//!
//! Collects policy, watermarks and hasher, then validates them once in
//! [`try_build`](CacheBuilder::try_build).
//!
//! ## Example
//!
//! ```rust
//! use watermark_cache::builder::CacheBuilder;
//! use watermark_cache::EvictionPolicy;
//!
//! let cache = CacheBuilder::new()
//!     .policy(EvictionPolicy::Fifo)
//!     .watermarks(64, 128)
//!     .build::<u64, String>();
//! cache.insert(1, "hello".to_string());
//! assert_eq!(cache.low_watermark(), 64);
//! assert_eq!(cache.get(&1).as_deref().map(String::as_str), Some("hello"));
//! ```

use std::hash::{BuildHasher, Hash};

use rustc_hash::FxBuildHasher;

use crate::cache::Cache;
use crate::error::ConfigError;
use crate::policy::{EvictionPolicy, Watermarks};

/// Builder for creating cache instances.
///
/// Defaults to LRU with eviction disabled and the Fx hasher.
#[derive(Debug, Clone)]
pub struct CacheBuilder<S = FxBuildHasher> {
    policy: EvictionPolicy,
    low: usize,
    high: usize,
    hasher: S,
}

impl CacheBuilder<FxBuildHasher> {
    pub fn new() -> Self {
        Self {
            policy: EvictionPolicy::Lru,
            low: usize::MAX,
            high: usize::MAX,
            hasher: FxBuildHasher,
        }
    }
}

impl Default for CacheBuilder<FxBuildHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CacheBuilder<S> {
    pub fn policy(mut self, policy: EvictionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Evict from `high` entries down to `low - 1`.
    pub fn watermarks(mut self, low: usize, high: usize) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    /// Fixed capacity: both watermarks set to `capacity`.
    pub fn capacity(self, capacity: usize) -> Self {
        self.watermarks(capacity, capacity)
    }

    /// Replaces the hasher, changing the builder's hasher type.
    pub fn hasher<T>(self, hasher: T) -> CacheBuilder<T> {
        CacheBuilder {
            policy: self.policy,
            low: self.low,
            high: self.high,
            hasher,
        }
    }

    /// Builds the cache, validating the watermarks.
    ///
    /// # Example
    ///
    /// ```rust
    /// use watermark_cache::builder::CacheBuilder;
    ///
    /// assert!(CacheBuilder::new().watermarks(8, 4).try_build::<u32, u32>().is_err());
    /// assert!(CacheBuilder::new().capacity(0).try_build::<u32, u32>().is_err());
    /// assert!(CacheBuilder::new().capacity(16).try_build::<u32, u32>().is_ok());
    /// ```
    pub fn try_build<K, V>(self) -> Result<Cache<K, V, S>, ConfigError>
    where
        K: Eq + Hash + Clone,
        S: BuildHasher,
    {
        let watermarks = Watermarks::try_new(self.low, self.high)?;
        Ok(Cache::from_parts(self.policy, watermarks, self.hasher))
    }

    /// Builds the cache.
    ///
    /// Invalid watermarks are a precondition violation, checked only in
    /// debug builds; prefer [`try_build`](Self::try_build) for values read
    /// from configuration.
    pub fn build<K, V>(self) -> Cache<K, V, S>
    where
        K: Eq + Hash + Clone,
        S: BuildHasher,
    {
        let watermarks = Watermarks::new(self.low, self.high);
        Cache::from_parts(self.policy, watermarks, self.hasher)
    }
}

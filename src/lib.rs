//! watermark-cache: thread-safe key-value cache with LRU/FIFO eviction
//! driven by low/high watermarks.
//!
//! [`Cache`] is the shared, lock-protected cache; [`CacheCore`] is the
//! single-threaded engine underneath it. See `DESIGN.md` for the internal
//! layout and invariants.
//!
//! ```
//! use watermark_cache::{Cache, EvictionPolicy};
//!
//! let cache: Cache<&str, u32> = Cache::with_watermarks(EvictionPolicy::Lru, 2, 3);
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//! cache.insert("c", 3);
//! cache.get(&"a");
//! cache.insert("d", 4);
//! assert_eq!(cache.keys(), vec!["a", "d"]);
//! ```

pub mod builder;
pub mod cache;
pub mod ds;
pub mod engine;
pub mod error;
pub mod index;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;

pub use crate::builder::CacheBuilder;
pub use crate::cache::{Cache, PostEvictionCallback, WeakCache};
pub use crate::engine::CacheCore;
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::CacheMetricsSnapshot;
pub use crate::policy::{EvictionPolicy, Watermarks};

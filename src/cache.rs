//! # Thread-safe watermark cache
//!
//! [`Cache`] wraps a [`CacheCore`] in a `parking_lot::RwLock` and adds the
//! post-eviction callback.
//!
//! ## Lock modes
//!
//! ```text
//!   Operation                          Lock
//!   ─────────────────────────────────  ──────────────────────────────────────
//!   insert / insert_arc                write
//!   pop_front / erase / clear          write
//!   set_post_eviction_callback         write
//!   try_get (FIFO, or no reordering)   read
//!   try_get (LRU, reordering)          upgradable read ──(not at back)──► write
//!   visit / len / contains / keys      read
//!   eviction_policy / watermarks       none (immutable)
//! ```
//!
//! An LRU lookup takes an *upgradable* read: it shares the lock with plain
//! readers but excludes writers and other upgradable readers, so the entry it
//! found cannot be evicted before the upgrade. A hit on the entry that is
//! already at the back of the queue never upgrades, which keeps repeated
//! reads of a hot key on the shared path.
//!
//! ## Post-eviction callback
//!
//! Entries removed by watermark eviction, [`pop_front`](Cache::pop_front) or
//! [`erase`](Cache::erase) are reported to the callback once each, in
//! eviction order. The callback runs after the write lock is released, so it
//! may call back into the cache. Reports from concurrent mutators may
//! interleave. [`clear`](Cache::clear) reports nothing.
//!
//! If the callback panics, the cache is already consistent; the remaining
//! values of that batch are dropped unreported and the panic propagates to
//! the caller of the mutating operation.
//!
//! The cache owns its callback, so a callback that captures a `Cache` clone
//! keeps the cache alive forever. A callback that re-enters the cache should
//! capture a [`WeakCache`] from [`Cache::downgrade`] instead:
//!
//! ```
//! use watermark_cache::{Cache, EvictionPolicy};
//!
//! let cache: Cache<u32, u32> = Cache::with_watermarks(EvictionPolicy::Fifo, 2, 2);
//! let weak = cache.downgrade();
//! cache.set_post_eviction_callback(move |value| {
//!     if let Some(cache) = weak.upgrade() {
//!         assert!(!cache.contains(&**value));
//!     }
//! });
//! cache.insert(0, 0);
//! cache.insert(1, 1);
//! cache.insert(2, 2);
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use watermark_cache::{Cache, EvictionPolicy};
//!
//! let cache: Cache<u32, String> = Cache::with_watermarks(EvictionPolicy::Lru, 3, 4);
//! let evicted = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&evicted);
//! cache.set_post_eviction_callback(move |value: &Arc<String>| {
//!     sink.lock().unwrap().push(value.to_string());
//! });
//!
//! cache.insert(0, "Alex".to_string());
//! cache.insert(1, "John".to_string());
//! cache.insert(2, "Rob".to_string());
//! assert_eq!(cache.get(&1).as_deref().map(String::as_str), Some("John"));
//!
//! cache.insert(3, "Jim".to_string());
//! cache.insert(4, "Jeff".to_string());
//! assert_eq!(cache.len(), 3);
//! assert_eq!(*evicted.lock().unwrap(), vec!["Alex", "Rob"]);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::{Arc, Weak};

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use rustc_hash::FxBuildHasher;

use crate::engine::CacheCore;
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::{
    CacheMetricsSnapshot, CoreMetricsRecorder, MetricsReset, MetricsSnapshotProvider,
};
use crate::policy::{EvictionPolicy, Watermarks};

/// Function invoked with each value removed by eviction, `pop_front` or `erase`.
pub type PostEvictionCallback<V> = Arc<dyn Fn(&Arc<V>) + Send + Sync>;

struct Shared<K, V, S> {
    core: CacheCore<K, V, S>,
    callback: Option<PostEvictionCallback<V>>,
}

impl<K, V, S> Shared<K, V, S> {
    /// Pairs evicted values with the callback to report them to.
    fn report(&self, evicted: Vec<Arc<V>>) -> Evicted<V> {
        Evicted {
            callback: if evicted.is_empty() {
                None
            } else {
                self.callback.clone()
            },
            values: evicted,
        }
    }
}

/// Values removed under the lock, reported once the lock is gone.
#[must_use]
struct Evicted<V> {
    callback: Option<PostEvictionCallback<V>>,
    values: Vec<Arc<V>>,
}

impl<V> Evicted<V> {
    fn notify(self) {
        if let Some(callback) = self.callback {
            for value in &self.values {
                callback(value);
            }
        }
    }
}

/// Thread-safe key-value cache with LRU or FIFO watermark eviction.
///
/// Cloning a `Cache` yields another handle to the same cache.
pub struct Cache<K, V, S = FxBuildHasher> {
    inner: Arc<RwLock<Shared<K, V, S>>>,
    policy: EvictionPolicy,
    watermarks: Watermarks,
}

impl<K, V, S> Clone for Cache<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            policy: self.policy,
            watermarks: self.watermarks,
        }
    }
}

/// Non-owning handle to a [`Cache`], for callbacks that call back into it.
pub struct WeakCache<K, V, S = FxBuildHasher> {
    inner: Weak<RwLock<Shared<K, V, S>>>,
    policy: EvictionPolicy,
    watermarks: Watermarks,
}

impl<K, V, S> WeakCache<K, V, S> {
    /// Returns a cache handle if any [`Cache`] handle is still alive.
    pub fn upgrade(&self) -> Option<Cache<K, V, S>> {
        self.inner.upgrade().map(|inner| Cache {
            inner,
            policy: self.policy,
            watermarks: self.watermarks,
        })
    }
}

impl<K, V, S> Clone for WeakCache<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
            policy: self.policy,
            watermarks: self.watermarks,
        }
    }
}

impl<K, V, S> fmt::Debug for WeakCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakCache")
            .field("alive", &(self.inner.strong_count() > 0))
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<K, V> Cache<K, V, FxBuildHasher>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU cache with eviction disabled (both watermarks at
    /// `usize::MAX`).
    pub fn new() -> Self {
        Self::from_parts(EvictionPolicy::Lru, Watermarks::UNBOUNDED, FxBuildHasher)
    }

    /// Creates a cache evicting from `high` entries down to `low - 1`.
    ///
    /// `1 <= low <= high` is a precondition checked only in debug builds;
    /// use [`try_with_watermarks`](Self::try_with_watermarks) for values
    /// from configuration.
    pub fn with_watermarks(policy: EvictionPolicy, low: usize, high: usize) -> Self {
        Self::from_parts(policy, Watermarks::new(low, high), FxBuildHasher)
    }

    /// Validating variant of [`with_watermarks`](Self::with_watermarks).
    pub fn try_with_watermarks(
        policy: EvictionPolicy,
        low: usize,
        high: usize,
    ) -> Result<Self, ConfigError> {
        let watermarks = Watermarks::try_new(low, high)?;
        Ok(Self::from_parts(policy, watermarks, FxBuildHasher))
    }
}

impl<K, V, S> Cache<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    /// Creates a cache hashing keys with `hasher`.
    pub fn with_watermarks_and_hasher(
        policy: EvictionPolicy,
        low: usize,
        high: usize,
        hasher: S,
    ) -> Self {
        Self::from_parts(policy, Watermarks::new(low, high), hasher)
    }

    pub(crate) fn from_parts(policy: EvictionPolicy, watermarks: Watermarks, hasher: S) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Shared {
                core: CacheCore::with_hasher(policy, watermarks, hasher),
                callback: None,
            })),
            policy,
            watermarks,
        }
    }

    /// Inserts `value` under `key`, replacing any previous value.
    ///
    /// The value is wrapped in an `Arc` before the lock is taken.
    pub fn insert(&self, key: K, value: V) {
        self.insert_arc(key, Arc::new(value));
    }

    /// Inserts a shared value under `key`, replacing any previous value.
    ///
    /// If the cache has reached its high watermark, entries are first
    /// evicted from the front until `low - 1` remain, and each is reported
    /// to the post-eviction callback.
    pub fn insert_arc(&self, key: K, value: Arc<V>) {
        let evicted = {
            let mut shared = self.inner.write();
            let evicted = shared.core.insert(key, value);
            shared.report(evicted)
        };
        evicted.notify();
    }

    /// Looks up `key`.
    ///
    /// With `modify_eviction_queue` set and an LRU policy, a hit moves the
    /// entry to the back of the eviction queue. Under FIFO, or with the flag
    /// cleared, the lookup never reorders and only takes a read lock.
    pub fn try_get<Q>(&self, key: &Q, modify_eviction_queue: bool) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if !(modify_eviction_queue && self.policy.reorders_on_access()) {
            let shared = self.inner.read();
            return shared.core.peek(key).cloned();
        }

        let shared = self.inner.upgradable_read();
        let (value, position) = shared
            .core
            .lookup(key)
            .map(|(value, position)| (Arc::clone(value), position))?;

        if !shared.core.is_back(position) {
            let mut shared = RwLockUpgradableReadGuard::upgrade(shared);
            #[cfg(feature = "metrics")]
            shared.core.metrics().record_lock_upgrade();
            shared.core.promote(position);
        }
        Some(value)
    }

    /// Looks up `key`, refreshing its position under LRU.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.try_get(key, true)
    }

    /// Looks up `key` without touching the eviction order.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.try_get(key, false)
    }

    /// Returns `true` if `key` is cached. Does not reorder.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().core.contains(key)
    }

    /// Evicts the entry at the front of the queue.
    ///
    /// Returns `false` if the cache was empty.
    pub fn pop_front(&self) -> bool {
        let evicted = {
            let mut shared = self.inner.write();
            match shared.core.pop_front() {
                Some((_, value)) => shared.report(vec![value]),
                None => return false,
            }
        };
        evicted.notify();
        true
    }

    /// Removes `key`, reporting its value to the post-eviction callback.
    ///
    /// Returns `false` if the key was absent.
    pub fn erase<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let evicted = {
            let mut shared = self.inner.write();
            match shared.core.erase(key) {
                Some(value) => shared.report(vec![value]),
                None => return false,
            }
        };
        evicted.notify();
        true
    }

    /// Calls `visitor` with each entry from the front of the eviction queue
    /// to the back, stopping early when it returns `false`.
    ///
    /// Holds the read lock for the whole traversal, so writers wait until
    /// the visitor finishes. The visitor must not call any method of the
    /// same cache: a queued writer makes a nested read block forever.
    pub fn visit<F>(&self, visitor: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.inner.read().core.visit(visitor);
    }

    /// Returns the keys in eviction order, next victim first.
    pub fn keys(&self) -> Vec<K> {
        self.inner.read().core.keys()
    }

    /// Checks that the key index and eviction queue agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.read().core.check_invariants()
    }

    /// Returns a clone of the configured `BuildHasher`.
    pub fn hasher(&self) -> S
    where
        S: Clone,
    {
        self.inner.read().core.hasher().clone()
    }
}

impl<K, V, S> Cache<K, V, S> {
    /// Returns a handle that does not keep the cache alive.
    ///
    /// Capture this, not a `Cache` clone, in a post-eviction callback that
    /// re-enters the cache; a strong clone held by the callback forms a
    /// reference cycle and the cache is never freed.
    pub fn downgrade(&self) -> WeakCache<K, V, S> {
        WeakCache {
            inner: Arc::downgrade(&self.inner),
            policy: self.policy,
            watermarks: self.watermarks,
        }
    }

    /// Replaces the post-eviction callback.
    ///
    /// See [`downgrade`](Self::downgrade) for callbacks that use the cache.
    pub fn set_post_eviction_callback<F>(&self, callback: F)
    where
        F: Fn(&Arc<V>) + Send + Sync + 'static,
    {
        self.inner.write().callback = Some(Arc::new(callback));
    }

    /// Removes the post-eviction callback.
    pub fn clear_post_eviction_callback(&self) {
        self.inner.write().callback = None;
    }

    /// Drops every entry without invoking the post-eviction callback.
    pub fn clear(&self) {
        self.inner.write().core.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.read().core.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn eviction_policy(&self) -> EvictionPolicy {
        self.policy
    }

    #[inline]
    pub fn low_watermark(&self) -> usize {
        self.watermarks.low()
    }

    #[inline]
    pub fn high_watermark(&self) -> usize {
        self.watermarks.high()
    }

    #[inline]
    pub fn watermarks(&self) -> Watermarks {
        self.watermarks
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.inner.read().core.metrics_snapshot()
    }
}

impl<K, V> Default for Cache<K, V, FxBuildHasher>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> fmt::Debug for Cache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.inner.read();
        f.debug_struct("Cache")
            .field("len", &shared.core.len())
            .field("policy", &self.policy)
            .field("low_watermark", &self.watermarks.low())
            .field("high_watermark", &self.watermarks.high())
            .field("has_callback", &shared.callback.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "metrics")]
impl<K, V, S> MetricsSnapshotProvider<CacheMetricsSnapshot> for Cache<K, V, S> {
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K, V, S> MetricsReset for Cache<K, V, S> {
    fn reset_metrics(&self) {
        self.inner.read().core.metrics().reset_metrics();
    }
}

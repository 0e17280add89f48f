//! Single-threaded cache engine: key index + eviction sequence + watermarks.
//!
//! `CacheCore` keeps two structures in lock-step:
//!
//! ```text
//!   KeyIndex<K, V>                         IntrusiveList<K>
//!   K -> { Arc<V>, position } ───────────► front [k0] ◄─► [k1] ◄─► [k2] back
//!                                          next victim           freshest
//! ```
//!
//! `len(index) == len(queue)` holds between calls. The one mutation that can
//! fail after touching the first structure is the index insert of a new key
//! (hashing or comparing a user key may panic); a `QueueRollback` guard
//! removes the just-appended node on that path.
//!
//! ## Operations
//!
//! | Method                  | Effect                                              |
//! |-------------------------|-----------------------------------------------------|
//! | `insert(k, v)`          | enforce watermarks, then replace-or-append at back  |
//! | `get(&k)`               | lookup; LRU moves the hit to the back               |
//! | `peek(&k)`              | lookup only                                         |
//! | `pop_front()`           | evict the front entry                               |
//! | `erase(&k)`             | remove one entry                                    |
//! | `clear()`               | drop everything, no eviction report                 |
//! | `visit(f)`              | front-to-back traversal, stops when `f` says so     |
//!
//! Evicted values are handed back to the caller in eviction order; the
//! thread-safe [`Cache`](crate::cache::Cache) forwards them to the
//! post-eviction callback after releasing its lock.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use rustc_hash::FxBuildHasher;
use tracing::{debug, trace};

use crate::ds::{IntrusiveList, SlotId};
use crate::error::InvariantError;
use crate::index::{IndexEntry, KeyIndex};
#[cfg(feature = "metrics")]
use crate::metrics::{
    CacheMetrics, CacheMetricsSnapshot, CoreMetricsRecorder, MetricsSnapshotProvider,
};
use crate::policy::{EvictionPolicy, Watermarks};

/// Upper bound on entries reserved up front from the high watermark.
const PREALLOC_LIMIT: usize = 1024;

/// Removes a freshly appended queue node unless released.
struct QueueRollback<'a, K> {
    queue: &'a mut IntrusiveList<K>,
    position: Option<SlotId>,
}

impl<'a, K> QueueRollback<'a, K> {
    fn new(queue: &'a mut IntrusiveList<K>, position: SlotId) -> Self {
        Self {
            queue,
            position: Some(position),
        }
    }

    fn release(mut self) {
        self.position = None;
    }
}

impl<K> Drop for QueueRollback<'_, K> {
    fn drop(&mut self) {
        if let Some(position) = self.position.take() {
            self.queue.remove(position);
        }
    }
}

/// Single-threaded watermark cache.
///
/// Not synchronized; wrap it in [`Cache`](crate::cache::Cache) for shared
/// use. Values are stored as `Arc<V>` so a handle returned by a lookup stays
/// valid after the entry is evicted.
pub struct CacheCore<K, V, S = FxBuildHasher> {
    index: KeyIndex<K, V, S>,
    queue: IntrusiveList<K>,
    policy: EvictionPolicy,
    watermarks: Watermarks,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> CacheCore<K, V, FxBuildHasher>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty core with the default hasher.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use watermark_cache::{CacheCore, EvictionPolicy, Watermarks};
    ///
    /// let mut core: CacheCore<u32, &str> = CacheCore::new(EvictionPolicy::Fifo, Watermarks::fixed(2));
    /// core.insert(1, Arc::new("a"));
    /// core.insert(2, Arc::new("b"));
    /// let evicted = core.insert(3, Arc::new("c"));
    /// assert_eq!(evicted.len(), 1);
    /// assert_eq!(*evicted[0], "a");
    /// ```
    pub fn new(policy: EvictionPolicy, watermarks: Watermarks) -> Self {
        Self::with_hasher(policy, watermarks, FxBuildHasher)
    }
}

impl<K, V, S> CacheCore<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    /// Creates an empty core hashing keys with `hasher`.
    pub fn with_hasher(policy: EvictionPolicy, watermarks: Watermarks, hasher: S) -> Self {
        let expected = if watermarks.is_unbounded() {
            0
        } else {
            watermarks.high().min(PREALLOC_LIMIT)
        };
        Self {
            index: KeyIndex::with_hasher(expected, hasher),
            queue: IntrusiveList::with_capacity(expected),
            policy,
            watermarks,
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::default(),
        }
    }

    /// Inserts or replaces `key`, returning the values evicted to make room.
    ///
    /// Watermarks are enforced against the size *before* the insert. An
    /// existing key keeps its entry but gets the new value and moves to the
    /// back of the queue under either policy.
    pub fn insert(&mut self, key: K, value: Arc<V>) -> Vec<Arc<V>> {
        let mut evicted = Vec::new();
        self.enforce_high_watermark(&mut evicted);

        if let Some(entry) = self.index.get_mut(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            entry.value = value;
            self.queue.move_to_back(entry.position);
        } else {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_new();

            let position = self.queue.push_back(key.clone());
            let rollback = QueueRollback::new(&mut self.queue, position);
            self.index.insert(key, IndexEntry { value, position });
            rollback.release();
        }

        debug_assert_eq!(self.index.len(), self.queue.len());
        evicted
    }

    /// Evicts from the front until the size is `low - 1`, if the size has
    /// reached the high watermark.
    fn enforce_high_watermark(&mut self, evicted: &mut Vec<Arc<V>>) {
        if !self.watermarks.needs_eviction(self.len()) {
            return;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let before = evicted.len();
        while self.watermarks.keep_evicting(self.len()) {
            match self.evict_front() {
                Some((_, value)) => evicted.push(value),
                None => break,
            }
        }

        let target = self.watermarks.eviction_target();
        debug_assert_eq!(self.len(), target, "eviction batch stopped early");
        debug!(
            policy = %self.policy,
            evicted = evicted.len() - before,
            len = self.len(),
            target,
            high = self.watermarks.high(),
            "high watermark reached"
        );
    }

    /// Removes the front entry from both structures.
    ///
    /// The index removal (which hashes the key) runs first; popping the
    /// queue cannot fail.
    fn evict_front(&mut self) -> Option<(K, Arc<V>)> {
        let front = self.queue.front()?;
        let entry = self.index.remove(front);
        debug_assert!(entry.is_some(), "queued key missing from index");
        let entry = entry?;
        debug_assert_eq!(self.queue.front_id(), Some(entry.position));
        let key = self.queue.pop_front()?;

        #[cfg(feature = "metrics")]
        self.metrics.record_evicted_entry();

        Some((key, entry.value))
    }

    /// Removes the front entry (next victim).
    pub fn pop_front(&mut self) -> Option<(K, Arc<V>)> {
        let popped = self.evict_front();

        #[cfg(feature = "metrics")]
        self.metrics.record_pop_front_call(popped.is_some());

        popped
    }

    /// Looks up `key`, moving it to the back of the queue under LRU.
    pub fn get<Q>(&mut self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (value, position) = self
            .lookup(key)
            .map(|(value, position)| (Arc::clone(value), position))?;
        if self.policy.reorders_on_access() && !self.is_back(position) {
            self.promote(position);
        }
        Some(value)
    }

    /// Looks up `key` without touching the eviction order.
    pub fn peek<Q>(&self, key: &Q) -> Option<&Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lookup(key).map(|(value, _)| value)
    }

    /// Returns the value and queue position of `key`, recording hit/miss.
    pub(crate) fn lookup<Q>(&self, key: &Q) -> Option<(&Arc<V>, SlotId)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.get(key) {
            Some(entry) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_hit();
                Some((&entry.value, entry.position))
            },
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                None
            },
        }
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains(key)
    }

    /// Removes `key`, returning its value.
    pub fn erase<Q>(&mut self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = match self.index.remove(key) {
            Some(entry) => {
                self.queue.remove(entry.position);
                trace!(len = self.len(), "erased entry");
                Some(entry.value)
            },
            None => None,
        };

        #[cfg(feature = "metrics")]
        {
            self.metrics.record_erase_call(removed.is_some());
            if removed.is_some() {
                self.metrics.record_evicted_entry();
            }
        }

        debug_assert_eq!(self.index.len(), self.queue.len());
        removed
    }
}

impl<K, V, S> CacheCore<K, V, S> {
    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    #[inline]
    pub fn watermarks(&self) -> Watermarks {
        self.watermarks
    }

    pub fn hasher(&self) -> &S {
        self.index.hasher()
    }

    /// Returns `true` if `position` is the last node of the queue.
    #[inline]
    pub(crate) fn is_back(&self, position: SlotId) -> bool {
        self.queue.is_back(position)
    }

    /// Moves the node at `position` to the back of the queue.
    pub(crate) fn promote(&mut self, position: SlotId) {
        if self.queue.move_to_back(position) {
            #[cfg(feature = "metrics")]
            self.metrics.record_promotion();
            trace!("promoted entry to back of eviction queue");
        }
    }

    /// Drops every entry. Nothing is reported as evicted.
    pub fn clear(&mut self) {
        let dropped = self.len();
        self.index.clear();
        self.queue.clear();

        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        debug!(dropped, "cache cleared");
    }

    /// Returns the keys in eviction order, front (next victim) first.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.queue.iter().cloned().collect()
    }

    #[cfg(feature = "metrics")]
    pub(crate) fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics
            .snapshot(self.len(), self.watermarks.low(), self.watermarks.high())
    }
}

impl<K, V, S> CacheCore<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Calls `visitor` for each entry front to back until it returns `false`.
    pub fn visit<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        for key in self.queue.iter() {
            let Some(entry) = self.index.get(key) else {
                debug_assert!(false, "queued key missing from index");
                continue;
            };
            if !visitor(key, &entry.value) {
                break;
            }
        }
    }

    /// Verifies that the index and the queue describe the same entries.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.queue.check_invariants()?;

        if self.index.len() != self.queue.len() {
            return Err(InvariantError::new(format!(
                "index holds {} entries, queue holds {}",
                self.index.len(),
                self.queue.len()
            )));
        }

        for (position, key) in self.queue.iter_entries() {
            match self.index.get(key) {
                None => return Err(InvariantError::new("queued key missing from index")),
                Some(entry) if entry.position != position => {
                    return Err(InvariantError::new(
                        "index position does not point at the key's queue node",
                    ));
                },
                Some(_) => {},
            }
        }

        if self.len() > self.watermarks.high() {
            return Err(InvariantError::new(format!(
                "len {} exceeds high watermark {}",
                self.len(),
                self.watermarks.high()
            )));
        }
        Ok(())
    }
}

impl<K, V, S> fmt::Debug for CacheCore<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheCore")
            .field("len", &self.len())
            .field("policy", &self.policy)
            .field("watermarks", &self.watermarks)
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for CacheCore<K, V, FxBuildHasher>
where
    K: Eq + Hash + Clone,
{
    /// LRU with eviction disabled.
    fn default() -> Self {
        Self::new(EvictionPolicy::Lru, Watermarks::UNBOUNDED)
    }
}

impl<K, V, S> Extend<(K, Arc<V>)> for CacheCore<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    /// Inserts each pair in order; evicted values are dropped.
    fn extend<T: IntoIterator<Item = (K, Arc<V>)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V, S> MetricsSnapshotProvider<CacheMetricsSnapshot> for CacheCore<K, V, S> {
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

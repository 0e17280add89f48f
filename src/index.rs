//! Key index: hash map from key to shared value and queue position.
//!
//! Each entry pairs the cached `Arc<V>` with the [`SlotId`] of the key's node
//! in the eviction sequence, so erase and promotion are O(1) without walking
//! the sequence.
//!
//! ```text
//!   KeyIndex                              IntrusiveList<K>
//!   ┌──────┬──────────────────────────┐
//!   │ "a"  │ Arc<V>, position ────────┼──► [ "a" ]
//!   │ "b"  │ Arc<V>, position ────────┼──► [ "b" ]
//!   └──────┴──────────────────────────┘
//! ```
//!
//! The index never touches the sequence; keeping the two in step is the
//! job of `CacheCore`.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use rustc_hash::FxBuildHasher;

use crate::ds::SlotId;

/// Value handle plus position of the key in the eviction sequence.
#[derive(Debug)]
pub struct IndexEntry<V> {
    pub value: Arc<V>,
    pub position: SlotId,
}

/// Map from key to [`IndexEntry`].
#[derive(Debug)]
pub struct KeyIndex<K, V, S = FxBuildHasher> {
    map: HashMap<K, IndexEntry<V>, S>,
}

impl<K, V, S> KeyIndex<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Creates an index with room for `capacity` entries.
    pub fn with_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, hasher),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&IndexEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut IndexEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get_mut(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Inserts an entry, returning the one it replaced.
    pub fn insert(&mut self, key: K, entry: IndexEntry<V>) -> Option<IndexEntry<V>> {
        self.map.insert(key, entry)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<IndexEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.remove(key)
    }
}

impl<K, V, S> KeyIndex<K, V, S> {
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn hasher(&self) -> &S {
        self.map.hasher()
    }
}

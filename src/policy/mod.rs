//! Eviction policy and watermark thresholds.
//!
//! Both policies share one physical structure: a sequence of keys whose front
//! is the next victim. They differ only in whether a successful lookup moves
//! the entry to the back.
//!
//! | Policy | `insert` (new or existing key) | `get` hit            |
//! |--------|--------------------------------|----------------------|
//! | LRU    | move / append to back          | move to back         |
//! | FIFO   | move / append to back          | order unchanged      |
//!
//! The policy is fixed for the lifetime of a cache and is plain data; the
//! engine branches on it where lock mode depends on it.

pub mod watermark;

use std::fmt;

pub use watermark::Watermarks;

/// Rule selecting the next eviction victim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EvictionPolicy {
    /// Least recently used: lookups refresh an entry's position.
    #[default]
    Lru,
    /// First in, first out: only inserts refresh an entry's position.
    Fifo,
}

impl EvictionPolicy {
    /// Returns `true` if a lookup hit repositions the entry.
    #[inline]
    pub fn reorders_on_access(self) -> bool {
        matches!(self, EvictionPolicy::Lru)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EvictionPolicy::Lru => "lru",
            EvictionPolicy::Fifo => "fifo",
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Low/high watermark thresholds.
//!
//! Eviction starts when an insert finds the cache holding `high` or more
//! entries and stops once the size drops to `low - 1`, so each batch frees
//! room for at least one insert and `len() <= high` holds after every insert.
//!
//! ```text
//!   len:  0 ........ low-1 | low ........ high-1 | high
//!                     ▲                              │
//!                     └──── evict from front ◄───────┘  (checked before insert)
//! ```
//!
//! `low == high` gives a fixed-capacity cache.

use crate::error::ConfigError;

/// Watermark pair with `1 <= low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Watermarks {
    low: usize,
    high: usize,
}

impl Watermarks {
    /// Both watermarks at `usize::MAX`: size-based eviction never triggers.
    pub const UNBOUNDED: Watermarks = Watermarks {
        low: usize::MAX,
        high: usize::MAX,
    };

    /// Creates a watermark pair.
    ///
    /// `1 <= low <= high` is a precondition; it is checked with
    /// `debug_assert!` only. Use [`try_new`](Self::try_new) for values that
    /// come from user input.
    #[inline]
    pub fn new(low: usize, high: usize) -> Self {
        debug_assert!(low >= 1, "low watermark must be >= 1");
        debug_assert!(high >= 1, "high watermark must be >= 1");
        debug_assert!(low <= high, "low watermark must not exceed high watermark");
        Self { low, high }
    }

    /// Validating constructor.
    pub fn try_new(low: usize, high: usize) -> Result<Self, ConfigError> {
        if low == 0 {
            return Err(ConfigError::new("low watermark must be >= 1"));
        }
        if high == 0 {
            return Err(ConfigError::new("high watermark must be >= 1"));
        }
        if low > high {
            return Err(ConfigError::new(format!(
                "low watermark ({}) must not exceed high watermark ({})",
                low, high
            )));
        }
        Ok(Self { low, high })
    }

    /// Fixed capacity: `low == high == capacity`.
    #[inline]
    pub fn fixed(capacity: usize) -> Self {
        Self::new(capacity, capacity)
    }

    #[inline]
    pub fn low(&self) -> usize {
        self.low
    }

    #[inline]
    pub fn high(&self) -> usize {
        self.high
    }

    /// Returns `true` if an insert at size `len` must evict first.
    #[inline]
    pub fn needs_eviction(&self, len: usize) -> bool {
        len >= self.high
    }

    /// Returns `true` while a running eviction batch should take another victim.
    #[inline]
    pub fn keep_evicting(&self, len: usize) -> bool {
        len > 0 && len >= self.low
    }

    /// Size an eviction batch stops at.
    #[inline]
    pub fn eviction_target(&self) -> usize {
        self.low - 1
    }

    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.high == usize::MAX
    }
}

impl Default for Watermarks {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

//! Error types for the watermark cache.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned by the fallible constructors when watermark
//!   parameters are invalid (zero, or `low > high`).
//! - [`InvariantError`]: Returned by `check_invariants` when the key index
//!   and the eviction sequence disagree.
//!
//! Lookups never produce errors: a missing key is `None` / `false`.
//!
//! ## Example Usage
//!
//! ```
//! use watermark_cache::error::ConfigError;
//! use watermark_cache::{Cache, EvictionPolicy};
//!
//! let cache: Result<Cache<u32, String>, ConfigError> =
//!     Cache::try_with_watermarks(EvictionPolicy::Lru, 3, 4);
//! assert!(cache.is_ok());
//!
//! let bad = Cache::<u32, String>::try_with_watermarks(EvictionPolicy::Lru, 5, 4);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// # Example
///
/// ```
/// use watermark_cache::{Cache, EvictionPolicy};
///
/// let err = Cache::<u64, u64>::try_with_watermarks(EvictionPolicy::Fifo, 0, 4).unwrap_err();
/// assert!(err.to_string().contains("low watermark"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

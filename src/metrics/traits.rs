//! # Metrics Traits
//!
//! ```text
//!   CacheCore ──record──► CoreMetricsRecorder (CacheMetrics)
//!                                  │
//!                              snapshot
//!                                  ▼
//!   Cache ──────────────► MetricsSnapshotProvider<CacheMetricsSnapshot>
//!                                  │
//!                                  ▼
//!                         MetricsExporter<CacheMetricsSnapshot>
//! ```
//!
//! All recorder methods take `&self`; implementations use interior
//! mutability so recording works under a shared lock.

/// Counters recorded by the cache engine.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&self);
    fn record_get_miss(&self);
    fn record_promotion(&self);
    fn record_lock_upgrade(&self);
    fn record_insert_new(&self);
    fn record_insert_update(&self);
    fn record_evict_call(&self);
    fn record_evicted_entry(&self);
    fn record_pop_front_call(&self, found: bool);
    fn record_erase_call(&self, found: bool);
    fn record_clear(&self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset metrics between tests or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&self);
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}

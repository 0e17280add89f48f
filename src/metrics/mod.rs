//! Operation counters for the cache (cargo feature `metrics`).
//!
//! Recording is split from consumption the same way the cache splits policy
//! from locking: the core records into [`CacheMetrics`] through
//! [`CoreMetricsRecorder`], callers read a [`CacheMetricsSnapshot`] through
//! [`MetricsSnapshotProvider`] and publish it with a [`MetricsExporter`].
//!
//! Counters are relaxed atomics: lookups record while holding only a shared
//! lock, so several threads may bump the same counter at once.

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use cell::MetricsCell;
pub use exporter::PrometheusTextExporter;
pub use metrics_impl::CacheMetrics;
pub use snapshot::CacheMetricsSnapshot;
pub use traits::{CoreMetricsRecorder, MetricsExporter, MetricsReset, MetricsSnapshotProvider};

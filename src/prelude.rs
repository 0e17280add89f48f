pub use crate::builder::CacheBuilder;
pub use crate::cache::{Cache, PostEvictionCallback, WeakCache};
pub use crate::engine::CacheCore;
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::{
    CacheMetricsSnapshot, MetricsExporter, MetricsSnapshotProvider, PrometheusTextExporter,
};
pub use crate::policy::{EvictionPolicy, Watermarks};

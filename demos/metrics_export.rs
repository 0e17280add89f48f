//! Example demonstrating metrics snapshots and Prometheus text export.
//!
//! Run with: cargo run --example metrics_export --features metrics

use watermark_cache::metrics::{MetricsExporter, MetricsSnapshotProvider, PrometheusTextExporter};
use watermark_cache::{Cache, EvictionPolicy};

fn main() {
    let cache: Cache<u64, u64> = Cache::with_watermarks(EvictionPolicy::Lru, 8, 16);

    for i in 0..64 {
        cache.insert(i, i * i);
        let _ = cache.get(&(i / 2));
    }
    let _ = cache.erase(&63);
    let _ = cache.pop_front();

    let snapshot = cache.snapshot();
    println!("hit rate: {:.2}", snapshot.hit_rate());
    println!("lock upgrades: {}", snapshot.lock_upgrades);
    println!();

    let exporter = PrometheusTextExporter::new("demo_cache", std::io::stdout());
    exporter.export(&snapshot);
}

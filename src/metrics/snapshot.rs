/// Point-in-time copy of the cache counters and gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub promotions: u64,
    pub lock_upgrades: u64,

    pub insert_calls: u64,
    pub insert_new: u64,
    pub insert_updates: u64,

    pub evict_calls: u64, // watermark batches that evicted at least one entry
    pub evicted_entries: u64, // entries removed by batches, pop_front and erase

    pub pop_front_calls: u64,
    pub pop_front_found: u64,
    pub erase_calls: u64,
    pub erase_found: u64,
    pub clears: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub low_watermark: usize,
    pub high_watermark: usize,
}

impl CacheMetricsSnapshot {
    /// Fraction of lookups that hit, or `0.0` before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}

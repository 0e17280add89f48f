use crate::metrics::cell::MetricsCell;
use crate::metrics::snapshot::CacheMetricsSnapshot;
use crate::metrics::traits::{CoreMetricsRecorder, MetricsReset};

#[derive(Debug, Default)]
pub struct CacheMetrics {
    pub get_hits: MetricsCell,
    pub get_misses: MetricsCell,
    pub promotions: MetricsCell,
    pub lock_upgrades: MetricsCell,
    pub insert_new: MetricsCell,
    pub insert_updates: MetricsCell,
    pub evict_calls: MetricsCell,
    pub evicted_entries: MetricsCell,
    pub pop_front_calls: MetricsCell,
    pub pop_front_found: MetricsCell,
    pub erase_calls: MetricsCell,
    pub erase_found: MetricsCell,
    pub clears: MetricsCell,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the counters; gauges are filled in by the caller.
    pub fn snapshot(
        &self,
        cache_len: usize,
        low_watermark: usize,
        high_watermark: usize,
    ) -> CacheMetricsSnapshot {
        let get_hits = self.get_hits.get();
        let get_misses = self.get_misses.get();
        let insert_new = self.insert_new.get();
        let insert_updates = self.insert_updates.get();
        CacheMetricsSnapshot {
            get_calls: get_hits + get_misses,
            get_hits,
            get_misses,
            promotions: self.promotions.get(),
            lock_upgrades: self.lock_upgrades.get(),
            insert_calls: insert_new + insert_updates,
            insert_new,
            insert_updates,
            evict_calls: self.evict_calls.get(),
            evicted_entries: self.evicted_entries.get(),
            pop_front_calls: self.pop_front_calls.get(),
            pop_front_found: self.pop_front_found.get(),
            erase_calls: self.erase_calls.get(),
            erase_found: self.erase_found.get(),
            clears: self.clears.get(),
            cache_len,
            low_watermark,
            high_watermark,
        }
    }
}

impl CoreMetricsRecorder for CacheMetrics {
    fn record_get_hit(&self) {
        self.get_hits.incr();
    }
    fn record_get_miss(&self) {
        self.get_misses.incr();
    }
    fn record_promotion(&self) {
        self.promotions.incr();
    }
    fn record_lock_upgrade(&self) {
        self.lock_upgrades.incr();
    }
    fn record_insert_new(&self) {
        self.insert_new.incr();
    }
    fn record_insert_update(&self) {
        self.insert_updates.incr();
    }
    fn record_evict_call(&self) {
        self.evict_calls.incr();
    }
    fn record_evicted_entry(&self) {
        self.evicted_entries.incr();
    }
    fn record_pop_front_call(&self, found: bool) {
        self.pop_front_calls.incr();
        if found {
            self.pop_front_found.incr();
        }
    }
    fn record_erase_call(&self, found: bool) {
        self.erase_calls.incr();
        if found {
            self.erase_found.incr();
        }
    }
    fn record_clear(&self) {
        self.clears.incr();
    }
}

impl MetricsReset for CacheMetrics {
    fn reset_metrics(&self) {
        for cell in [
            &self.get_hits,
            &self.get_misses,
            &self.promotions,
            &self.lock_upgrades,
            &self.insert_new,
            &self.insert_updates,
            &self.evict_calls,
            &self.evicted_entries,
            &self.pop_front_calls,
            &self.pop_front_found,
            &self.erase_calls,
            &self.erase_found,
            &self.clears,
        ] {
            cell.reset();
        }
    }
}

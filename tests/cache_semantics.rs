// ==============================================
// CACHE SEMANTICS TESTS (integration)
// ==============================================
//
// End-to-end behavior of the public `Cache` API: watermark batches, policy
// ordering, and post-eviction callback delivery.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use watermark_cache::{Cache, CacheBuilder, EvictionPolicy};

fn recording_cache<V>(
    policy: EvictionPolicy,
    low: usize,
    high: usize,
) -> (Cache<u32, V>, Arc<Mutex<Vec<V>>>)
where
    V: Clone + Send + Sync + 'static,
{
    let cache = Cache::with_watermarks(policy, low, high);
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    cache.set_post_eviction_callback(move |value: &Arc<V>| {
        sink.lock().unwrap().push(V::clone(value));
    });
    (cache, log)
}

// ==============================================
// Watermark batches
// ==============================================

mod watermarks {
    use super::*;

    #[test]
    fn session_cache_walkthrough() {
        let (cache, log) = recording_cache::<String>(EvictionPolicy::Lru, 3, 4);

        cache.insert(0, "Alex".to_string());
        cache.insert(1, "John".to_string());
        cache.insert(2, "Rob".to_string());
        assert_eq!(cache.len(), 3);

        assert_eq!(
            cache.try_get(&1, true).as_deref().map(String::as_str),
            Some("John")
        );
        assert_eq!(cache.len(), 3);

        cache.insert(3, "Jim".to_string());
        assert_eq!(cache.len(), 4);
        assert!(log.lock().unwrap().is_empty());

        cache.insert(4, "Jeff".to_string());
        assert_eq!(cache.len(), 3);
        assert_eq!(*log.lock().unwrap(), vec!["Alex", "Rob"]);
        assert_eq!(cache.keys(), vec![1, 3, 4]);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn len_never_exceeds_high_after_insert() {
        for (low, high) in [(1, 1), (1, 5), (3, 5), (5, 5), (2, 16)] {
            let cache: Cache<u32, u32> = Cache::with_watermarks(EvictionPolicy::Fifo, low, high);
            for k in 0..100 {
                cache.insert(k, k);
                assert!(cache.len() <= high, "low={} high={}", low, high);
            }
        }
    }

    #[test]
    fn each_batch_reaches_low_minus_one_before_insert() {
        let (cache, log) = recording_cache::<u32>(EvictionPolicy::Fifo, 4, 8);
        for k in 0..8 {
            cache.insert(k, k);
        }
        cache.insert(8, 8);
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn single_slot_cache_replaces_each_insert() {
        let (cache, log) = recording_cache::<u32>(EvictionPolicy::Lru, 1, 1);
        cache.insert(0, 0);
        cache.insert(1, 1);
        cache.insert(2, 2);
        assert_eq!(cache.keys(), vec![2]);
        assert_eq!(*log.lock().unwrap(), vec![0, 1]);
    }

    #[test]
    fn unbounded_default_never_evicts() {
        let cache: Cache<u32, u32> = Cache::new();
        let evictions = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&evictions);
        cache.set_post_eviction_callback(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        for k in 0..10_000 {
            cache.insert(k, k);
        }
        assert_eq!(cache.len(), 10_000);
        assert_eq!(evictions.load(Ordering::Relaxed), 0);
    }
}

// ==============================================
// Policy ordering
// ==============================================

mod ordering {
    use super::*;

    #[test]
    fn lru_access_protects_entry() {
        let (cache, log) = recording_cache::<&'static str>(EvictionPolicy::Lru, 2, 2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.get(&1);
        cache.insert(3, "c");
        assert_eq!(*log.lock().unwrap(), vec!["b"]);
        assert!(cache.contains(&1));
    }

    #[test]
    fn fifo_access_does_not_protect_entry() {
        let (cache, log) = recording_cache::<&'static str>(EvictionPolicy::Fifo, 2, 2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.get(&1);
        cache.insert(3, "c");
        assert_eq!(*log.lock().unwrap(), vec!["a"]);
        assert!(!cache.contains(&1));
    }

    #[test]
    fn lookup_without_reordering_leaves_victim_in_place() {
        let (cache, log) = recording_cache::<&'static str>(EvictionPolicy::Lru, 2, 2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.try_get(&1, false);
        cache.insert(3, "c");
        assert_eq!(*log.lock().unwrap(), vec!["a"]);
    }

    #[test]
    fn replacing_value_refreshes_position_under_fifo() {
        let (cache, log) = recording_cache::<&'static str>(EvictionPolicy::Fifo, 3, 3);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(1, "a2");
        assert_eq!(cache.keys(), vec![2, 1]);

        cache.insert(3, "c");
        cache.insert(4, "d");
        assert_eq!(*log.lock().unwrap(), vec!["b"]);
        assert_eq!(cache.keys(), vec![1, 3, 4]);
        assert_eq!(cache.get(&1).map(|v| *v), Some("a2"));
    }

    #[test]
    fn replacing_at_high_watermark_evicts_before_replace() {
        let (cache, log) = recording_cache::<&'static str>(EvictionPolicy::Fifo, 2, 2);
        cache.insert(1, "a");
        cache.insert(2, "b");

        // size 2 >= high: key 1 is evicted first, then comes back as a new entry
        cache.insert(1, "a2");
        assert_eq!(*log.lock().unwrap(), vec!["a"]);
        assert_eq!(cache.keys(), vec![2, 1]);
        assert_eq!(cache.peek(&1).map(|v| *v), Some("a2"));

        cache.insert(3, "c");
        assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
        assert_eq!(cache.keys(), vec![1, 3]);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn replacing_at_high_watermark_under_lru() {
        let (cache, log) = recording_cache::<u32>(EvictionPolicy::Lru, 2, 2);
        cache.insert(0, 0);
        cache.insert(1, 1);
        cache.insert(1, 11);
        assert_eq!(*log.lock().unwrap(), vec![0]);
        assert_eq!(cache.keys(), vec![1]);
        assert_eq!(cache.get(&1).map(|v| *v), Some(11));
    }

    #[test]
    fn visit_reports_front_to_back() {
        let cache = CacheBuilder::new()
            .policy(EvictionPolicy::Lru)
            .capacity(8)
            .build::<u32, u32>();
        for k in 0..5 {
            cache.insert(k, k * 10);
        }
        cache.get(&2);

        let mut seen = Vec::new();
        cache.visit(|k, v| {
            seen.push((*k, *v));
            true
        });
        assert_eq!(seen, vec![(0, 0), (1, 10), (3, 30), (4, 40), (2, 20)]);
    }
}

// ==============================================
// Callback delivery
// ==============================================

mod callback {
    use super::*;

    #[test]
    fn every_removal_path_reports_once() {
        let (cache, log) = recording_cache::<u32>(EvictionPolicy::Fifo, 2, 3);
        for k in 0..3 {
            cache.insert(k, k);
        }
        cache.insert(3, 3); // batch evicts 0, 1
        assert!(cache.erase(&3));
        assert!(cache.pop_front()); // 2
        assert!(!cache.pop_front());
        assert!(!cache.erase(&99));

        assert_eq!(*log.lock().unwrap(), vec![0, 1, 3, 2]);
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_reports_nothing() {
        let (cache, log) = recording_cache::<u32>(EvictionPolicy::Lru, 5, 10);
        for k in 0..9 {
            cache.insert(k, k);
        }
        cache.clear();
        assert!(cache.is_empty());
        assert!(log.lock().unwrap().is_empty());

        cache.insert(1, 1);
        assert_eq!(cache.keys(), vec![1]);
    }

    #[test]
    fn callback_receives_shared_handle() {
        let cache: Cache<u32, String> = Cache::with_watermarks(EvictionPolicy::Fifo, 1, 1);
        let original = Arc::new("payload".to_string());
        let matched = Arc::new(AtomicUsize::new(0));
        let expected = Arc::clone(&original);
        let hits = Arc::clone(&matched);
        cache.set_post_eviction_callback(move |value| {
            if Arc::ptr_eq(value, &expected) {
                hits.fetch_add(1, Ordering::SeqCst);
            }
        });

        cache.insert_arc(0, Arc::clone(&original));
        cache.insert(1, "next".to_string());
        assert_eq!(matched.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_can_insert_into_same_cache() {
        let cache: Cache<u32, u32> = Cache::with_watermarks(EvictionPolicy::Fifo, 2, 2);
        let handle = cache.downgrade();
        cache.set_post_eviction_callback(move |value| {
            // park evicted values under a shifted key, once
            if **value < 100 {
                if let Some(cache) = handle.upgrade() {
                    cache.insert(**value + 100, **value + 100);
                }
            }
        });

        cache.insert(0, 0);
        cache.insert(1, 1);
        cache.insert(2, 2);
        // 0 -> 100 evicts 1 -> 101 evicts 2 -> 102 evicts 100
        cache.check_invariants().unwrap();
        assert_eq!(cache.keys(), vec![101, 102]);

        let weak = cache.downgrade();
        drop(cache);
        assert!(weak.upgrade().is_none());
    }
}

#![no_main]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use libfuzzer_sys::fuzz_target;
use watermark_cache::{Cache, EvictionPolicy};

// Fuzz arbitrary operation sequences on Cache
//
// The first two bytes pick the policy and watermarks; the rest drive insert,
// get, try_get, erase, pop_front, visit, clear operations. Checks the size
// bound, callback accounting and index/queue consistency after every op.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let policy = if data[0] & 1 == 0 {
        EvictionPolicy::Lru
    } else {
        EvictionPolicy::Fifo
    };
    let high = usize::from(data[1] % 32) + 1;
    let low = usize::from(data[0] >> 1) % high + 1;

    let cache: Cache<u8, u32> = Cache::with_watermarks(policy, low, high);
    let reported = Arc::new(AtomicUsize::new(0));
    let counter = reported.clone();
    cache.set_post_eviction_callback(move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    let mut idx = 2;
    while idx + 1 < data.len() {
        let op = data[idx] % 8;
        let key = data[idx + 1] % 48;

        match op {
            0 | 1 => {
                // insert
                let before = cache.len();
                let existed = cache.contains(&key);
                let reported_before = reported.load(Ordering::Relaxed);
                cache.insert(key, u32::from(key));

                assert!(cache.len() <= high);
                assert_eq!(cache.peek(&key).map(|v| *v), Some(u32::from(key)));
                let evicted = reported.load(Ordering::Relaxed) - reported_before;
                if before >= high {
                    assert_eq!(evicted, before - (low - 1));
                } else {
                    assert_eq!(evicted, 0);
                    assert_eq!(cache.len(), if existed { before } else { before + 1 });
                }
            }
            2 => {
                // get
                let hit = cache.get(&key);
                if let Some(value) = hit {
                    assert_eq!(*value, u32::from(key));
                    if policy == EvictionPolicy::Lru {
                        assert_eq!(cache.keys().last(), Some(&key));
                    }
                }
            }
            3 => {
                // try_get without reordering
                let order = cache.keys();
                let _ = cache.try_get(&key, false);
                assert_eq!(cache.keys(), order);
            }
            4 => {
                // erase
                let before = cache.len();
                let removed = cache.erase(&key);
                assert_eq!(cache.len(), if removed { before - 1 } else { before });
                assert!(!cache.contains(&key));
            }
            5 => {
                // pop_front
                let front = cache.keys().first().copied();
                let popped = cache.pop_front();
                assert_eq!(popped, front.is_some());
                if let Some(front) = front {
                    assert!(!cache.contains(&front));
                }
            }
            6 => {
                // visit with early stop
                let limit = usize::from(key % 8);
                let mut seen = 0;
                cache.visit(|k, v| {
                    assert_eq!(u32::from(*k), *v);
                    seen += 1;
                    seen < limit
                });
                assert!(seen <= cache.len());
            }
            7 => {
                // clear
                let reported_before = reported.load(Ordering::Relaxed);
                cache.clear();
                assert!(cache.is_empty());
                assert_eq!(reported.load(Ordering::Relaxed), reported_before);
            }
            _ => unreachable!(),
        }

        assert!(cache.check_invariants().is_ok());
        idx += 2;
    }
});

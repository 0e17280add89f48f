//! Example demonstrating background refresh of stale entries.
//!
//! A worker thread periodically visits the cache from the oldest entry,
//! collects keys older than a freshness window and re-inserts fresh values,
//! while reader threads keep serving lookups.
//!
//! Run with: cargo run --example refresh_worker

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use watermark_cache::{Cache, EvictionPolicy};

#[derive(Debug)]
struct Quote {
    price: u64,
    fetched_at: Instant,
}

const MAX_AGE: Duration = Duration::from_millis(50);

fn fetch_quote(symbol: u32, generation: u64) -> Quote {
    Quote {
        price: u64::from(symbol) * 100 + generation,
        fetched_at: Instant::now(),
    }
}

fn main() {
    println!("=== Background Refresh Worker ===\n");

    // FIFO keeps the queue ordered by last (re)insert, i.e. by fetch time.
    let cache: Cache<u32, Quote> = Cache::with_watermarks(EvictionPolicy::Fifo, 64, 128);
    for symbol in 0..32 {
        cache.insert(symbol, fetch_quote(symbol, 0));
    }

    let stop = Arc::new(AtomicBool::new(false));
    let refreshed = Arc::new(AtomicU64::new(0));

    let worker = {
        let cache = cache.clone();
        let stop = Arc::clone(&stop);
        let refreshed = Arc::clone(&refreshed);
        thread::spawn(move || {
            let mut generation = 0;
            while !stop.load(Ordering::Relaxed) && !cache.is_empty() {
                thread::sleep(MAX_AGE / 2);
                generation += 1;

                let mut stale = Vec::new();
                cache.visit(|symbol, quote| {
                    if quote.fetched_at.elapsed() < MAX_AGE {
                        return false;
                    }
                    stale.push(*symbol);
                    true
                });

                // insert outside visit: the read lock is released by now
                for symbol in stale {
                    cache.insert(symbol, fetch_quote(symbol, generation));
                    refreshed.fetch_add(1, Ordering::Relaxed);
                }
            }
        })
    };

    let readers: Vec<_> = (0..4u32)
        .map(|reader| {
            let cache = cache.clone();
            thread::spawn(move || {
                let mut hits = 0;
                let deadline = Instant::now() + Duration::from_millis(300);
                while Instant::now() < deadline {
                    let symbol = (reader * 7 + hits) % 32;
                    if let Some(quote) = cache.get(&symbol) {
                        assert!(quote.price >= u64::from(symbol) * 100);
                        hits += 1;
                    }
                }
                hits
            })
        })
        .collect();

    for (reader, handle) in readers.into_iter().enumerate() {
        match handle.join() {
            Ok(hits) => println!("reader {} served {} lookups", reader, hits),
            Err(_) => println!("reader {} panicked", reader),
        }
    }

    stop.store(true, Ordering::Relaxed);
    let _ = worker.join();
    println!("\nworker refreshed {} entries", refreshed.load(Ordering::Relaxed));
    println!("cache still holds {} quotes", cache.len());
}

//! Example demonstrating FIFO eviction and the post-eviction callback.
//!
//! Run with: cargo run --example fifo_with_callback

use std::sync::{Arc, Mutex};

use watermark_cache::builder::CacheBuilder;
use watermark_cache::EvictionPolicy;

fn main() {
    println!("=== FIFO Cache with Post-Eviction Callback ===\n");

    let cache = CacheBuilder::new()
        .policy(EvictionPolicy::Fifo)
        .capacity(3)
        .build::<&'static str, Vec<u8>>();

    // Track bytes released by eviction, pop_front and erase
    let released = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&released);
    cache.set_post_eviction_callback(move |buf: &Arc<Vec<u8>>| {
        if let Ok(mut total) = sink.lock() {
            *total += buf.len();
        }
    });

    cache.insert("a", vec![0; 10]);
    cache.insert("b", vec![0; 20]);
    cache.insert("c", vec![0; 30]);

    // Lookups do not affect FIFO order
    cache.get(&"a");
    cache.insert("d", vec![0; 40]);
    println!("1. After inserting d: {:?}", cache.keys());

    cache.erase(&"c");
    println!("2. After erasing c:   {:?}", cache.keys());

    cache.pop_front();
    println!("3. After pop_front:   {:?}", cache.keys());

    // clear() never reports
    cache.clear();
    println!("4. After clear: len = {}", cache.len());

    println!("\nBytes reported to callback: {}", released.lock().map(|t| *t).unwrap_or(0));
}

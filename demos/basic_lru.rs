//! Example demonstrating an LRU cache with low/high watermarks.
//!
//! Run with: cargo run --example basic_lru

use std::sync::Arc;

use watermark_cache::{Cache, EvictionPolicy};

fn main() {
    println!("=== LRU Cache with Watermarks ===\n");

    // Evict once 4 entries are cached, down to low - 1 = 2 before the insert.
    let cache: Cache<u32, String> = Cache::with_watermarks(EvictionPolicy::Lru, 3, 4);
    cache.set_post_eviction_callback(|name: &Arc<String>| {
        println!("   evicted {}", name);
    });

    cache.insert(0, "Alex".to_string());
    cache.insert(1, "John".to_string());
    cache.insert(2, "Rob".to_string());
    println!("1. Inserted 3 users, len = {}", cache.len());

    // Access John so he moves to the back of the eviction queue
    if let Some(name) = cache.get(&1) {
        println!("2. Looked up user 1: {}", name);
    }

    cache.insert(3, "Jim".to_string());
    println!("3. Inserted Jim, len = {} (high watermark reached)", cache.len());

    println!("4. Inserting Jeff:");
    cache.insert(4, "Jeff".to_string());
    println!("   len = {}", cache.len());

    println!("5. Remaining, next victim first:");
    cache.visit(|id, name| {
        println!("   {} -> {}", id, name);
        true
    });
}

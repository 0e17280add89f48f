#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use watermark_cache::ds::{SlotArena, SlotId};

// Fuzz arbitrary operation sequences on SlotArena
//
// Keeps every handle ever issued, so removed and cleared handles are
// replayed as stale ids; they must never reach a reused slot.
fuzz_target!(|data: &[u8]| {
    let mut arena: SlotArena<u32> = SlotArena::new();
    let mut live: HashMap<SlotId, u32> = HashMap::new();
    let mut all_ids = Vec::new();

    let mut idx = 0;
    while idx + 1 < data.len() {
        let op = data[idx] % 5;
        let value = u32::from(data[idx + 1]);

        match op {
            0 => {
                // insert
                let id = arena.insert(value);
                assert!(!live.contains_key(&id), "handle reissued while live");
                all_ids.push(id);
                live.insert(id, value);
                assert_eq!(arena.get(id), Some(&value));
            }
            1 => {
                // remove
                if !all_ids.is_empty() {
                    let id = all_ids[(value as usize) % all_ids.len()];
                    assert_eq!(arena.remove(id), live.remove(&id));
                    assert!(!arena.contains(id));
                }
            }
            2 => {
                // get / contains
                if !all_ids.is_empty() {
                    let id = all_ids[(value as usize) % all_ids.len()];
                    assert_eq!(arena.get(id), live.get(&id));
                    assert_eq!(arena.contains(id), live.contains_key(&id));
                }
            }
            3 => {
                // get_mut
                if !all_ids.is_empty() {
                    let id = all_ids[(value as usize) % all_ids.len()];
                    match arena.get_mut(id) {
                        Some(slot) => {
                            *slot = value;
                            live.insert(id, value);
                        }
                        None => assert!(!live.contains_key(&id)),
                    }
                }
            }
            4 => {
                // clear
                arena.clear();
                live.clear();
                assert!(arena.is_empty());
            }
            _ => unreachable!(),
        }

        assert_eq!(arena.len(), live.len());
        idx += 2;
    }

    for id in &all_ids {
        assert_eq!(arena.get(*id), live.get(id));
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use watermark_cache::ds::IntrusiveList;

// Fuzz arbitrary operation sequences on IntrusiveList
//
// Mirrors the list against a Vec of (id, value) and checks order, lengths
// and link invariants after each push_back, pop_front, move_to_back,
// remove, get and clear.
fuzz_target!(|data: &[u8]| {
    let mut list: IntrusiveList<u32> = IntrusiveList::new();
    let mut model = Vec::new();
    let mut all_ids = Vec::new();

    let mut idx = 0;
    while idx + 1 < data.len() {
        let op = data[idx] % 6;
        let value = u32::from(data[idx + 1]);

        match op {
            0 => {
                // push_back
                let id = list.push_back(value);
                all_ids.push(id);
                model.push((id, value));

                assert_eq!(list.back(), Some(&value));
                assert_eq!(list.back_id(), Some(id));
                assert!(list.is_back(id));
            }
            1 => {
                // pop_front
                let expected = if model.is_empty() {
                    None
                } else {
                    Some(model.remove(0).1)
                };
                assert_eq!(list.pop_front(), expected);
            }
            2 => {
                // move_to_back
                if !all_ids.is_empty() {
                    let id = all_ids[(value as usize) % all_ids.len()];
                    let moved = list.move_to_back(id);
                    match model.iter().position(|(m, _)| *m == id) {
                        Some(pos) => {
                            assert!(moved);
                            let entry = model.remove(pos);
                            model.push(entry);
                            assert_eq!(list.back_id(), Some(id));
                        }
                        None => assert!(!moved),
                    }
                }
            }
            3 => {
                // remove, possibly with a stale id
                if !all_ids.is_empty() {
                    let id = all_ids[(value as usize) % all_ids.len()];
                    let removed = list.remove(id);
                    match model.iter().position(|(m, _)| *m == id) {
                        Some(pos) => assert_eq!(removed, Some(model.remove(pos).1)),
                        None => assert_eq!(removed, None),
                    }
                    assert!(!list.contains(id));
                }
            }
            4 => {
                // get
                if !all_ids.is_empty() {
                    let id = all_ids[(value as usize) % all_ids.len()];
                    let expected = model.iter().find(|(m, _)| *m == id).map(|(_, v)| v);
                    assert_eq!(list.get(id), expected);
                }
            }
            5 => {
                // clear; old ids stay in all_ids and must read as stale
                list.clear();
                model.clear();
                assert!(list.is_empty());
                assert_eq!(list.front(), None);
            }
            _ => unreachable!(),
        }

        assert_eq!(list.len(), model.len());
        assert_eq!(list.front_id(), model.first().map(|(id, _)| *id));
        let order: Vec<u32> = list.iter().copied().collect();
        let expected: Vec<u32> = model.iter().map(|(_, v)| *v).collect();
        assert_eq!(order, expected);
        assert!(list.check_invariants().is_ok());

        idx += 2;
    }
});

//! Seeded randomized stress tests against std models.

use std::collections::VecDeque;

use nexus_sequence::{ArrayList, CollectionError, Deque, LinkedList};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// ArrayList
// ============================================================================

#[test]
fn stress_array_list_random_operations() {
    let mut rng = SmallRng::seed_from_u64(12345);
    let mut list: ArrayList<u32> = ArrayList::new();
    let mut reference: Vec<u32> = Vec::new();

    for _ in 0..20_000 {
        let op = rng.random_range(0..100);
        let value = rng.random_range(0..64);

        if op < 35 {
            list.push(value).unwrap();
            reference.push(value);
        } else if op < 50 {
            let i = rng.random_range(0..=reference.len());
            list.insert(i, value).unwrap();
            reference.insert(i, value);
        } else if op < 70 {
            if reference.is_empty() {
                assert!(list.remove(0).is_err());
            } else {
                let i = rng.random_range(0..reference.len());
                assert_eq!(list.remove(i), Ok(reference.remove(i)));
            }
        } else if op < 75 {
            let from = rng.random_range(0..=reference.len());
            let to = rng.random_range(from..=reference.len());
            list.remove_range(from, to).unwrap();
            reference.drain(from..to);
        } else if op < 80 {
            let m = rng.random_range(2..6);
            let changed = list.remove_if(|&e| e % m == 0);
            let before = reference.len();
            reference.retain(|&e| e % m != 0);
            assert_eq!(changed, reference.len() != before);
        } else if op < 85 {
            let banned: Vec<u32> = (0..4).map(|_| rng.random_range(0..64)).collect();
            list.remove_all(&banned[..]);
            reference.retain(|e| !banned.contains(e));
        } else if op < 90 {
            if !reference.is_empty() {
                let i = rng.random_range(0..reference.len());
                assert_eq!(list.set(i, value), Ok(reference[i]));
                reference[i] = value;
            }
        } else if op < 93 {
            list.sort();
            reference.sort();
        } else if op < 96 {
            list.trim_to_size().unwrap();
            assert_eq!(list.capacity(), reference.len());
        } else if op < 98 {
            let items: Vec<u32> = (0..rng.random_range(0..8)).map(|_| rng.random_range(0..64)).collect();
            let i = rng.random_range(0..=reference.len());
            list.insert_all(i, items.clone()).unwrap();
            let tail = reference.split_off(i);
            reference.extend(items);
            reference.extend(tail);
        } else {
            list.clear();
            reference.clear();
        }

        assert_eq!(list.len(), reference.len());
    }

    assert_eq!(list.as_slice(), &reference[..]);
}

#[test]
fn stress_sub_list_random_operations() {
    let mut rng = SmallRng::seed_from_u64(99999);

    for _ in 0..200 {
        let n = rng.random_range(0..40);
        let mut list: ArrayList<u32> = (0..n).collect();
        let mut reference: Vec<u32> = (0..n).collect();

        let from = rng.random_range(0..=reference.len());
        let to = rng.random_range(from..=reference.len());
        let view = list.sub_list(from, to).unwrap();
        let mut size = to - from;

        for _ in 0..50 {
            let op = rng.random_range(0..100);
            let value = rng.random_range(100..200);

            if op < 30 {
                let i = rng.random_range(0..=size);
                view.insert(&mut list, i, value).unwrap();
                reference.insert(from + i, value);
                size += 1;
            } else if op < 60 {
                if size > 0 {
                    let i = rng.random_range(0..size);
                    assert_eq!(view.remove(&mut list, i), Ok(reference.remove(from + i)));
                    size -= 1;
                }
            } else if op < 70 {
                let lo = rng.random_range(0..=size);
                let hi = rng.random_range(lo..=size);
                view.remove_range(&mut list, lo, hi).unwrap();
                reference.drain(from + lo..from + hi);
                size -= hi - lo;
            } else if op < 80 {
                view.remove_if(&mut list, |&e| e % 3 == 0).unwrap();
                let window: Vec<u32> = reference.drain(from..from + size).filter(|e| e % 3 != 0).collect();
                size = window.len();
                let tail = reference.split_off(from);
                reference.extend(window);
                reference.extend(tail);
            } else if op < 90 {
                // Nested view over part of this one; changes cascade up
                let lo = rng.random_range(0..=size);
                let hi = rng.random_range(lo..=size);
                let inner = view.sub_list(lo, hi).unwrap();
                inner.add(&mut list, value).unwrap();
                reference.insert(from + hi, value);
                size += 1;
                assert_eq!(inner.len(&list), Ok(hi - lo + 1));
            } else {
                view.sort_by(&mut list, |a, b| b.cmp(a)).unwrap();
                reference[from..from + size].sort_by(|a, b| b.cmp(a));
            }

            assert_eq!(view.len(&list), Ok(size));
            assert_eq!(view.to_vec(&list).unwrap(), &reference[from..from + size]);
        }

        assert_eq!(list.as_slice(), &reference[..]);
    }
}

#[test]
fn stress_batch_remove_error_keeps_everything() {
    let mut rng = SmallRng::seed_from_u64(4242);

    for _ in 0..500 {
        let n = rng.random_range(1..64);
        let mut list: ArrayList<u32> = (0..n).collect();
        let fail_at = rng.random_range(0..n);
        let modulus = rng.random_range(2..5);

        let mut seen = 0;
        let result: Result<bool, CollectionError> = list.try_batch_remove(0, n as usize, false, |&e| {
            seen += 1;
            if e == fail_at {
                Err(CollectionError::InvalidArgument("membership failed"))
            } else {
                Ok(e % modulus == 0)
            }
        });
        assert!(result.is_err());

        // Elements tested before the failure may be gone; the rest survive in order
        let expected: Vec<u32> = (0..n).filter(|&e| e >= fail_at || e % modulus != 0).collect();
        assert_eq!(list.as_slice(), &expected[..]);
        assert_eq!(seen as u32, fail_at + 1);
    }
}

#[test]
fn stress_list_iter_random_walk() {
    let mut rng = SmallRng::seed_from_u64(777);
    let mut list: ArrayList<u32> = (0..50).collect();
    let mut reference: Vec<u32> = (0..50).collect();
    let mut it = list.list_iter(0).unwrap();
    let mut cursor = 0usize;
    let mut last: Option<usize> = None;

    for step in 0..5_000 {
        let op = rng.random_range(0..100);
        if op < 35 {
            let got = it.next(&list).unwrap().copied();
            assert_eq!(got, reference.get(cursor).copied());
            if got.is_some() {
                last = Some(cursor);
                cursor += 1;
            }
        } else if op < 65 {
            let got = it.previous(&list).unwrap().copied();
            if cursor == 0 {
                assert_eq!(got, None);
            } else {
                cursor -= 1;
                assert_eq!(got, Some(reference[cursor]));
                last = Some(cursor);
            }
        } else if op < 80 {
            match last.take() {
                Some(l) => {
                    assert_eq!(it.remove(&mut list), Ok(reference.remove(l)));
                    cursor = l;
                }
                None => assert_eq!(it.remove(&mut list), Err(CollectionError::IllegalState)),
            }
        } else if op < 90 {
            it.add(&mut list, 1000 + step).unwrap();
            reference.insert(cursor, 1000 + step);
            cursor += 1;
            last = None;
        } else if let Some(l) = last {
            assert_eq!(it.set(&mut list, 2000 + step), Ok(reference[l]));
            reference[l] = 2000 + step;
        }
        assert_eq!(it.next_index(), cursor);
    }

    assert_eq!(list.as_slice(), &reference[..]);
}

// ============================================================================
// LinkedList
// ============================================================================

#[test]
fn stress_linked_list_deque_operations() {
    let mut rng = SmallRng::seed_from_u64(31337);
    let mut list: LinkedList<u32> = LinkedList::new();
    let mut reference: VecDeque<u32> = VecDeque::new();

    for _ in 0..20_000 {
        let op = rng.random_range(0..100);
        let value = rng.random_range(0..1000);

        if op < 25 {
            list.add_first(value);
            reference.push_front(value);
        } else if op < 50 {
            list.add_last(value);
            reference.push_back(value);
        } else if op < 62 {
            assert_eq!(list.poll_first(), reference.pop_front());
        } else if op < 74 {
            assert_eq!(list.poll_last(), reference.pop_back());
        } else if op < 82 {
            if reference.is_empty() {
                assert_eq!(list.remove(0), Err(CollectionError::OutOfBounds { index: 0, len: 0 }));
            } else {
                let i = rng.random_range(0..reference.len());
                assert_eq!(list.remove(i).ok(), reference.remove(i));
            }
        } else if op < 92 {
            let i = rng.random_range(0..=reference.len());
            list.insert(i, value).unwrap();
            reference.insert(i, value);
        } else if op < 96 {
            let target = rng.random_range(0..1000);
            let pos = reference.iter().rposition(|&e| e == target);
            assert_eq!(list.remove_last_item(&target), pos.is_some());
            if let Some(p) = pos {
                reference.remove(p);
            }
        } else {
            assert_eq!(list.peek_first(), reference.front());
            assert_eq!(list.peek_last(), reference.back());
        }

        assert_eq!(list.len(), reference.len());
    }

    assert!(list.iter().eq(reference.iter()));
    assert!(list.descending_iter().eq(reference.iter().rev()));
}

#[test]
fn stress_linked_cursor_sweep_remove() {
    let mut rng = SmallRng::seed_from_u64(2024);

    for _ in 0..100 {
        let n = rng.random_range(0..200);
        let mut list: LinkedList<u32> = (0..n).collect();
        let modulus = rng.random_range(2..7);

        let mut it = list.list_iter(0).unwrap();
        while it.has_next(&list) {
            let e = *it.next(&list).unwrap().unwrap();
            if e % modulus == 0 {
                assert_eq!(it.remove(&mut list), Ok(e));
            }
        }

        let expected: Vec<u32> = (0..n).filter(|e| e % modulus != 0).collect();
        assert_eq!(list.to_vec(), expected);
    }
}

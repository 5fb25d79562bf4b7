//! # Integration Tests for Tetherset
//!
//! End-to-end tests that exercise the set and its cursors through the public
//! API with realistic workloads.

use rand::prelude::*;
use std::collections::BTreeSet;
use tetherset::{Cursor, Set};

// ===========================================================================
// Large Scale Operation Tests
// ===========================================================================

#[test]
fn large_scale_insert_and_lookup() {
	let mut set: Set<i32> = Set::new();
	let mut keys: Vec<i32> = (0..10_000).collect();
	keys.shuffle(&mut StdRng::seed_from_u64(1));

	for k in &keys {
		assert!(set.insert(*k).1);
	}

	set.assert_invariants();
	assert_eq!(set.len(), 10_000);

	for i in 0..10_000 {
		assert_eq!(set.find(&i).get(), i, "Failed to find key {}", i);
	}
	assert!(set.find(&10_000) == set.end());
}

#[test]
fn large_scale_insert_and_remove() {
	let mut set: Set<i32> = Set::new();
	let mut keys: Vec<i32> = (0..10_000).collect();
	keys.shuffle(&mut StdRng::seed_from_u64(2));

	for k in &keys {
		set.insert(*k);
	}
	keys.shuffle(&mut StdRng::seed_from_u64(3));
	for k in &keys {
		assert_eq!(set.remove(k), 1, "Failed to remove key {}", k);
	}

	set.assert_invariants();
	assert!(set.is_empty());
	assert_eq!(set.height(), 0);
}

#[test]
fn large_scale_random_operations() {
	let mut set: Set<i32> = Set::new();
	let mut rng = rand::rng();
	let mut expected: BTreeSet<i32> = BTreeSet::new();

	for _ in 0..10_000 {
		let key: i32 = rng.random_range(0..1000);
		match rng.random_range(0..4) {
			0 | 1 => assert_eq!(set.insert(key).1, expected.insert(key)),
			2 => assert_eq!(set.remove(&key), usize::from(expected.remove(&key))),
			_ => {
				let lb = set.lower_bound(&key);
				match expected.range(key..).next() {
					Some(v) => assert_eq!(lb.get(), *v),
					None => assert!(lb.is_end()),
				}
			}
		}
	}

	set.assert_invariants();
	assert_eq!(set.iter().collect::<Vec<_>>(), expected.into_iter().collect::<Vec<_>>());
}

// ===========================================================================
// Degenerate Shape Tests
// ===========================================================================

/// Sorted insertion builds a single right spine; nothing may recurse on it.
#[test]
fn ascending_insertion_builds_a_path() {
	let mut set: Set<u32> = Set::new();
	for i in 0..20_000 {
		set.insert(i);
	}
	assert_eq!(set.height(), 20_000);
	assert_eq!(set.first(), Some(0));
	assert_eq!(set.last(), Some(19_999));

	let copy = set.clone();
	assert_eq!(copy.height(), 20_000);
	assert_eq!(copy.len(), 20_000);

	set.clear();
	assert!(set.is_empty());
	drop(copy);
}

#[test]
fn descending_insertion_builds_a_path() {
	let mut set: Set<u32> = Set::new();
	for i in (0..20_000).rev() {
		set.insert(i);
	}
	assert_eq!(set.height(), 20_000);
	assert_eq!(set.lower_bound(&10_000).get(), 10_000);
	assert_eq!(set.upper_bound(&19_998).get(), 19_999);
	assert_eq!(set.iter().next_back(), Some(19_999));
}

// ===========================================================================
// Cursor Stability Tests
// ===========================================================================

#[test]
fn cursor_survives_erasing_its_neighbours() {
	let mut set: Set<i32> = (0..100).collect();
	let mut cursor = set.find(&50);

	for v in (0..100).filter(|v| *v != 50) {
		set.remove(&v);
		assert_eq!(cursor.get(), 50);
	}
	set.assert_invariants();

	assert!(cursor.clone().move_next().is_end());
	assert!(cursor == set.begin());
	cursor.move_next();
	assert!(cursor == set.end());
}

#[test]
fn cursor_sees_new_neighbours() {
	let mut set: Set<i32> = [10, 20].into_iter().collect();
	let mut cursor = set.find(&10);
	set.insert(15);
	cursor.move_next();
	assert_eq!(cursor.get(), 15);
	set.insert(12);
	cursor.move_prev();
	assert_eq!(cursor.get(), 12);
}

#[test]
fn end_cursor_survives_everything() {
	let mut set: Set<i32> = Set::new();
	let mut end = set.end();
	for i in 0..50 {
		set.insert(i);
	}
	assert_eq!(end.clone().move_prev().get(), 49);
	set.clear();
	assert!(end == set.end());
	set.insert(7);
	assert_eq!(end.move_prev().get(), 7);
	set.assert_invariants();
}

#[test]
fn erase_while_walking() {
	let mut set: Set<i32> = (0..1000).collect();
	let mut cursor = set.begin();
	while cursor != set.end() {
		if cursor.get() % 3 == 0 {
			cursor = set.erase(&cursor);
		} else {
			cursor.move_next();
		}
	}
	set.assert_invariants();
	assert!(set.iter().all(|v| v % 3 != 0));
	assert_eq!(set.len(), 666);
}

#[test]
fn many_cursors_on_one_element() {
	let mut set: Set<i32> = (0..10).collect();
	let cursors: Vec<Cursor<i32>> = (0..100).map(|_| set.find(&5)).collect();
	set.assert_invariants();

	set.remove(&4);
	set.remove(&6);
	assert!(cursors.iter().all(|c| c.get() == 5));

	set.remove(&5);
	assert!(cursors.iter().all(Cursor::is_singular));
	set.assert_invariants();
}

#[test]
fn dropped_cursors_deregister() {
	let mut set: Set<i32> = (0..10).collect();
	{
		let _a = set.find(&3);
		let _b = set.find(&3);
		let _c = set.end();
	}
	set.assert_invariants();
	set.remove(&3);
	set.assert_invariants();
}

#[test]
fn cursor_outlives_set() {
	let set: Set<i32> = (0..10).collect();
	let element = set.find(&3);
	let end = set.end();
	drop(set);
	assert!(element.is_singular());
	assert!(end.is_end());
}

// ===========================================================================
// Whole-Set Operation Tests
// ===========================================================================

#[test]
fn copy_then_mutate_both() {
	let original: Set<String> = (0..500).map(|i| format!("key_{:04}", i)).collect();
	let mut copy = original.clone();
	copy.assert_invariants();
	assert_eq!(copy, original);
	assert_eq!(copy.height(), original.height());

	copy.remove("key_0000");
	copy.insert("zzz".to_string());
	assert_eq!(original.len(), 500);
	assert!(original.contains("key_0000"));
	assert!(!original.contains("zzz"));
}

#[test]
fn swap_many_times() {
	let mut a: Set<i32> = (0..10).collect();
	let mut b: Set<i32> = (100..105).collect();
	let a_end = a.end();
	let b_first = b.begin();

	for round in 0..11 {
		a.swap(&mut b);
		a.assert_invariants();
		b.assert_invariants();
		assert!(a_end == a.end(), "end cursor moved in round {}", round);
	}

	// An odd number of swaps leaves b's old elements in a; their cursors
	// still belong to b.
	assert_eq!(a.len(), 5);
	assert_eq!(b_first.get(), 100);
	assert!(b_first.belongs_to(&b));
	assert!(!b_first.belongs_to(&a));
}

#[test]
fn erase_after_swap_uses_new_owner() {
	let mut a: Set<i32> = [1, 2, 3].into_iter().collect();
	let mut b: Set<i32> = [7, 8, 9].into_iter().collect();
	a.swap(&mut b);

	// Obtained from `a` after the swap, so it is erasable through `a`.
	let eight = a.find(&8);
	let next = a.erase(&eight);
	assert_eq!(next.get(), 9);
	assert_eq!(a.iter().collect::<Vec<_>>(), vec![7, 9]);
	assert_eq!(b.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn element_cursor_keeps_its_set_across_swap() {
	let mut a: Set<i32> = [1, 2, 3].into_iter().collect();
	let mut b: Set<i32> = [7, 8, 9].into_iter().collect();
	let mut two = a.find(&2);
	let a_begin = a.begin();
	a.swap(&mut b);

	assert!(two.belongs_to(&a));
	assert!(!two.belongs_to(&b));
	assert!(two != a.begin());

	// It still reads and walks the tree its element lives in.
	assert_eq!(two.get(), 2);
	two.move_next();
	assert_eq!(two.get(), 3);
	two.move_next();
	assert!(two.is_end());
	assert!(two != a.end());
	assert!(two != a_begin);

	// That end is b's, so stepping back reaches the last element b holds.
	two.move_prev();
	assert_eq!(two.get(), 3);

	// Swapping back reunites the cursor with its set.
	a.swap(&mut b);
	two.move_prev().move_prev();
	assert!(two == a_begin);
	let three = a.find(&3);
	let next = a.erase(&three);
	assert!(next == a.end());
	assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
#[should_panic(expected = "erase called with a cursor into a tree this set no longer holds")]
fn erase_with_cursor_swapped_away_panics() {
	let mut a: Set<i32> = [1, 2, 3].into_iter().collect();
	let mut b: Set<i32> = [7, 8, 9].into_iter().collect();
	let two = a.find(&2);
	a.swap(&mut b);
	a.erase(&two);
}

#[test]
fn extend_and_collect() {
	let mut set: Set<i32> = [3, 1].into_iter().collect();
	set.extend([2, 3, 4]);
	assert_eq!(set.len(), 4);
	assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
}

#[test]
fn default_set_is_empty() {
	let set: Set<i32> = Set::default();
	assert!(set.is_empty());
	assert_eq!(set.first(), None);
	assert_eq!(set.last(), None);
	assert_eq!(format!("{:?}", set), "{}");
}

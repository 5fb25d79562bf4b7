//! Serde round-trips through JSON.

use tetherset::Set;

#[test]
fn serializes_as_sorted_sequence() {
	let set: Set<i32> = [5, 3, 8, 1, 4].into_iter().collect();
	assert_eq!(serde_json::to_string(&set).unwrap(), "[1,3,4,5,8]");

	let empty: Set<i32> = Set::new();
	assert_eq!(serde_json::to_string(&empty).unwrap(), "[]");
}

#[test]
fn deserializes_unsorted_input_with_duplicates() {
	let set: Set<String> = serde_json::from_str(r#"["pear", "apple", "fig", "apple"]"#).unwrap();
	set.assert_invariants();
	assert_eq!(set.len(), 3);
	assert_eq!(set.iter().collect::<Vec<_>>(), vec!["apple", "fig", "pear"]);
}

#[test]
fn round_trip_keeps_contents() {
	let set: Set<u64> = (0..100).map(|i| i * 7 % 101).collect();
	let json = serde_json::to_string(&set).unwrap();
	let back: Set<u64> = serde_json::from_str(&json).unwrap();
	assert_eq!(back, set);
}

#[test]
fn rejects_non_sequences() {
	let result: Result<Set<i32>, _> = serde_json::from_str(r#"{"a": 1}"#);
	assert!(result.is_err());
}

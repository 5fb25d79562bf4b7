//! Allocation tracking and failure injection for tests.
//!
//! This module provides a custom global allocator that tracks allocation
//! counts and bytes allocated, and that can be told to refuse large
//! allocations. It is meant for test binaries that verify that nodes and
//! cursor bindings are reclaimed, and that the `try_*` operations leave a
//! set untouched when storage cannot grow.
//!
//! # Usage
//!
//! ```ignore
//! use tetherset::alloc::TrackingAllocator;
//!
//! #[global_allocator]
//! static ALLOC: TrackingAllocator = TrackingAllocator;
//!
//! #[test]
//! fn no_leaks() {
//!     tetherset::alloc::reset_counters();
//!
//!     let set: tetherset::Set<i32> = (0..100).collect();
//!     drop(set);
//!
//!     tetherset::alloc::check_no_leaks();
//! }
//! ```
//!
//! # Caveats
//!
//! - Counters and the failure threshold are global, so tests that read them
//!   must not run concurrently with other allocating tests
//! - Some allocations from the test harness itself may be counted

use std::alloc::{GlobalAlloc, Layout, System};
use std::ptr;
use std::sync::atomic::{AtomicIsize, AtomicUsize, Ordering};

/// Global allocation counter - total number of allocations.
pub static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Global deallocation counter - total number of deallocations.
pub static DEALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Current bytes allocated.
pub static BYTES_ALLOCATED: AtomicIsize = AtomicIsize::new(0);

/// Peak bytes allocated since last reset.
pub static PEAK_BYTES: AtomicUsize = AtomicUsize::new(0);

/// Requests of at least this many bytes are refused. `usize::MAX` disables
/// failure injection.
pub static FAIL_FROM_BYTES: AtomicUsize = AtomicUsize::new(usize::MAX);

/// Number of requests refused since last reset.
pub static REFUSED_COUNT: AtomicUsize = AtomicUsize::new(0);

/// A tracking allocator that counts allocations and deallocations and
/// refuses requests above the armed threshold.
pub struct TrackingAllocator;

impl TrackingAllocator {
	#[inline]
	fn refuse(size: usize) -> bool {
		if size >= FAIL_FROM_BYTES.load(Ordering::Relaxed) {
			REFUSED_COUNT.fetch_add(1, Ordering::Relaxed);
			return true;
		}
		false
	}

	#[inline]
	fn record_alloc(size: usize) {
		ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
		let current = BYTES_ALLOCATED.fetch_add(size as isize, Ordering::Relaxed) + size as isize;
		PEAK_BYTES.fetch_max(current.max(0) as usize, Ordering::Relaxed);
	}
}

unsafe impl GlobalAlloc for TrackingAllocator {
	unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
		if Self::refuse(layout.size()) {
			return ptr::null_mut();
		}
		let ptr = System.alloc(layout);
		if !ptr.is_null() {
			Self::record_alloc(layout.size());
		}
		ptr
	}

	unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
		DEALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
		BYTES_ALLOCATED.fetch_sub(layout.size() as isize, Ordering::Relaxed);
		System.dealloc(ptr, layout)
	}

	unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
		if Self::refuse(layout.size()) {
			return ptr::null_mut();
		}
		let ptr = System.alloc_zeroed(layout);
		if !ptr.is_null() {
			Self::record_alloc(layout.size());
		}
		ptr
	}

	unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
		// A refused realloc leaves the old block untouched.
		if new_size > layout.size() && Self::refuse(new_size) {
			return ptr::null_mut();
		}
		let new_ptr = System.realloc(ptr, layout, new_size);
		if !new_ptr.is_null() {
			let diff = new_size as isize - layout.size() as isize;
			let current = BYTES_ALLOCATED.fetch_add(diff, Ordering::Relaxed) + diff;
			PEAK_BYTES.fetch_max(current.max(0) as usize, Ordering::Relaxed);
		}
		new_ptr
	}
}

/// Refuses every request of at least `bytes` bytes until [`stop_failing`].
pub fn fail_from(bytes: usize) {
	FAIL_FROM_BYTES.store(bytes, Ordering::SeqCst);
}

/// Disables failure injection.
pub fn stop_failing() {
	FAIL_FROM_BYTES.store(usize::MAX, Ordering::SeqCst);
}

/// Runs `f` with requests of at least `bytes` bytes refused.
///
/// Failure injection is disabled again when `f` returns or panics.
pub fn with_failures_from<R>(bytes: usize, f: impl FnOnce() -> R) -> R {
	struct Disarm;
	impl Drop for Disarm {
		fn drop(&mut self) {
			stop_failing();
		}
	}

	let _disarm = Disarm;
	fail_from(bytes);
	f()
}

/// Resets all allocation counters to zero.
///
/// Call this at the beginning of a test to start fresh counting.
pub fn reset_counters() {
	ALLOC_COUNT.store(0, Ordering::SeqCst);
	DEALLOC_COUNT.store(0, Ordering::SeqCst);
	BYTES_ALLOCATED.store(0, Ordering::SeqCst);
	PEAK_BYTES.store(0, Ordering::SeqCst);
	REFUSED_COUNT.store(0, Ordering::SeqCst);
}

/// Returns the current allocation statistics.
pub fn get_stats() -> AllocationStats {
	AllocationStats {
		alloc_count: ALLOC_COUNT.load(Ordering::SeqCst),
		dealloc_count: DEALLOC_COUNT.load(Ordering::SeqCst),
		bytes_allocated: BYTES_ALLOCATED.load(Ordering::SeqCst),
		peak_bytes: PEAK_BYTES.load(Ordering::SeqCst),
		refused_count: REFUSED_COUNT.load(Ordering::SeqCst),
	}
}

/// Allocation statistics snapshot.
#[derive(Debug, Clone, Copy)]
pub struct AllocationStats {
	/// Total number of allocations since reset.
	pub alloc_count: usize,
	/// Total number of deallocations since reset.
	pub dealloc_count: usize,
	/// Current bytes allocated.
	pub bytes_allocated: isize,
	/// Peak bytes allocated since reset.
	pub peak_bytes: usize,
	/// Requests refused by failure injection since reset.
	pub refused_count: usize,
}

/// Checks that no memory has been leaked since the last reset.
///
/// # Panics
///
/// Panics if there are unmatched allocations or bytes still allocated.
pub fn check_no_leaks() {
	let stats = get_stats();
	let diff = stats.alloc_count as isize - stats.dealloc_count as isize;

	if diff != 0 {
		panic!(
			"Memory leak detected!\n\
             Allocations: {}\n\
             Deallocations: {}\n\
             Difference: {}\n\
             Bytes still allocated: {}",
			stats.alloc_count, stats.dealloc_count, diff, stats.bytes_allocated
		);
	}

	if stats.bytes_allocated != 0 {
		panic!(
			"Memory leak detected!\n\
             Bytes still allocated: {}\n\
             (alloc_count == dealloc_count but bytes != 0, possible size mismatch)",
			stats.bytes_allocated
		);
	}
}

/// Checks that allocation counts are balanced, allowing for a tolerance.
///
/// Useful when the test harness may allocate on another thread while the
/// counters are live.
pub fn check_balanced_with_tolerance(tolerance: usize) {
	let stats = get_stats();
	let diff = (stats.alloc_count as isize - stats.dealloc_count as isize).unsigned_abs();

	if diff > tolerance {
		panic!(
			"Memory leak detected (beyond tolerance of {})!\n\
             Allocations: {}\n\
             Deallocations: {}\n\
             Difference: {}",
			tolerance, stats.alloc_count, stats.dealloc_count, diff
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// These tests require TrackingAllocator to be the global allocator, which
	// is only the case in tests/memory_tests.rs.

	#[test]
	#[ignore = "requires TrackingAllocator to be set as global allocator"]
	fn tracking_allocator_basic() {
		reset_counters();

		let v1: Vec<u8> = vec![1, 2, 3, 4];
		let v2: Vec<u8> = vec![5, 6, 7, 8];

		let stats = get_stats();
		assert!(stats.alloc_count > 0);
		assert!(stats.bytes_allocated > 0);

		drop(v1);
		drop(v2);

		let stats = get_stats();
		assert_eq!(stats.alloc_count, stats.dealloc_count);
	}

	#[test]
	fn failure_injection_disarms_on_return() {
		let threshold = with_failures_from(1 << 20, || FAIL_FROM_BYTES.load(Ordering::SeqCst));
		assert_eq!(threshold, 1 << 20);
		assert_eq!(FAIL_FROM_BYTES.load(Ordering::SeqCst), usize::MAX);
	}
}

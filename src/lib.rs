//! # Tetherset: An Ordered Set with Stable Cursors
//!
//! This crate provides [`Set`], an ordered set of unique values stored in a
//! binary search tree, together with [`Cursor`], a position in the set that
//! stays valid while the set is mutated.
//!
//! ## Design Overview
//!
//! ### Key Concepts
//!
//! **Tethered cursors**: every cursor is registered with the node it sits on,
//! and every node keeps a registry of the cursors sitting on it. Inserting or
//! erasing other elements never disturbs a cursor. Erasing the element under
//! a cursor turns that cursor *singular*: it can no longer be dereferenced,
//! but it can still be dropped, compared or reassigned.
//!
//! **Root holder**: each set owns a value-less sentinel that anchors its tree
//! and is the position `end()` refers to. The sentinel never moves, so end
//! cursors keep meaning "the end of this set" even across [`Set::swap`].
//!
//! **Arena storage**: nodes live in an arena and link to each other by index.
//! Erasing a node only relinks its neighbours; no surviving node ever changes
//! slot, which is what keeps the cursor registries simple.
//!
//! **Plain BST**: the tree is deliberately not self-balancing. Operations
//! cost O(height), and height is O(n) for sorted insertion orders. All
//! traversal, teardown and copy algorithms are iterative, so degenerate trees
//! cost time but never stack.
//!
//! ### Structure
//!
//! ```text
//!   Set ──► RootHolder (sentinel, end() registry)
//!               │
//!               ▼
//!             Grove ──► Nodes arena
//!                          ┌─────────┐
//!                          │ 5  [c1] │   <- registry: cursors on this node
//!                          └────┬────┘
//!                      ┌────────┴────────┐
//!                 ┌─────────┐       ┌─────────┐
//!                 │ 3  []   │       │ 8  [c2] │
//!                 └─────────┘       └─────────┘
//! ```
//!
//! ## Basic Usage
//!
//! ```
//! use tetherset::Set;
//!
//! let mut set = Set::new();
//! for v in [5, 3, 8, 1, 4] {
//!     set.insert(v);
//! }
//! assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 3, 4, 5, 8]);
//!
//! let five = set.find(&5);
//! assert_eq!(set.lower_bound(&4).get(), 4);
//! assert_eq!(set.upper_bound(&4).get(), 5);
//!
//! set.remove(&3);
//! assert_eq!(set.len(), 4);
//! assert_eq!(five.get(), 5);
//! ```
//!
//! ## Thread Safety
//!
//! None. A set and its cursors share state through `Rc` and `RefCell` and are
//! neither `Send` nor `Sync`.

use std::borrow::Borrow;
use std::fmt;
use std::rc::Rc;

use log::{debug, trace};

pub mod alloc;
mod binding;
pub mod cursor;
pub mod error;
pub mod iter;
mod node;
#[cfg(feature = "serde")]
mod serde_impl;
mod tree;

pub use binding::INLINE_BINDINGS;
pub use cursor::{Cursor, RevCursor};
pub use error::{Error, Result};
pub use iter::{IntoIter, Iter};

use binding::Position;
use error::{infallible, Fallibility};
use node::{NodeId, Nodes, Probe};
use tree::{Grove, RootHolder};

/// Direction of a single cursor step.
#[derive(Debug, PartialEq, Copy, Clone)]
pub(crate) enum Direction {
	/// Toward larger values.
	Forward,
	/// Toward smaller values.
	Reverse,
}

// ---------------------------------------------------------------------------
// Core Set Structure
// ---------------------------------------------------------------------------

/// An ordered set of unique values whose cursors survive mutation.
///
/// # Type Parameters
///
/// - `T`: The element type. Operations that compare elements require
///   `T: Ord`; lookups accept any `Q` that `T` borrows as.
///
/// # Complexity
///
/// `insert`, `erase`, `find`, `lower_bound` and `upper_bound` are
/// O(height). `swap` is O(1). `clone`, `clear` and drop are O(n).
pub struct Set<T> {
	holder: Rc<RootHolder<T>>,
}

impl<T> Set<T> {
	// -----------------------------------------------------------------------
	// Construction
	// -----------------------------------------------------------------------

	/// Creates an empty set. Does not allocate node storage.
	///
	/// # Example
	///
	/// ```
	/// use tetherset::Set;
	///
	/// let set: Set<i32> = Set::new();
	/// assert!(set.is_empty());
	/// assert!(set.begin() == set.end());
	/// ```
	pub fn new() -> Self {
		Set {
			holder: RootHolder::new(Nodes::new()),
		}
	}

	/// Creates an empty set with room for `capacity` elements.
	pub fn with_capacity(capacity: usize) -> Self {
		Set {
			holder: RootHolder::new(Nodes::with_capacity(capacity)),
		}
	}

	fn from_nodes(nodes: Nodes<T>) -> Self {
		Set {
			holder: RootHolder::new(nodes),
		}
	}

	#[inline]
	pub(crate) fn holder(&self) -> &Rc<RootHolder<T>> {
		&self.holder
	}

	#[inline]
	fn grove(&self) -> Rc<Grove<T>> {
		self.holder.grove()
	}

	// -----------------------------------------------------------------------
	// Metadata
	// -----------------------------------------------------------------------

	/// Returns the number of elements.
	pub fn len(&self) -> usize {
		self.grove().nodes.borrow().len
	}

	/// Returns `true` if the set contains no elements.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the number of elements the set can hold without reallocating.
	pub fn capacity(&self) -> usize {
		self.grove().nodes.borrow().capacity()
	}

	/// Returns the height of the tree: 0 when empty, `len()` at worst.
	///
	/// The tree is not rebalanced, so the height depends on insertion order.
	///
	/// ```
	/// use tetherset::Set;
	///
	/// let sorted: Set<i32> = (0..8).collect();
	/// assert_eq!(sorted.height(), 8);
	///
	/// let bushy: Set<i32> = [4, 2, 6, 1, 3, 5, 7].into_iter().collect();
	/// assert_eq!(bushy.height(), 3);
	/// ```
	pub fn height(&self) -> usize {
		self.grove().nodes.borrow().height()
	}

	/// Reserves room for at least `additional` more elements.
	pub fn reserve(&mut self, additional: usize) {
		let grove = self.grove();
		let result = grove.nodes.borrow_mut().reserve_exact(additional, Fallibility::Infallible);
		infallible(result);
	}

	/// Like [`Set::reserve`], but reports allocation failure.
	pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
		let grove = self.grove();
		let result = grove.nodes.borrow_mut().reserve_exact(additional, Fallibility::Fallible);
		result.inspect_err(|err| debug!("set reserve of {additional} failed: {err}"))
	}

	// -----------------------------------------------------------------------
	// Positions
	// -----------------------------------------------------------------------

	fn cursor_at(&self, grove: &Rc<Grove<T>>, id: Option<NodeId>) -> Cursor<T> {
		let position = match id {
			Some(id) => Position::Node(grove.clone(), id),
			None => Position::End(self.holder.clone()),
		};
		Cursor::new(self.holder.clone(), position)
	}

	/// Returns a cursor at the smallest element, or `end()` if empty.
	pub fn begin(&self) -> Cursor<T> {
		let grove = self.grove();
		let first = {
			let nodes = grove.nodes.borrow();
			nodes.root.map(|root| nodes.first(root))
		};
		self.cursor_at(&grove, first)
	}

	/// Returns the cursor past the largest element.
	///
	/// All end cursors of a set compare equal, before and after any
	/// mutation or swap.
	pub fn end(&self) -> Cursor<T> {
		Cursor::new(self.holder.clone(), Position::End(self.holder.clone()))
	}

	/// Returns a reverse cursor at the largest element.
	pub fn rbegin(&self) -> RevCursor<T> {
		RevCursor::new(self.end())
	}

	/// Returns the reverse cursor past the smallest element.
	pub fn rend(&self) -> RevCursor<T> {
		RevCursor::new(self.begin())
	}

	/// Returns an iterator over clones of the elements, in order.
	pub fn iter(&self) -> Iter<'_, T> {
		Iter::new(self)
	}

	// -----------------------------------------------------------------------
	// Lookup
	// -----------------------------------------------------------------------

	/// Returns a cursor at the element equal to `key`, or `end()`.
	pub fn find<Q>(&self, key: &Q) -> Cursor<T>
	where
		T: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		let grove = self.grove();
		let found = grove.nodes.borrow().find(key);
		self.cursor_at(&grove, found)
	}

	/// Returns `true` if the set contains an element equal to `key`.
	pub fn contains<Q>(&self, key: &Q) -> bool
	where
		T: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		self.grove().nodes.borrow().find(key).is_some()
	}

	/// Returns a cursor at the first element not less than `key`, or `end()`.
	pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<T>
	where
		T: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		let grove = self.grove();
		let found = grove.nodes.borrow().lower_bound(key);
		self.cursor_at(&grove, found)
	}

	/// Returns a cursor at the first element greater than `key`, or `end()`.
	pub fn upper_bound<Q>(&self, key: &Q) -> Cursor<T>
	where
		T: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		let grove = self.grove();
		let found = grove.nodes.borrow().upper_bound(key);
		self.cursor_at(&grove, found)
	}

	/// Returns a clone of the smallest element.
	pub fn first(&self) -> Option<T>
	where
		T: Clone,
	{
		let grove = self.grove();
		let nodes = grove.nodes.borrow();
		nodes.root.map(|root| nodes.value(nodes.first(root)).clone())
	}

	/// Returns a clone of the largest element.
	pub fn last(&self) -> Option<T>
	where
		T: Clone,
	{
		let grove = self.grove();
		let nodes = grove.nodes.borrow();
		nodes.root.map(|root| nodes.value(nodes.last(root)).clone())
	}

	// -----------------------------------------------------------------------
	// Removal
	// -----------------------------------------------------------------------

	/// Removes the element under `pos` and returns a cursor at its successor.
	///
	/// Every cursor on the erased element, `pos` included, becomes singular.
	/// Cursors on other elements are untouched. Never allocates node
	/// storage.
	///
	/// # Panics
	///
	/// Panics if `pos` belongs to another set, is singular, or is the end
	/// cursor. Also panics if `pos` sits on an element that a
	/// [`Set::swap`] moved into the other set.
	///
	/// # Example
	///
	/// ```
	/// use tetherset::Set;
	///
	/// let mut set: Set<i32> = [1, 2, 3].into_iter().collect();
	/// let two = set.find(&2);
	/// let next = set.erase(&two);
	/// assert_eq!(next.get(), 3);
	/// assert!(two.is_singular());
	/// ```
	pub fn erase(&mut self, pos: &Cursor<T>) -> Cursor<T> {
		assert!(pos.belongs_to(self), "erase called with a cursor of another set");
		let grove = self.grove();
		let id = match pos.binding().position() {
			Position::Node(held, id) if Rc::ptr_eq(&held, &grove) => id,
			Position::Node(..) => {
				panic!("erase called with a cursor into a tree this set no longer holds")
			}
			Position::End(_) => panic!("erase called with the end cursor"),
			Position::Singular => panic!("erase called with a singular cursor"),
		};
		let next = grove.nodes.borrow().next(id);
		Self::erase_node(&grove, id);
		self.cursor_at(&grove, next)
	}

	/// Removes the element equal to `key`. Returns the number of elements
	/// removed: 0 or 1.
	pub fn remove<Q>(&mut self, key: &Q) -> usize
	where
		T: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		let grove = self.grove();
		let found = grove.nodes.borrow().find(key);
		match found {
			Some(id) => {
				Self::erase_node(&grove, id);
				1
			}
			None => 0,
		}
	}

	fn erase_node(grove: &Rc<Grove<T>>, id: NodeId) {
		let (value, registry) = grove.nodes.borrow_mut().detach(id);
		binding::invalidate(registry);
		drop(value);
	}

	/// Removes every element. Every cursor on an element becomes singular;
	/// end cursors stay at the end.
	pub fn clear(&mut self) {
		let grove = self.grove();
		let freed = grove.nodes.borrow_mut().teardown();
		if freed > 0 {
			trace!("cleared set, freed {freed} nodes");
		}
	}

	// -----------------------------------------------------------------------
	// Whole-Set Operations
	// -----------------------------------------------------------------------

	/// Exchanges the contents of two sets in O(1).
	///
	/// Every cursor keeps belonging to the set it was obtained from. End
	/// cursors of `self` now bound what used to be `other`'s elements.
	/// Cursors on elements keep reading those elements, which now live in
	/// the other set's tree; stepping them walks that tree, and neither set
	/// can erase through them.
	///
	/// Note that `std::mem::swap` on two sets moves the whole objects
	/// instead, identities included.
	///
	/// ```
	/// use tetherset::Set;
	///
	/// let mut a: Set<i32> = [1, 2].into_iter().collect();
	/// let mut b: Set<i32> = [7, 8, 9].into_iter().collect();
	/// let mut a_end = a.end();
	///
	/// a.swap(&mut b);
	/// assert_eq!(a.len(), 3);
	/// assert!(a_end.belongs_to(&a));
	/// assert_eq!(a_end.move_prev().get(), 9);
	/// ```
	pub fn swap(&mut self, other: &mut Set<T>) {
		RootHolder::exchange(&self.holder, &other.holder);
		trace!("swapped set contents");
	}

	/// Deep-copies the set, reporting allocation failure.
	///
	/// On failure nothing is left behind and `self` is untouched.
	pub fn try_clone(&self) -> Result<Self>
	where
		T: Clone,
	{
		self.copy_with(Fallibility::Fallible)
	}

	fn copy_with(&self, fallibility: Fallibility) -> Result<Self>
	where
		T: Clone,
	{
		let grove = self.grove();
		let copied = grove.nodes.borrow().duplicate(fallibility);
		match copied {
			Ok(nodes) => Ok(Set::from_nodes(nodes)),
			Err(err) => {
				debug!("set copy failed: {err}");
				Err(err)
			}
		}
	}

	/// Replaces the contents of `self` with a copy of `source`.
	///
	/// Implemented as copy-then-swap: cursors of `self` keep belonging to
	/// `self`; cursors on its old elements become singular.
	pub fn assign(&mut self, source: &Set<T>)
	where
		T: Clone,
	{
		let mut copy = infallible(source.copy_with(Fallibility::Infallible));
		self.swap(&mut copy);
		trace!("assigned set of {} elements", self.len());
	}

	/// Like [`Set::assign`], but reports allocation failure, in which case
	/// `self` is unchanged.
	pub fn try_assign(&mut self, source: &Set<T>) -> Result<()>
	where
		T: Clone,
	{
		let mut copy = source.copy_with(Fallibility::Fallible)?;
		self.swap(&mut copy);
		trace!("assigned set of {} elements", self.len());
		Ok(())
	}
}

impl<T: Ord> Set<T> {
	// -----------------------------------------------------------------------
	// Insertion
	// -----------------------------------------------------------------------

	/// Inserts `value` and returns a cursor at it with `true`, or a cursor at
	/// the equal element already present with `false` (and `value` dropped).
	///
	/// Existing cursors are never affected.
	///
	/// # Example
	///
	/// ```
	/// use tetherset::Set;
	///
	/// let mut set = Set::new();
	/// let (first, inserted) = set.insert("a");
	/// assert!(inserted);
	/// let (again, inserted) = set.insert("a");
	/// assert!(!inserted);
	/// assert!(first == again);
	/// ```
	pub fn insert(&mut self, value: T) -> (Cursor<T>, bool) {
		infallible(self.insert_with(value, Fallibility::Infallible))
	}

	/// Like [`Set::insert`], but reports allocation failure. On failure the
	/// set is unchanged and `value` is dropped.
	///
	/// Reported failures are node storage growth and, when `value` is
	/// already present, growth of that element's cursor registry. The
	/// returned cursor's own binding is a small `Rc` allocation that aborts
	/// on exhaustion like any `Rc::new`.
	pub fn try_insert(&mut self, value: T) -> Result<(Cursor<T>, bool)> {
		self.insert_with(value, Fallibility::Fallible)
	}

	fn insert_with(&mut self, value: T, fallibility: Fallibility) -> Result<(Cursor<T>, bool)> {
		let grove = self.grove();
		let cursor = Cursor::unbound(self.holder.clone());

		let (id, inserted) = {
			let mut nodes = grove.nodes.borrow_mut();
			match nodes.probe(&value) {
				Probe::Found(id) => (id, false),
				Probe::Vacant(slot) => {
					if let Err(err) = nodes.reserve_one(fallibility) {
						debug!("insert failed to reserve node storage: {err}");
						return Err(err);
					}
					(nodes.attach(value, slot), true)
				}
			}
		};

		let at = Position::Node(grove, id);
		if inserted {
			// A fresh leaf has an empty registry with inline room.
			infallible(cursor.binding().rebind(at, Fallibility::Infallible));
		} else if let Err(err) = cursor.binding().rebind(at, fallibility) {
			debug!("insert failed to bind the returned cursor: {err}");
			return Err(err);
		}
		Ok((cursor, inserted))
	}
}

impl<T> Default for Set<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Drop for Set<T> {
	fn drop(&mut self) {
		self.clear();
	}
}

impl<T: Clone> Clone for Set<T> {
	fn clone(&self) -> Self {
		infallible(self.copy_with(Fallibility::Infallible))
	}

	fn clone_from(&mut self, source: &Self) {
		self.assign(source);
	}
}

impl<T: fmt::Debug> fmt::Debug for Set<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let grove = self.grove();
		let nodes = grove.nodes.borrow();
		let mut set = f.debug_set();
		nodes.for_each(|value| {
			set.entry(value);
		});
		set.finish()
	}
}

impl<T: PartialEq> PartialEq for Set<T> {
	fn eq(&self, other: &Self) -> bool {
		let (ga, gb) = (self.grove(), other.grove());
		let (a, b) = (ga.nodes.borrow(), gb.nodes.borrow());
		if a.len != b.len {
			return false;
		}
		let mut x = a.root.map(|root| a.first(root));
		let mut y = b.root.map(|root| b.first(root));
		while let (Some(i), Some(j)) = (x, y) {
			if a.value(i) != b.value(j) {
				return false;
			}
			x = a.next(i);
			y = b.next(j);
		}
		true
	}
}

impl<T: Eq> Eq for Set<T> {}

impl<T: Ord> FromIterator<T> for Set<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		let mut set = Set::new();
		set.extend(iter);
		set
	}
}

impl<T: Ord> Extend<T> for Set<T> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		for value in iter {
			self.insert(value);
		}
	}
}

impl<'a, T: Clone> IntoIterator for &'a Set<T> {
	type Item = T;
	type IntoIter = Iter<'a, T>;

	fn into_iter(self) -> Iter<'a, T> {
		self.iter()
	}
}

impl<T> IntoIterator for Set<T> {
	type Item = T;
	type IntoIter = IntoIter<T>;

	/// Moves the elements out in order. Cursors on them become singular.
	fn into_iter(self) -> IntoIter<T> {
		let grove = self.grove();
		let values = grove.nodes.borrow_mut().drain_in_order();
		IntoIter::new(values)
	}
}

// ===========================================================================
// Test-Only Validation
// ===========================================================================

/// Invariant validation for testing.
#[cfg(any(test, feature = "test-utils"))]
impl<T: Ord + fmt::Debug> Set<T> {
	/// Validates all structural and binding invariants. Panics with
	/// diagnostic info if any is violated.
	///
	/// # Invariants Checked
	///
	/// 1. Ownership: the set's grove points back at the set's root holder
	/// 2. Links: every child links back to its parent; the root has none
	/// 3. Ordering: in-order values are strictly increasing
	/// 4. Length: `len()` matches the number of reachable nodes
	/// 5. Storage: every slot is either reachable or on the free list
	/// 6. Bindings: every registry entry is a live cursor positioned on the
	///    node (or root holder) that records it
	pub fn assert_invariants(&self) {
		let grove = self.grove();
		assert!(grove.is_held_by(&self.holder), "grove does not point back at its root holder");

		let nodes = grove.nodes.borrow();
		nodes.assert_structure();

		for id in nodes.ids_in_order() {
			let here = Position::Node(grove.clone(), id);
			for weak in nodes.node(id).registry.borrow().iter() {
				let binding = weak.upgrade().expect("registry holds a dropped cursor");
				assert!(
					binding.is_at(&here),
					"cursor registered on {:?} is positioned elsewhere",
					nodes.value(id)
				);
			}
		}

		let end = Position::End(self.holder.clone());
		for weak in self.holder.registry.borrow().iter() {
			let binding = weak.upgrade().expect("end registry holds a dropped cursor");
			assert!(binding.is_at(&end), "cursor registered at end is positioned elsewhere");
		}
	}
}

//! # Node Arena and Tree Algorithms
//!
//! Nodes live in a `Vec` of [`Slot`]s and link to each other by [`NodeId`]
//! (a slot index) instead of by pointer. A slot is either occupied by a
//! [`Node`] or vacant; vacant slots form an intrusive free list, so freeing
//! a node never allocates.
//!
//! Every algorithm here is iterative. The tree is a plain unbalanced BST and
//! may be a single path of `n` nodes, so recursion over its height is not an
//! option for descent, teardown or copy.
//!
//! A node whose `parent` is `None` is the root: it hangs off the root holder,
//! which lives outside the arena (see `tree.rs`).

use std::borrow::Borrow;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::mem;

use crate::binding::{self, Registry};
use crate::error::{Fallibility, Result};

/// Index of a slot in the node arena.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub(crate) struct NodeId(usize);

/// Which child slot of a parent a node occupies.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub(crate) enum Side {
	Left,
	Right,
}

/// Result of descending the tree for an insertion.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub(crate) enum Probe {
	/// An equal value is already stored at this node.
	Found(NodeId),
	/// The value belongs in this empty child slot. `None` is the root slot
	/// of an empty tree.
	Vacant(Option<(NodeId, Side)>),
}

/// One stored element.
pub(crate) struct Node<T> {
	pub(crate) value: T,
	pub(crate) left: Option<NodeId>,
	pub(crate) right: Option<NodeId>,
	pub(crate) parent: Option<NodeId>,
	/// Cursors positioned on this node.
	pub(crate) registry: RefCell<Registry<T>>,
}

impl<T> Node<T> {
	fn leaf(value: T, parent: Option<NodeId>) -> Self {
		Node {
			value,
			left: None,
			right: None,
			parent,
			registry: RefCell::new(Registry::new()),
		}
	}
}

/// An arena slot: a live node, or a link in the free list.
pub(crate) enum Slot<T> {
	Occupied(Node<T>),
	Vacant(Option<NodeId>),
}

impl<T> Slot<T> {
	#[inline]
	fn as_node(&self) -> &Node<T> {
		match self {
			Slot::Occupied(node) => node,
			Slot::Vacant(_) => unreachable!("vacant slot reached through a live link"),
		}
	}

	#[inline]
	fn as_node_mut(&mut self) -> &mut Node<T> {
		match self {
			Slot::Occupied(node) => node,
			Slot::Vacant(_) => unreachable!("vacant slot reached through a live link"),
		}
	}
}

/// The node arena of one tree, with its root slot and element count.
pub(crate) struct Nodes<T> {
	slots: Vec<Slot<T>>,
	free: Option<NodeId>,
	pub(crate) root: Option<NodeId>,
	pub(crate) len: usize,
}

impl<T> Nodes<T> {
	pub(crate) fn new() -> Self {
		Nodes {
			slots: Vec::new(),
			free: None,
			root: None,
			len: 0,
		}
	}

	pub(crate) fn with_capacity(capacity: usize) -> Self {
		Nodes {
			slots: Vec::with_capacity(capacity),
			..Nodes::new()
		}
	}

	#[inline]
	pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
		self.slots[id.0].as_node()
	}

	#[inline]
	pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
		self.slots[id.0].as_node_mut()
	}

	#[inline]
	pub(crate) fn value(&self, id: NodeId) -> &T {
		&self.node(id).value
	}

	/// Number of nodes the arena can hold without reallocating.
	pub(crate) fn capacity(&self) -> usize {
		self.slots.capacity()
	}

	// -----------------------------------------------------------------------
	// Traversal
	// -----------------------------------------------------------------------

	/// Leftmost node of the subtree rooted at `id`.
	pub(crate) fn first(&self, mut id: NodeId) -> NodeId {
		while let Some(left) = self.node(id).left {
			id = left;
		}
		id
	}

	/// Rightmost node of the subtree rooted at `id`.
	pub(crate) fn last(&self, mut id: NodeId) -> NodeId {
		while let Some(right) = self.node(id).right {
			id = right;
		}
		id
	}

	/// In-order successor. `None` means the root holder, i.e. the end.
	pub(crate) fn next(&self, id: NodeId) -> Option<NodeId> {
		if let Some(right) = self.node(id).right {
			return Some(self.first(right));
		}
		let mut child = id;
		let mut parent = self.node(id).parent;
		while let Some(p) = parent {
			if self.node(p).right != Some(child) {
				break;
			}
			child = p;
			parent = self.node(p).parent;
		}
		parent
	}

	/// In-order predecessor. `None` means `id` is the first element.
	pub(crate) fn prev(&self, id: NodeId) -> Option<NodeId> {
		if let Some(left) = self.node(id).left {
			return Some(self.last(left));
		}
		let mut child = id;
		let mut parent = self.node(id).parent;
		while let Some(p) = parent {
			if self.node(p).left != Some(child) {
				break;
			}
			child = p;
			parent = self.node(p).parent;
		}
		parent
	}

	/// Calls `f` on every value in order.
	pub(crate) fn for_each(&self, mut f: impl FnMut(&T)) {
		let mut cur = self.root.map(|root| self.first(root));
		while let Some(id) = cur {
			f(self.value(id));
			cur = self.next(id);
		}
	}

	/// Length of the longest root-to-leaf path, counted in nodes.
	pub(crate) fn height(&self) -> usize {
		let mut height = 0;
		let mut depth = 0;
		let mut cur = self.root;
		let mut from: Option<NodeId> = None;
		// Parent-pointer walk: no stack needed however deep the tree is.
		while let Some(id) = cur {
			let node = self.node(id);
			if from == node.parent {
				depth += 1;
				height = height.max(depth);
				if let Some(left) = node.left {
					from = Some(id);
					cur = Some(left);
					continue;
				}
				if let Some(right) = node.right {
					from = Some(id);
					cur = Some(right);
					continue;
				}
			} else if from == node.left {
				if let Some(right) = node.right {
					from = Some(id);
					cur = Some(right);
					continue;
				}
			}
			depth -= 1;
			from = Some(id);
			cur = node.parent;
		}
		height
	}

	// -----------------------------------------------------------------------
	// Lookup
	// -----------------------------------------------------------------------

	/// Node holding a value equal to `key`.
	pub(crate) fn find<Q>(&self, key: &Q) -> Option<NodeId>
	where
		T: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		let mut cur = self.root;
		while let Some(id) = cur {
			let node = self.node(id);
			cur = match key.cmp(node.value.borrow()) {
				Ordering::Less => node.left,
				Ordering::Greater => node.right,
				Ordering::Equal => return Some(id),
			};
		}
		None
	}

	/// First node whose value is not less than `key`.
	pub(crate) fn lower_bound<Q>(&self, key: &Q) -> Option<NodeId>
	where
		T: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		let mut best = None;
		let mut cur = self.root;
		while let Some(id) = cur {
			let node = self.node(id);
			if key.cmp(node.value.borrow()) == Ordering::Greater {
				cur = node.right;
			} else {
				best = Some(id);
				cur = node.left;
			}
		}
		best
	}

	/// First node whose value is greater than `key`.
	pub(crate) fn upper_bound<Q>(&self, key: &Q) -> Option<NodeId>
	where
		T: Borrow<Q>,
		Q: ?Sized + Ord,
	{
		let mut best = None;
		let mut cur = self.root;
		while let Some(id) = cur {
			let node = self.node(id);
			if key.cmp(node.value.borrow()) == Ordering::Less {
				best = Some(id);
				cur = node.left;
			} else {
				cur = node.right;
			}
		}
		best
	}

	// -----------------------------------------------------------------------
	// Insertion
	// -----------------------------------------------------------------------

	/// Descends to where `value` is stored or would be attached.
	///
	/// Only compares; the arena is not touched, so a panicking `Ord`
	/// leaves the tree as it was.
	pub(crate) fn probe(&self, value: &T) -> Probe
	where
		T: Ord,
	{
		let mut slot = None;
		let mut cur = self.root;
		while let Some(id) = cur {
			let node = self.node(id);
			match value.cmp(&node.value) {
				Ordering::Less => {
					slot = Some((id, Side::Left));
					cur = node.left;
				}
				Ordering::Greater => {
					slot = Some((id, Side::Right));
					cur = node.right;
				}
				Ordering::Equal => return Probe::Found(id),
			}
		}
		Probe::Vacant(slot)
	}

	/// Makes sure one more node can be stored without allocating.
	pub(crate) fn reserve_one(&mut self, fallibility: Fallibility) -> Result<()> {
		if self.free.is_some() {
			return Ok(());
		}
		match fallibility {
			Fallibility::Fallible => self.slots.try_reserve(1)?,
			Fallibility::Infallible => self.slots.reserve(1),
		}
		Ok(())
	}

	/// Reserves room for `additional` nodes beyond the ones already stored.
	pub(crate) fn reserve_exact(&mut self, additional: usize, fallibility: Fallibility) -> Result<()> {
		match fallibility {
			Fallibility::Fallible => self.slots.try_reserve_exact(additional)?,
			Fallibility::Infallible => self.slots.reserve_exact(additional),
		}
		Ok(())
	}

	/// Links a new leaf into the child slot found by [`Nodes::probe`].
	///
	/// Call [`Nodes::reserve_one`] first; this never reallocates then.
	pub(crate) fn attach(&mut self, value: T, slot: Option<(NodeId, Side)>) -> NodeId {
		let parent = slot.map(|(parent, _)| parent);
		let id = self.alloc(Node::leaf(value, parent));
		match slot {
			None => self.root = Some(id),
			Some((parent, Side::Left)) => self.node_mut(parent).left = Some(id),
			Some((parent, Side::Right)) => self.node_mut(parent).right = Some(id),
		}
		self.len += 1;
		id
	}

	fn alloc(&mut self, node: Node<T>) -> NodeId {
		match self.free {
			Some(id) => {
				let slot = mem::replace(&mut self.slots[id.0], Slot::Occupied(node));
				self.free = match slot {
					Slot::Vacant(next) => next,
					Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
				};
				id
			}
			None => {
				self.slots.push(Slot::Occupied(node));
				NodeId(self.slots.len() - 1)
			}
		}
	}

	/// Frees the slot of a node that is already unlinked from the tree.
	///
	/// Returns the value and the registry so the caller can invalidate the
	/// cursors and drop the value outside any borrow of the arena.
	fn release(&mut self, id: NodeId) -> (T, Registry<T>) {
		let slot = mem::replace(&mut self.slots[id.0], Slot::Vacant(self.free));
		self.free = Some(id);
		match slot {
			Slot::Occupied(node) => (node.value, node.registry.into_inner()),
			Slot::Vacant(_) => unreachable!("released a vacant slot"),
		}
	}

	// -----------------------------------------------------------------------
	// Erasure
	// -----------------------------------------------------------------------

	/// Joins two subtrees where every value of `left` is less than every
	/// value of `right`.
	///
	/// The minimum of `right` becomes the new subtree root. The caller fixes
	/// the returned root's parent link.
	pub(crate) fn merge(&mut self, left: Option<NodeId>, right: Option<NodeId>) -> Option<NodeId> {
		let (left, right) = match (left, right) {
			(None, right) => return right,
			(left, None) => return left,
			(Some(left), Some(right)) => (left, right),
		};

		let min = self.first(right);
		if min != right {
			// `min` is a left child; its right subtree takes its place.
			let parent = self.node(min).parent.expect("minimum below subtree root has a parent");
			let rest = self.node(min).right;
			self.node_mut(parent).left = rest;
			if let Some(rest) = rest {
				self.node_mut(rest).parent = Some(parent);
			}
			self.node_mut(min).right = Some(right);
			self.node_mut(right).parent = Some(min);
		}
		self.node_mut(min).left = Some(left);
		self.node_mut(left).parent = Some(min);
		Some(min)
	}

	/// Points `parent`'s link to `old` (or the root slot) at `new`.
	fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
		match parent {
			None => self.root = new,
			Some(parent) => {
				let node = self.node_mut(parent);
				if node.left == Some(old) {
					node.left = new;
				} else {
					node.right = new;
				}
			}
		}
	}

	/// Unlinks and frees node `id`, merging its children into its place.
	///
	/// Never allocates. Only links move: every other node keeps its slot,
	/// so cursors on other nodes stay where they are.
	pub(crate) fn detach(&mut self, id: NodeId) -> (T, Registry<T>) {
		let (left, right, parent) = {
			let node = self.node(id);
			(node.left, node.right, node.parent)
		};
		let merged = self.merge(left, right);
		self.replace_child(parent, id, merged);
		if let Some(merged) = merged {
			self.node_mut(merged).parent = parent;
		}
		self.len -= 1;
		self.release(id)
	}

	/// Frees every node, children before parents, turning every cursor on
	/// them singular. Returns the number of nodes freed.
	///
	/// The walk follows parent links and consumes child links as it goes
	/// down, so it needs neither recursion nor a stack.
	pub(crate) fn teardown(&mut self) -> usize {
		let mut freed = 0;
		let mut cur = self.root.take();
		while let Some(id) = cur {
			let node = self.node_mut(id);
			if let Some(left) = node.left.take() {
				cur = Some(left);
				continue;
			}
			if let Some(right) = node.right.take() {
				cur = Some(right);
				continue;
			}
			cur = node.parent;
			let (value, registry) = self.release(id);
			binding::invalidate(registry);
			drop(value);
			freed += 1;
		}
		self.slots.clear();
		self.free = None;
		self.len = 0;
		freed
	}

	/// Moves every value out in order, leaving the arena empty.
	///
	/// Cursors still registered on the nodes are turned singular.
	pub(crate) fn drain_in_order(&mut self) -> Vec<T> {
		let mut order = Vec::with_capacity(self.len);
		let mut cur = self.root.map(|root| self.first(root));
		while let Some(id) = cur {
			order.push(id);
			cur = self.next(id);
		}

		let mut values = Vec::with_capacity(order.len());
		for id in order {
			let (value, registry) = self.release(id);
			binding::invalidate(registry);
			values.push(value);
		}
		self.slots.clear();
		self.free = None;
		self.root = None;
		self.len = 0;
		values
	}

	// -----------------------------------------------------------------------
	// Copy
	// -----------------------------------------------------------------------

	/// Deep-copies the tree, preserving its shape.
	///
	/// All storage is reserved up front, so the only failure points are that
	/// reservation and `T::clone`. Either way the partially built copy is
	/// simply dropped and `self` is never touched.
	pub(crate) fn duplicate(&self, fallibility: Fallibility) -> Result<Nodes<T>>
	where
		T: Clone,
	{
		let mut out = Nodes::new();
		out.reserve_exact(self.len, fallibility)?;

		let Some(root) = self.root else {
			return Ok(out);
		};

		// Walk source and copy in lockstep; a missing child on the copy side
		// means that subtree has not been visited yet.
		let mut src = root;
		let mut dst = out.alloc(Node::leaf(self.value(root).clone(), None));
		out.root = Some(dst);
		loop {
			let s = self.node(src);
			let d = out.node(dst);
			if let (Some(left), None) = (s.left, d.left) {
				let child = out.alloc(Node::leaf(self.value(left).clone(), Some(dst)));
				out.node_mut(dst).left = Some(child);
				src = left;
				dst = child;
			} else if let (Some(right), None) = (s.right, d.right) {
				let child = out.alloc(Node::leaf(self.value(right).clone(), Some(dst)));
				out.node_mut(dst).right = Some(child);
				src = right;
				dst = child;
			} else {
				match (s.parent, d.parent) {
					(Some(sp), Some(dp)) => {
						src = sp;
						dst = dp;
					}
					_ => break,
				}
			}
		}
		out.len = self.len;
		Ok(out)
	}

	// -----------------------------------------------------------------------
	// Validation
	// -----------------------------------------------------------------------

	/// Iterates the ids of all live nodes reachable from the root, in order.
	#[cfg(any(test, feature = "test-utils"))]
	pub(crate) fn ids_in_order(&self) -> Vec<NodeId> {
		let mut ids = Vec::with_capacity(self.len);
		let mut cur = self.root.map(|root| self.first(root));
		while let Some(id) = cur {
			ids.push(id);
			cur = self.next(id);
		}
		ids
	}

	/// Checks link symmetry, ordering and the element count.
	#[cfg(any(test, feature = "test-utils"))]
	pub(crate) fn assert_structure(&self)
	where
		T: Ord + std::fmt::Debug,
	{
		if let Some(root) = self.root {
			assert_eq!(self.node(root).parent, None, "root {:?} has a parent link", root);
		}

		let ids = self.ids_in_order();
		assert_eq!(ids.len(), self.len, "len {} != reachable nodes {}", self.len, ids.len());

		for id in &ids {
			let node = self.node(*id);
			for child in [node.left, node.right].into_iter().flatten() {
				assert_eq!(
					self.node(child).parent,
					Some(*id),
					"child {:?} of {:?} does not link back",
					child,
					id
				);
			}
		}

		for pair in ids.windows(2) {
			let (a, b) = (self.value(pair[0]), self.value(pair[1]));
			assert!(a < b, "values out of order: {:?} >= {:?}", a, b);
		}

		let mut vacant = 0;
		let mut cur = self.free;
		while let Some(id) = cur {
			cur = match &self.slots[id.0] {
				Slot::Vacant(next) => *next,
				Slot::Occupied(_) => panic!("free list reaches occupied slot {:?}", id),
			};
			vacant += 1;
		}
		assert_eq!(vacant + self.len, self.slots.len(), "slots leaked from the free list");
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn build(values: &[i32]) -> Nodes<i32> {
		let mut nodes = Nodes::new();
		for &v in values {
			match nodes.probe(&v) {
				Probe::Found(_) => {}
				Probe::Vacant(slot) => {
					nodes.reserve_one(Fallibility::Infallible).unwrap();
					nodes.attach(v, slot);
				}
			}
		}
		nodes
	}

	fn values(nodes: &Nodes<i32>) -> Vec<i32> {
		let mut out = Vec::new();
		nodes.for_each(|v| out.push(*v));
		out
	}

	#[test]
	fn probe_and_attach() {
		let nodes = build(&[5, 3, 8, 1, 4]);
		nodes.assert_structure();
		assert_eq!(values(&nodes), vec![1, 3, 4, 5, 8]);
		assert!(matches!(nodes.probe(&4), Probe::Found(_)));
		let four = nodes.find(&4).unwrap();
		assert_eq!(nodes.probe(&6), Probe::Vacant(Some((nodes.find(&8).unwrap(), Side::Left))));
		assert_eq!(nodes.node(four).parent, nodes.find(&3));
	}

	#[test]
	fn empty_probe_targets_root_slot() {
		let nodes: Nodes<i32> = Nodes::new();
		assert_eq!(nodes.probe(&1), Probe::Vacant(None));
		assert_eq!(nodes.find(&1), None);
		assert_eq!(nodes.height(), 0);
	}

	#[test]
	fn successor_and_predecessor() {
		let nodes = build(&[5, 3, 8, 1, 4, 7, 9]);
		let mut cur = Some(nodes.first(nodes.root.unwrap()));
		let mut seen = Vec::new();
		while let Some(id) = cur {
			seen.push(*nodes.value(id));
			cur = nodes.next(id);
		}
		assert_eq!(seen, vec![1, 3, 4, 5, 7, 8, 9]);

		let mut cur = Some(nodes.last(nodes.root.unwrap()));
		let mut seen = Vec::new();
		while let Some(id) = cur {
			seen.push(*nodes.value(id));
			cur = nodes.prev(id);
		}
		assert_eq!(seen, vec![9, 8, 7, 5, 4, 3, 1]);
	}

	#[test]
	fn bounds() {
		let nodes = build(&[10, 20, 30]);
		let val = |id: Option<NodeId>| id.map(|id| *nodes.value(id));
		assert_eq!(val(nodes.lower_bound(&20)), Some(20));
		assert_eq!(val(nodes.upper_bound(&20)), Some(30));
		assert_eq!(val(nodes.lower_bound(&5)), Some(10));
		assert_eq!(val(nodes.lower_bound(&25)), Some(30));
		assert_eq!(val(nodes.upper_bound(&30)), None);
		assert_eq!(val(nodes.lower_bound(&31)), None);
	}

	#[test]
	fn merge_with_deep_successor() {
		// 5 has children 2 and 9; the minimum of 9's subtree is 6, two levels down.
		let mut nodes = build(&[5, 2, 9, 7, 6, 8, 10]);
		let five = nodes.find(&5).unwrap();
		let (value, registry) = nodes.detach(five);
		assert_eq!(value, 5);
		assert!(registry.is_empty());

		nodes.assert_structure();
		assert_eq!(values(&nodes), vec![2, 6, 7, 8, 9, 10]);
		assert_eq!(nodes.root, nodes.find(&6));
		// 6 had no right child, so 7 loses its left child.
		assert_eq!(nodes.node(nodes.find(&7).unwrap()).left, None);
	}

	#[test]
	fn merge_with_direct_successor() {
		let mut nodes = build(&[5, 2, 9, 10]);
		let five = nodes.find(&5).unwrap();
		nodes.detach(five);
		nodes.assert_structure();
		assert_eq!(nodes.root, nodes.find(&9));
		assert_eq!(nodes.node(nodes.find(&9).unwrap()).left, nodes.find(&2));
		assert_eq!(values(&nodes), vec![2, 9, 10]);
	}

	#[test]
	fn merge_successor_with_right_subtree() {
		let mut nodes = build(&[5, 2, 9, 7, 8]);
		let five = nodes.find(&5).unwrap();
		nodes.detach(five);
		nodes.assert_structure();
		// 7 moved up; its right child 8 is now 9's left child.
		assert_eq!(nodes.root, nodes.find(&7));
		assert_eq!(nodes.node(nodes.find(&9).unwrap()).left, nodes.find(&8));
	}

	#[test]
	fn detach_leaf_and_single_child() {
		let mut nodes = build(&[5, 3, 8, 1]);
		let one = nodes.find(&1).unwrap();
		nodes.detach(one);
		nodes.assert_structure();
		let three = nodes.find(&3).unwrap();
		nodes.detach(three);
		nodes.assert_structure();
		assert_eq!(values(&nodes), vec![5, 8]);
	}

	#[test]
	fn freed_slots_are_reused() {
		let mut nodes = build(&[1, 2, 3]);
		let two = nodes.find(&2).unwrap();
		nodes.detach(two);
		let capacity = nodes.slots.len();

		nodes.reserve_one(Fallibility::Fallible).unwrap();
		let Probe::Vacant(slot) = nodes.probe(&4) else { panic!("4 is absent") };
		let id = nodes.attach(4, slot);
		assert_eq!(id, two);
		assert_eq!(nodes.slots.len(), capacity);
		nodes.assert_structure();
	}

	#[test]
	fn teardown_degenerate_path() {
		let values: Vec<i32> = (0..5_000).collect();
		let mut nodes = build(&values);
		assert_eq!(nodes.height(), 5_000);
		assert_eq!(nodes.teardown(), 5_000);
		assert_eq!(nodes.len, 0);
		assert_eq!(nodes.root, None);
		nodes.assert_structure();
	}

	#[test]
	fn duplicate_preserves_shape() {
		let mut nodes = build(&[50, 30, 70, 20, 40, 60, 80, 35]);
		let thirty = nodes.find(&30).unwrap();
		nodes.detach(thirty);

		let copy = nodes.duplicate(Fallibility::Fallible).unwrap();
		copy.assert_structure();
		assert_eq!(values(&copy), values(&nodes));
		assert_eq!(copy.height(), nodes.height());
		// No vacant slots carried over.
		assert_eq!(copy.slots.len(), copy.len);

		let root = |n: &Nodes<i32>| *n.value(n.root.unwrap());
		assert_eq!(root(&copy), root(&nodes));
		let left_of_root = |n: &Nodes<i32>| n.node(n.root.unwrap()).left.map(|id| *n.value(id));
		assert_eq!(left_of_root(&copy), left_of_root(&nodes));
	}

	#[test]
	fn duplicate_empty() {
		let nodes: Nodes<i32> = Nodes::new();
		let copy = nodes.duplicate(Fallibility::Infallible).unwrap();
		assert_eq!(copy.len, 0);
		assert_eq!(copy.root, None);
	}

	#[test]
	fn height_of_shapes() {
		assert_eq!(build(&[2, 1, 3]).height(), 2);
		assert_eq!(build(&[1, 2, 3, 4]).height(), 4);
		assert_eq!(build(&[4, 2, 6, 1, 3, 5, 7, 8]).height(), 4);
	}

	#[test]
	fn drain_in_order_moves_values() {
		let mut nodes = build(&[3, 1, 2]);
		assert_eq!(nodes.drain_in_order(), vec![1, 2, 3]);
		assert_eq!(nodes.len, 0);
		assert_eq!(nodes.root, None);
	}
}

//! # Root Holder and Grove
//!
//! A set's storage is split in two so that [`Set::swap`](crate::Set::swap)
//! can exchange trees in O(1) while every set keeps its own identity:
//!
//! ```text
//!   Set ──► Rc<RootHolder> ──grove──► Rc<Grove> ──nodes──► Nodes (arena)
//!              │    ▲                    │
//!              │    └────── Weak ────────┘  (holder: the root's "parent")
//!              └── registry: cursors at end()
//! ```
//!
//! - The [`RootHolder`] is the sentinel. It never holds a value, it is what
//!   `end()` refers to, and it stays with its set for the set's whole life.
//! - The [`Grove`] owns the node arena. It moves between holders on swap and
//!   keeps a weak back-reference to whichever holder currently owns it; that
//!   back-reference plays the role of the root node's parent link.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::binding::{Position, Registry};
use crate::node::{NodeId, Nodes};
use crate::Direction;

/// The sentinel of one set: anchor of its tree and its end position.
pub(crate) struct RootHolder<T> {
	pub(crate) grove: RefCell<Rc<Grove<T>>>,
	/// Cursors positioned at this set's end.
	pub(crate) registry: RefCell<Registry<T>>,
}

/// One node arena plus the holder it currently hangs off.
pub(crate) struct Grove<T> {
	pub(crate) nodes: RefCell<Nodes<T>>,
	holder: RefCell<Weak<RootHolder<T>>>,
}

impl<T> RootHolder<T> {
	/// Creates a holder owning a fresh grove around `nodes`.
	pub(crate) fn new(nodes: Nodes<T>) -> Rc<Self> {
		Rc::new_cyclic(|holder| RootHolder {
			grove: RefCell::new(Rc::new(Grove {
				nodes: RefCell::new(nodes),
				holder: RefCell::new(holder.clone()),
			})),
			registry: RefCell::new(Registry::new()),
		})
	}

	/// The grove currently attached to this holder.
	#[inline]
	pub(crate) fn grove(&self) -> Rc<Grove<T>> {
		self.grove.borrow().clone()
	}

	/// Exchanges groves with `other`, then points each grove back at its new
	/// holder. Registries never move.
	pub(crate) fn exchange(self: &Rc<Self>, other: &Rc<Self>) {
		self.grove.swap(&other.grove);
		self.grove().rehome(self);
		other.grove().rehome(other);
	}
}

impl<T> Grove<T> {
	/// The holder this grove currently hangs off.
	///
	/// A holder clears its grove before it goes away, and no cursor can sit
	/// on a node of an empty grove, so the upgrade only fails on a broken
	/// invariant.
	pub(crate) fn holder(&self) -> Rc<RootHolder<T>> {
		self.holder.borrow().upgrade().expect("grove outlived its root holder")
	}

	fn rehome(&self, holder: &Rc<RootHolder<T>>) {
		*self.holder.borrow_mut() = Rc::downgrade(holder);
	}

	#[cfg(any(test, feature = "test-utils"))]
	pub(crate) fn is_held_by(&self, holder: &Rc<RootHolder<T>>) -> bool {
		self.holder.borrow().as_ptr() == Rc::as_ptr(holder)
	}

	/// Position of node `id`, or the end position for `None`.
	pub(crate) fn position(self: &Rc<Self>, id: Option<NodeId>) -> Position<T> {
		match id {
			Some(id) => Position::Node(self.clone(), id),
			None => Position::End(self.holder()),
		}
	}
}

/// Computes the position one step away from `from`.
///
/// # Panics
///
/// Panics when stepping a singular position, advancing past the end, or
/// retreating before the first element.
pub(crate) fn step<T>(from: &Position<T>, direction: Direction) -> Position<T> {
	match (from, direction) {
		(Position::Singular, _) => panic!("stepped a singular cursor"),
		(Position::End(_), Direction::Forward) => panic!("advanced a cursor past the end"),
		(Position::End(holder), Direction::Reverse) => {
			let grove = holder.grove();
			let last = {
				let nodes = grove.nodes.borrow();
				nodes.root.map(|root| nodes.last(root))
			};
			match last {
				Some(id) => Position::Node(grove, id),
				None => panic!("retreated a cursor before the beginning"),
			}
		}
		(Position::Node(grove, id), Direction::Forward) => {
			let next = grove.nodes.borrow().next(*id);
			grove.position(next)
		}
		(Position::Node(grove, id), Direction::Reverse) => {
			let prev = grove.nodes.borrow().prev(*id);
			match prev {
				Some(prev) => Position::Node(grove.clone(), prev),
				None => panic!("retreated a cursor before the beginning"),
			}
		}
	}
}

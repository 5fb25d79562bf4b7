//! # Cursor Binding Protocol
//!
//! Every cursor owns a [`Binding`]: a shared cell recording the cursor's
//! current [`Position`]. Every node, and every set's root holder, owns a
//! [`Registry`] of weak references to the bindings positioned on it. The two
//! directions are kept mutually consistent at all times:
//!
//! - a binding at `Position::Node(grove, id)` appears in the registry of
//!   node `id` of `grove`;
//! - a binding at `Position::End(holder)` appears in `holder`'s registry;
//! - a singular binding appears in no registry.
//!
//! Registries hold `Weak`s, so a node never keeps a cursor alive. When a node
//! is destroyed its registry is handed to [`invalidate`], which turns every
//! cursor still on it singular.
//!
//! ```text
//!   Cursor ──owns──► Rc<Binding> ──at──► Position::Node(grove, id)
//!                        ▲                                │
//!                        └──────── Weak ◄── registry ◄────┘
//! ```

use std::cell::RefCell;
use std::mem;
use std::ptr;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::error::{Fallibility, Result};
use crate::node::NodeId;
use crate::tree::{Grove, RootHolder};

/// Number of cursors a node records inline before its registry spills to the
/// heap. Most nodes carry zero or one cursor.
pub const INLINE_BINDINGS: usize = 2;

/// The cursors currently positioned on one node (or on one root holder).
pub(crate) type Registry<T> = SmallVec<[Weak<Binding<T>>; INLINE_BINDINGS]>;

/// Where a cursor currently sits.
pub(crate) enum Position<T> {
	/// Unbound: default-constructed, or left behind by an erased node.
	Singular,
	/// On a set's root holder, i.e. past the last element.
	End(Rc<RootHolder<T>>),
	/// On a value node of a grove.
	Node(Rc<Grove<T>>, NodeId),
}

impl<T> Clone for Position<T> {
	fn clone(&self) -> Self {
		match self {
			Position::Singular => Position::Singular,
			Position::End(holder) => Position::End(holder.clone()),
			Position::Node(grove, id) => Position::Node(grove.clone(), *id),
		}
	}
}

impl<T> Position<T> {
	/// Identity comparison: same node of the same grove, or the same holder.
	pub(crate) fn same(&self, other: &Self) -> bool {
		match (self, other) {
			(Position::Singular, Position::Singular) => true,
			(Position::End(a), Position::End(b)) => Rc::ptr_eq(a, b),
			(Position::Node(ga, a), Position::Node(gb, b)) => Rc::ptr_eq(ga, gb) && a == b,
			_ => false,
		}
	}

	#[inline]
	pub(crate) fn is_singular(&self) -> bool {
		matches!(self, Position::Singular)
	}

	/// Runs `f` on the registry of whatever this position refers to.
	///
	/// Returns `None` for a singular position, which has no registry.
	fn with_registry<R>(&self, f: impl FnOnce(&mut Registry<T>) -> R) -> Option<R> {
		match self {
			Position::Singular => None,
			Position::End(holder) => Some(f(&mut holder.registry.borrow_mut())),
			Position::Node(grove, id) => {
				let nodes = grove.nodes.borrow();
				let mut registry = nodes.node(*id).registry.borrow_mut();
				Some(f(&mut registry))
			}
		}
	}
}

/// The shared half of a cursor: its position, reachable from the registry of
/// the node it sits on.
pub(crate) struct Binding<T> {
	at: RefCell<Position<T>>,
}

impl<T> Binding<T> {
	/// Creates a singular binding.
	pub(crate) fn new() -> Rc<Self> {
		Rc::new(Binding {
			at: RefCell::new(Position::Singular),
		})
	}

	/// Returns a copy of the current position.
	pub(crate) fn position(&self) -> Position<T> {
		self.at.borrow().clone()
	}

	/// Moves the binding from its current position to `to`.
	///
	/// Binding a singular cursor is the special case where there is nothing
	/// to leave. Room in the target registry is reserved before anything
	/// changes, so on failure the binding keeps its old position and both
	/// registries are untouched.
	pub(crate) fn rebind(
		self: &Rc<Self>,
		to: Position<T>,
		fallibility: Fallibility,
	) -> Result<()> {
		let from = self.position();
		if from.same(&to) {
			return Ok(());
		}

		to.with_registry(|registry| reserve(registry, fallibility)).transpose()?;

		from.with_registry(|registry| remove(registry, self));
		to.with_registry(|registry| registry.push(Rc::downgrade(self)));
		*self.at.borrow_mut() = to;
		Ok(())
	}

	/// Leaves the current position, making the binding singular.
	pub(crate) fn release(self: &Rc<Self>) {
		let from = mem::replace(&mut *self.at.borrow_mut(), Position::Singular);
		from.with_registry(|registry| remove(registry, self));
	}

	#[cfg(any(test, feature = "test-utils"))]
	pub(crate) fn is_at(&self, position: &Position<T>) -> bool {
		self.at.borrow().same(position)
	}
}

/// Turns every cursor recorded in `registry` singular.
///
/// Called exactly once per destroyed node, with the registry taken out of
/// the node just before its slot is freed.
pub(crate) fn invalidate<T>(registry: Registry<T>) {
	for weak in registry {
		if let Some(binding) = weak.upgrade() {
			*binding.at.borrow_mut() = Position::Singular;
		}
	}
}

fn reserve<T>(registry: &mut Registry<T>, fallibility: Fallibility) -> Result<()> {
	match fallibility {
		Fallibility::Fallible => registry.try_reserve(1)?,
		Fallibility::Infallible => registry.reserve(1),
	}
	Ok(())
}

fn remove<T>(registry: &mut Registry<T>, binding: &Rc<Binding<T>>) {
	let target = Rc::as_ptr(binding);
	if let Some(pos) = registry.iter().position(|weak| ptr::eq(weak.as_ptr(), target)) {
		registry.remove(pos);
	}
}

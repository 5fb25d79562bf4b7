//! # Cursors
//!
//! A [`Cursor`] is a position in a [`Set`]: on an element, at the end, or
//! singular. Unlike a borrowing iterator it does not hold the set borrowed,
//! so the set can be mutated while cursors are alive:
//!
//! - inserting or erasing *other* elements never moves a cursor;
//! - erasing the element a cursor sits on turns that cursor singular. A
//!   singular cursor cannot be dereferenced or stepped, but it can be
//!   dropped, compared, or reassigned with [`Clone::clone_from`].
//!
//! ```
//! use tetherset::Set;
//!
//! let mut set: Set<i32> = [5, 3, 8].into_iter().collect();
//! let five = set.find(&5);
//! let three = set.find(&3);
//!
//! set.remove(&8);
//! set.insert(6);
//! assert_eq!(five.get(), 5);
//!
//! set.erase(&three);
//! assert!(three.is_singular());
//! ```

use std::fmt;
use std::rc::Rc;

use crate::binding::{Binding, Position};
use crate::error::{infallible, Fallibility, Result};
use crate::tree::{self, RootHolder};
use crate::{Direction, Set};

/// A bidirectional position in a [`Set`] that survives unrelated mutations.
///
/// Dereference with [`Cursor::with`] or [`Cursor::get`]; move with
/// [`Cursor::move_next`] and [`Cursor::move_prev`].
///
/// # Contract
///
/// Dereferencing a singular or end cursor, stepping past either end, and
/// comparing cursors of different sets are programming errors and panic.
pub struct Cursor<T> {
	/// The set this cursor was obtained from. Fixed for the cursor's life
	/// except through `clone_from`; swapping sets does not change it.
	/// `None` only for default-constructed cursors.
	owner: Option<Rc<RootHolder<T>>>,
	binding: Rc<Binding<T>>,
}

impl<T> Cursor<T> {
	/// Creates a cursor of `owner` bound to `position`.
	pub(crate) fn new(owner: Rc<RootHolder<T>>, position: Position<T>) -> Self {
		let cursor = Cursor::unbound(owner);
		infallible(cursor.binding.rebind(position, Fallibility::Infallible));
		cursor
	}

	/// Creates a singular cursor of `owner`.
	///
	/// Allocating the binding up front lets callers bind it after a mutation
	/// without any further allocation.
	pub(crate) fn unbound(owner: Rc<RootHolder<T>>) -> Self {
		Cursor {
			owner: Some(owner),
			binding: Binding::new(),
		}
	}

	#[inline]
	pub(crate) fn binding(&self) -> &Rc<Binding<T>> {
		&self.binding
	}

	#[cfg(test)]
	pub(crate) fn owner(&self) -> Option<&Rc<RootHolder<T>>> {
		self.owner.as_ref()
	}

	/// Returns `true` if the cursor has no position: it was default
	/// constructed, or the element it was on has been erased.
	pub fn is_singular(&self) -> bool {
		self.binding.position().is_singular()
	}

	/// Returns `true` if the cursor sits past the last element of a set.
	pub fn is_end(&self) -> bool {
		matches!(self.binding.position(), Position::End(_))
	}

	/// Returns `true` if this cursor was obtained from `set`.
	///
	/// This stays true across [`Set::swap`], even for a cursor whose element
	/// now lives in the other set's tree, and after the cursor turns
	/// singular.
	pub fn belongs_to(&self, set: &Set<T>) -> bool {
		self.owner.as_ref().is_some_and(|owner| Rc::ptr_eq(owner, set.holder()))
	}

	/// Calls `f` with the element under the cursor.
	///
	/// The set must not be mutated from inside `f`.
	///
	/// # Panics
	///
	/// Panics if the cursor is singular or at the end.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		deref(&self.binding.position(), f)
	}

	/// Returns a clone of the element under the cursor.
	///
	/// # Panics
	///
	/// Panics if the cursor is singular or at the end.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.with(T::clone)
	}

	/// Moves to the next element, or to the end after the last one.
	///
	/// # Panics
	///
	/// Panics if the cursor is singular or already at the end.
	pub fn move_next(&mut self) -> &mut Self {
		infallible(self.step(Direction::Forward, Fallibility::Infallible));
		self
	}

	/// Moves to the previous element; from the end, to the last element.
	///
	/// # Panics
	///
	/// Panics if the cursor is singular or on the first element (or at the
	/// end of an empty set).
	pub fn move_prev(&mut self) -> &mut Self {
		infallible(self.step(Direction::Reverse, Fallibility::Infallible));
		self
	}

	/// Like [`Cursor::move_next`], but reports a registry allocation failure
	/// instead of aborting. On failure the cursor has not moved.
	pub fn try_move_next(&mut self) -> Result<&mut Self> {
		self.step(Direction::Forward, Fallibility::Fallible)?;
		Ok(self)
	}

	/// Like [`Cursor::move_prev`], but reports a registry allocation failure
	/// instead of aborting. On failure the cursor has not moved.
	pub fn try_move_prev(&mut self) -> Result<&mut Self> {
		self.step(Direction::Reverse, Fallibility::Fallible)?;
		Ok(self)
	}

	/// Moves to the next element and returns the position held before.
	pub fn fetch_next(&mut self) -> Self {
		let prior = self.clone();
		self.move_next();
		prior
	}

	/// Moves to the previous element and returns the position held before.
	pub fn fetch_prev(&mut self) -> Self {
		let prior = self.clone();
		self.move_prev();
		prior
	}

	/// Clones the cursor, reporting a registry allocation failure instead of
	/// aborting.
	///
	/// Only registry growth is reported. The new cursor's own binding is a
	/// small `Rc` allocation, and running out of memory there aborts as it
	/// does for any `Rc::new`.
	pub fn try_clone(&self) -> Result<Self> {
		let cursor = Cursor {
			owner: self.owner.clone(),
			binding: Binding::new(),
		};
		cursor.binding.rebind(self.binding.position(), Fallibility::Fallible)?;
		Ok(cursor)
	}

	fn step(&mut self, direction: Direction, fallibility: Fallibility) -> Result<()> {
		let to = tree::step(&self.binding.position(), direction);
		self.binding.rebind(to, fallibility)
	}
}

fn deref<T, R>(position: &Position<T>, f: impl FnOnce(&T) -> R) -> R {
	match position {
		Position::Node(grove, id) => {
			let nodes = grove.nodes.borrow();
			f(nodes.value(*id))
		}
		Position::End(_) => panic!("dereferenced a cursor at the end"),
		Position::Singular => panic!("dereferenced a singular cursor"),
	}
}

impl<T> Default for Cursor<T> {
	/// A singular cursor that belongs to no set.
	fn default() -> Self {
		Cursor {
			owner: None,
			binding: Binding::new(),
		}
	}
}

impl<T> Clone for Cursor<T> {
	fn clone(&self) -> Self {
		let cursor = Cursor {
			owner: self.owner.clone(),
			binding: Binding::new(),
		};
		infallible(cursor.binding.rebind(self.binding.position(), Fallibility::Infallible));
		cursor
	}

	/// Reassigns this cursor to `source`'s set and position.
	///
	/// This is how a singular cursor is brought back into use.
	fn clone_from(&mut self, source: &Self) {
		infallible(self.binding.rebind(source.binding.position(), Fallibility::Infallible));
		self.owner.clone_from(&source.owner);
	}
}

impl<T> Drop for Cursor<T> {
	fn drop(&mut self) {
		self.binding.release();
	}
}

impl<T> PartialEq for Cursor<T> {
	/// # Panics
	///
	/// Panics if the cursors belong to different sets, or to no set.
	fn eq(&self, other: &Self) -> bool {
		match (&self.owner, &other.owner) {
			(Some(a), Some(b)) if Rc::ptr_eq(a, b) => {}
			_ => panic!("compared cursors that belong to different sets"),
		}
		self.binding.position().same(&other.binding.position())
	}
}

impl<T> Eq for Cursor<T> {}

impl<T: fmt::Debug> fmt::Debug for Cursor<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self.binding.position() {
			Position::Singular => f.write_str("Cursor(singular)"),
			Position::End(_) => f.write_str("Cursor(end)"),
			Position::Node(grove, id) => {
				let nodes = grove.nodes.borrow();
				f.debug_tuple("Cursor").field(nodes.value(id)).finish()
			}
		}
	}
}

/// Reverse adaptor over a [`Cursor`], as returned by
/// [`Set::rbegin`](crate::Set::rbegin) and [`Set::rend`](crate::Set::rend).
///
/// It dereferences the element *before* its base cursor and moves in the
/// opposite direction, so `rbegin()` (base at `end()`) yields the largest
/// element and `rend()` has its base at `begin()`.
pub struct RevCursor<T> {
	base: Cursor<T>,
}

impl<T> Clone for RevCursor<T> {
	fn clone(&self) -> Self {
		RevCursor {
			base: self.base.clone(),
		}
	}

	fn clone_from(&mut self, source: &Self) {
		self.base.clone_from(&source.base);
	}
}

impl<T> PartialEq for RevCursor<T> {
	fn eq(&self, other: &Self) -> bool {
		self.base == other.base
	}
}

impl<T> Eq for RevCursor<T> {}

impl<T> RevCursor<T> {
	pub fn new(base: Cursor<T>) -> Self {
		RevCursor {
			base,
		}
	}

	/// The underlying forward cursor.
	pub fn base(&self) -> &Cursor<T> {
		&self.base
	}

	pub fn into_base(self) -> Cursor<T> {
		self.base
	}

	/// Calls `f` with the element before the base cursor.
	///
	/// # Panics
	///
	/// Panics at `rend()` or if the base is singular.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		let ahead = tree::step(&self.base.binding.position(), Direction::Reverse);
		deref(&ahead, f)
	}

	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.with(T::clone)
	}

	/// Moves toward smaller elements.
	pub fn move_next(&mut self) -> &mut Self {
		self.base.move_prev();
		self
	}

	/// Moves toward larger elements.
	pub fn move_prev(&mut self) -> &mut Self {
		self.base.move_next();
		self
	}
}

impl<T: fmt::Debug> fmt::Debug for RevCursor<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_tuple("RevCursor").field(&self.base).finish()
	}
}

//! Iterators over the elements of a [`Set`].
//!
//! [`Iter`] borrows the set, so unlike a [`Cursor`](crate::Cursor) it keeps
//! the set immutable for as long as it lives and needs no registration.
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::rc::Rc;
use std::vec;

use crate::node::NodeId;
use crate::tree::Grove;
use crate::Set;

/// Borrowing iterator yielding clones of the elements in ascending order.
///
/// Created by [`Set::iter`].
pub struct Iter<'a, T> {
	grove: Rc<Grove<T>>,
	front: Option<NodeId>,
	back: Option<NodeId>,
	remaining: usize,
	marker: PhantomData<&'a Set<T>>,
}

impl<'a, T> Iter<'a, T> {
	pub(crate) fn new(set: &'a Set<T>) -> Self {
		let grove = set.holder().grove();
		let (front, back, remaining) = {
			let nodes = grove.nodes.borrow();
			match nodes.root {
				Some(root) => (Some(nodes.first(root)), Some(nodes.last(root)), nodes.len),
				None => (None, None, 0),
			}
		};
		Iter {
			grove,
			front,
			back,
			remaining,
			marker: PhantomData,
		}
	}
}

impl<T: Clone> Iterator for Iter<'_, T> {
	type Item = T;

	fn next(&mut self) -> Option<T> {
		if self.remaining == 0 {
			return None;
		}
		let id = self.front?;
		let nodes = self.grove.nodes.borrow();
		self.front = nodes.next(id);
		self.remaining -= 1;
		Some(nodes.value(id).clone())
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining, Some(self.remaining))
	}
}

impl<T: Clone> DoubleEndedIterator for Iter<'_, T> {
	fn next_back(&mut self) -> Option<T> {
		if self.remaining == 0 {
			return None;
		}
		let id = self.back?;
		let nodes = self.grove.nodes.borrow();
		self.back = nodes.prev(id);
		self.remaining -= 1;
		Some(nodes.value(id).clone())
	}
}

impl<T: Clone> ExactSizeIterator for Iter<'_, T> {}

impl<T: Clone> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
	fn clone(&self) -> Self {
		Iter {
			grove: self.grove.clone(),
			front: self.front,
			back: self.back,
			remaining: self.remaining,
			marker: PhantomData,
		}
	}
}

impl<T> fmt::Debug for Iter<'_, T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Iter").field("remaining", &self.remaining).finish()
	}
}

/// Owning iterator that moves the elements out in ascending order.
///
/// Created by `Set::into_iter`.
#[derive(Debug)]
pub struct IntoIter<T> {
	values: vec::IntoIter<T>,
}

impl<T> IntoIter<T> {
	pub(crate) fn new(values: Vec<T>) -> Self {
		IntoIter {
			values: values.into_iter(),
		}
	}
}

impl<T> Iterator for IntoIter<T> {
	type Item = T;

	#[inline]
	fn next(&mut self) -> Option<T> {
		self.values.next()
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		self.values.size_hint()
	}
}

impl<T> DoubleEndedIterator for IntoIter<T> {
	#[inline]
	fn next_back(&mut self) -> Option<T> {
		self.values.next_back()
	}
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

#[cfg(test)]
mod tests {
	use crate::Set;

	#[test]
	fn iter_both_ends() {
		let set: Set<i32> = [5, 3, 8, 1, 4].into_iter().collect();
		let mut iter = set.iter();
		assert_eq!(iter.len(), 5);
		assert_eq!(iter.next(), Some(1));
		assert_eq!(iter.next_back(), Some(8));
		assert_eq!(iter.next(), Some(3));
		assert_eq!(iter.next_back(), Some(5));
		assert_eq!(iter.len(), 1);
		assert_eq!(iter.next(), Some(4));
		assert_eq!(iter.next(), None);
		assert_eq!(iter.next_back(), None);
	}

	#[test]
	fn iter_reversed() {
		let set: Set<i32> = (0..10).collect();
		let values: Vec<i32> = set.iter().rev().collect();
		assert_eq!(values, (0..10).rev().collect::<Vec<_>>());
	}

	#[test]
	fn iter_empty() {
		let set: Set<i32> = Set::new();
		assert_eq!(set.iter().next(), None);
		assert_eq!(set.iter().len(), 0);
	}

	#[test]
	fn iter_by_reference() {
		let set: Set<i32> = [2, 1].into_iter().collect();
		let mut total = 0;
		for v in &set {
			total += v;
		}
		assert_eq!(total, 3);
	}

	#[test]
	fn into_iter_both_ends() {
		let set: Set<i32> = [5, 3, 8].into_iter().collect();
		let mut iter = set.into_iter();
		assert_eq!(iter.len(), 3);
		assert_eq!(iter.next_back(), Some(8));
		assert_eq!(iter.next(), Some(3));
		assert_eq!(iter.next(), Some(5));
		assert_eq!(iter.next(), None);
	}
}

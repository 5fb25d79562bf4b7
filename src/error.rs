//! # Error Types for the Tethered Set
//!
//! The set distinguishes two classes of failure:
//!
//! - **Resource exhaustion**: node storage or a node's cursor registry could
//!   not grow. Only the fallible `try_*` operations report this, and they do
//!   so with the strong guarantee: the set (and every cursor) is left exactly
//!   as it was before the call. Each new cursor also needs a small `Rc`
//!   allocation for its binding; like any `Rc::new`, that aborts on
//!   exhaustion and is never reported.
//! - **Contract violations**: dereferencing a singular or end cursor,
//!   comparing cursors of different sets, erasing through the end cursor,
//!   stepping past either end. These are programming errors and panic; they
//!   never surface as an [`Error`].
//!
//! ## Error Flow
//!
//! ```text
//! try_insert(value)
//!      │
//!      ▼
//! Descend the tree (comparisons only, nothing mutated)
//!      │
//!      ▼
//! Reserve a slot ───────────► Err(Storage) ───► set unchanged
//!      │
//!      ▼ (Ok)
//! Link the new leaf, bind the returned cursor (no allocation)
//!      │
//!      ▼
//! Return (cursor, inserted)
//! ```

use smallvec::CollectionAllocErr;
use std::collections::TryReserveError;
use thiserror::Error;

/// Errors reported by the fallible set and cursor operations.
#[derive(Error, Debug)]
pub enum Error {
	/// The node arena could not reserve room for another node.
	///
	/// Returned by `try_insert`, `try_clone`, `try_assign` and
	/// `try_reserve`. The set is unchanged.
	#[error("node storage allocation failed")]
	Storage(#[from] TryReserveError),

	/// A node's cursor registry could not grow to record one more cursor.
	///
	/// Returned by `Cursor::try_clone`, `Cursor::try_move_next`,
	/// `Cursor::try_move_prev`, and by `try_insert` when the value is already
	/// present. The cursor keeps its previous position, or stays singular if
	/// it had none.
	#[error("cursor registry allocation failed: {0:?}")]
	Registry(CollectionAllocErr),
}

impl From<CollectionAllocErr> for Error {
	fn from(err: CollectionAllocErr) -> Self {
		Error::Registry(err)
	}
}

/// A Result type alias using our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Whether a reservation may report failure or must abort on it.
///
/// The infallible form behaves like every std collection and aborts the
/// process when the allocator gives up; the fallible form backs the `try_*`
/// family.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub(crate) enum Fallibility {
	Fallible,
	Infallible,
}

/// Unwraps the result of an operation run with [`Fallibility::Infallible`].
///
/// Infallible reservations abort instead of returning, so an error here
/// means the fallibility was not threaded through.
#[inline]
pub(crate) fn infallible<R>(result: Result<R>) -> R {
	match result {
		Ok(value) => value,
		Err(err) => unreachable!("infallible operation reported an error: {err}"),
	}
}

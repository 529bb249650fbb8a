//! # avltree -- an ordered map with pluggable key handling
//!
//! This crate primarily exports a single type -- [`AvlTree`] -- which is an ordered map backed by
//! a height-balanced binary search tree. Lookup, insertion, and removal are all `O(log n)`.
//!
//! What sets it apart from the standard library's maps is that the handling of keys is entirely
//! up to the user. Each tree is parameterized by three strategies:
//!
//! * [`Compare`] -- the total order over keys (default: [`NaturalOrder`], i.e. `Ord`)
//! * [`Duplicate`] -- produces the stored form of a key when it's first inserted (default:
//!   [`Verbatim`], which stores the key as-is)
//! * [`Release`] -- disposes of a stored key when it leaves the tree (default: [`NoRelease`],
//!   which just drops it)
//!
//! Closures work for any of these, which makes it easy to, e.g., count how many keys are live,
//! intern keys on insertion, or order keys by some projection:
//!
//! ```
//! use avltree::AvlTree;
//! use avltree::param::Verbatim;
//! use std::cell::Cell;
//!
//! let released = Cell::new(0);
//! let mut tree = AvlTree::with_strategies(
//!     |x: &u32, y: &u32| x.cmp(y),
//!     Verbatim,
//!     |_key: u32| released.set(released.get() + 1),
//! );
//!
//! assert!(tree.insert(1, "one", false).is_new());
//! assert!(tree.insert(2, "two", false).is_new());
//! tree.erase(&1);
//! assert_eq!(released.get(), 1);
//!
//! drop(tree);
//! assert_eq!(released.get(), 2);
//! ```
//!
//! ### Memory
//!
//! All of the nodes in a tree are stored in a single arena, with freed slots reused by later
//! insertions. Allocation failures are reported by [`AvlTree::try_insert`] and
//! [`AvlTree::try_with_capacity`] as an [`AllocError`], instead of aborting.
//!
//! ### Feature flags
//!
//! There is currently just one feature flag -- `fuzz`. This exposes the [`mock`] module and the
//! test-only methods on [`AvlTree`] used by the fuzzing harness.
//!
//! [`NaturalOrder`]: param::NaturalOrder
//! [`Verbatim`]: param::Verbatim
//! [`NoRelease`]: param::NoRelease

#![deny(unsafe_op_in_unsafe_fn)]

use std::collections::TryReserveError;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

#[macro_use]
mod macros;

#[cfg(any(test, feature = "fuzz"))]
pub mod mock;
pub mod param;

mod public_traits;
mod recycle;
mod tree;

pub use public_traits::{Compare, Duplicate, Release};
pub use tree::{AvlTree, Insertion};

/// Error returned when space for a tree or one of its nodes couldn't be allocated
///
/// This is returned by [`AvlTree::try_insert`] and the `try_with_capacity` constructors. When it
/// is, the tree (if there is one) has not been modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocError {
    inner: TryReserveError,
}

impl From<TryReserveError> for AllocError {
    fn from(inner: TryReserveError) -> Self {
        AllocError { inner }
    }
}

impl Display for AllocError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "failed to allocate tree storage: {}", self.inner)
    }
}

impl Error for AllocError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.inner)
    }
}

//! Public-facing traits for parameterizing [`AvlTree`](crate::AvlTree)
//!
//! Each tree is parameterized by three key strategies: a [`Compare`] to order keys, a
//! [`Duplicate`] to produce the stored form of a newly-inserted key, and a [`Release`] to dispose
//! of stored keys when they leave the tree. The named defaults live in [`param`](crate::param);
//! closures of the right shape implement each trait as well.

use std::cmp::Ordering;

/// Total order over keys stored in an [`AvlTree`]
///
/// The tree relies on this order being consistent for the entire time a key is stored: for any
/// two keys, `compare(a, b)` must always give the same answer, `compare(a, a)` must be `Equal`,
/// and `compare(a, b)` must be the reverse of `compare(b, a)`. If this isn't upheld, lookups may
/// fail to find stored keys, but the tree will still remain balanced and memory-safe.
///
/// Any `Fn(&K, &K) -> Ordering` implements `Compare<K>`:
///
/// ```
/// use avltree::AvlTree;
/// use avltree::param::{NoRelease, Verbatim};
///
/// let by_len = |x: &String, y: &String| x.len().cmp(&y.len());
/// let mut tree = AvlTree::with_strategies(by_len, Verbatim, NoRelease);
/// assert!(tree.insert("abc".to_owned(), 1, false).is_new());
/// assert_eq!(tree.find(&"xyz".to_owned()), Some(&1));
/// ```
///
/// [`AvlTree`]: crate::AvlTree
pub trait Compare<K> {
    /// Compares `lhs` against `rhs`, returning `Less` if `lhs` belongs to the left of `rhs`
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering;
}

/// Produces the stored form of a key, at the moment it's first inserted
///
/// This is called exactly once for each key that becomes a new entry in the tree. It is *not*
/// called when an insertion finds an existing entry with an equal key; in that case the provided
/// key is simply dropped, and the stored key is left as it was.
///
/// The result must compare equal to the input. Any `FnMut(K) -> K` implements `Duplicate<K>`.
pub trait Duplicate<K> {
    /// Returns the key that should be stored in place of `key`
    fn duplicate(&mut self, key: K) -> K;
}

/// Disposes of a stored key, once it's removed from the tree
///
/// Every key produced by [`Duplicate::duplicate`] is passed to `release` exactly once -- either
/// when its entry is erased, or when the tree is cleared or dropped. Any `FnMut(K)` implements
/// `Release<K>`.
pub trait Release<K> {
    /// Takes ownership of a key that has left the tree
    fn release(&mut self, key: K);
}

impl<K, F: Fn(&K, &K) -> Ordering> Compare<K> for F {
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        self(lhs, rhs)
    }
}

impl<K, F: FnMut(K) -> K> Duplicate<K> for F {
    fn duplicate(&mut self, key: K) -> K {
        self(key)
    }
}

impl<K, F: FnMut(K)> Release<K> for F {
    fn release(&mut self, key: K) {
        self(key)
    }
}

//! Named key strategies for [`AvlTree`]
//!
//! An [`AvlTree`] takes three strategy parameters -- one each for [`Compare`], [`Duplicate`], and
//! [`Release`]. This module provides the ones you'll usually want, and the defaults are
//! [`NaturalOrder`], [`Verbatim`], and [`NoRelease`]:
//!
//! ```
//! use avltree::param::{NaturalOrder, NoRelease, ReverseOrder, Verbatim};
//! use avltree::AvlTree;
//!
//! type Ascending<K, V> = AvlTree<K, V>;
//! type Descending<K, V> = AvlTree<K, V, ReverseOrder, Verbatim, NoRelease>;
//!
//! let mut tree: Descending<u32, ()> = AvlTree::with_strategies(ReverseOrder, Verbatim, NoRelease);
//! assert!(tree.insert(3, (), false).is_new());
//! ```
//!
//! All of the types here are zero-sized, so they add nothing to the size of the tree.
//!
//! [`AvlTree`]: crate::AvlTree

use std::cmp::Ordering;

use crate::public_traits::{Compare, Duplicate, Release};

/// Orders keys by their implementation of [`Ord`] (*default*)
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct NaturalOrder;

/// Orders keys by the reverse of their implementation of [`Ord`]
///
/// Keys that are "greater" are placed towards the left of the tree.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ReverseOrder;

/// Stores keys exactly as they're provided to [`insert`] (*default*)
///
/// [`insert`]: crate::AvlTree::insert
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Verbatim;

/// Drops keys as they leave the tree, without doing anything else (*default*)
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct NoRelease;

impl<K: Ord> Compare<K> for NaturalOrder {
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        lhs.cmp(rhs)
    }
}

impl<K: Ord> Compare<K> for ReverseOrder {
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        rhs.cmp(lhs)
    }
}

impl<K> Duplicate<K> for Verbatim {
    fn duplicate(&mut self, key: K) -> K {
        key
    }
}

impl<K> Release<K> for NoRelease {
    fn release(&mut self, _key: K) {}
}

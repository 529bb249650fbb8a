//! Internal insertion implementation, and the [`Insertion`] result type

use crate::public_traits::{Compare, Duplicate, Release};
use crate::{AllocError, AvlTree};
use std::cmp::Ordering;
use std::mem;

use super::balance::rebalance;
use super::node::{Node, NodeId};

/// Outcome of [`AvlTree::insert`]
///
/// If the key was already present, the previous value is always made available: by value if it
/// was replaced, or by reference if it was kept.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a rejected insertion hands back the value that wasn't stored"]
pub enum Insertion<'t, V> {
    /// The key wasn't present before, and has been added with the new value
    Inserted,
    /// The key was already present, and its value has been replaced. This is the old value.
    Replaced(V),
    /// The key was already present, and the insertion was made without overwriting, so the stored
    /// value was left unchanged
    Rejected {
        /// The value that's still stored with the key
        existing: &'t mut V,
        /// The value that was provided to `insert`, handed back
        value: V,
    },
}

impl<'t, V> Insertion<'t, V> {
    /// Returns `true` if the key wasn't present before the insertion
    pub fn is_new(&self) -> bool {
        matches!(self, Insertion::Inserted)
    }

    /// Returns `true` if the provided value is now stored in the tree -- i.e. it was either newly
    /// inserted or replaced an existing value
    pub fn is_stored(&self) -> bool {
        !matches!(self, Insertion::Rejected { .. })
    }

    /// Returns the value that was stored with the key before the insertion, if there was one
    pub fn previous(&self) -> Option<&V> {
        match self {
            Insertion::Inserted => None,
            Insertion::Replaced(old) => Some(old),
            Insertion::Rejected { existing, .. } => Some(existing),
        }
    }
}

/// (*Internal*) What happened in the subtree below a particular call to `insert_at`
enum Step<V> {
    /// A new node was created; heights along the path may have changed
    Created,
    Replaced(V),
    Rejected(NodeId, V),
}

impl<K, V, C, D, R> AvlTree<K, V, C, D, R>
where
    C: Compare<K>,
    D: Duplicate<K>,
    R: Release<K>,
{
    /// Inserts the key and value into the tree, returning an error if allocation fails
    ///
    /// If there's no existing key equal to `key`, it's passed through the tree's [`Duplicate`]
    /// strategy and stored alongside `value`, producing [`Insertion::Inserted`].
    ///
    /// Otherwise, the stored key is left alone and `key` is dropped. With `overwrite`, the stored
    /// value is replaced by `value` ([`Insertion::Replaced`]); without it, the stored value is
    /// kept and `value` is handed back ([`Insertion::Rejected`]).
    ///
    /// ## Errors
    ///
    /// Allocation is only attempted when a new entry would be added. If it fails, the tree is left
    /// exactly as it was, and neither `key` nor `value` are passed to any of the strategies.
    pub fn try_insert(
        &mut self,
        key: K,
        value: V,
        overwrite: bool,
    ) -> Result<Insertion<'_, V>, AllocError> {
        let (root, step) = self.insert_at(self.root, key, value, overwrite)?;
        self.root = Some(root);

        Ok(match step {
            Step::Created => Insertion::Inserted,
            Step::Replaced(old) => Insertion::Replaced(old),
            Step::Rejected(id, value) => Insertion::Rejected {
                existing: &mut self.nodes.get_mut(id).value,
                value,
            },
        })
    }

    /// Inserts the key and value into the tree
    ///
    /// This is identical to [`try_insert`], except that allocation failure panics instead of
    /// returning an error.
    ///
    /// ```
    /// use avltree::{AvlTree, Insertion};
    ///
    /// let mut tree = AvlTree::new();
    /// assert_eq!(tree.insert(1, 'a', false), Insertion::Inserted);
    /// assert_eq!(tree.insert(1, 'b', true), Insertion::Replaced('a'));
    /// assert_eq!(
    ///     tree.insert(1, 'c', false),
    ///     Insertion::Rejected { existing: &mut 'b', value: 'c' },
    /// );
    /// ```
    ///
    /// ## Panics
    ///
    /// This method panics if space for a new node cannot be allocated.
    ///
    /// [`try_insert`]: Self::try_insert
    pub fn insert(&mut self, key: K, value: V, overwrite: bool) -> Insertion<'_, V> {
        match self.try_insert(key, value, overwrite) {
            Ok(insertion) => insertion,
            Err(e) => panic!("{e}"),
        }
    }

    /// (*Internal*) Recursive insertion into the subtree rooted at `slot`, returning the new root
    /// of the subtree
    ///
    /// Nothing is modified until the recursion has found where the key belongs, so an error from
    /// the bottom leaves every level untouched.
    fn insert_at(
        &mut self,
        slot: Option<NodeId>,
        key: K,
        value: V,
        overwrite: bool,
    ) -> Result<(NodeId, Step<V>), AllocError> {
        let id = match slot {
            Some(id) => id,
            None => {
                self.nodes.try_reserve_slot()?;
                let key = self.duplicate.duplicate(key);
                let id = self.nodes.try_push(Node::leaf(key, value))?;
                self.size += 1;
                debug_println!("insert: new node {id:?}");
                return Ok((id, Step::Created));
            }
        };

        let (ord, left, right) = {
            let node = self.nodes.get(id);
            (self.compare.compare(&key, &node.key), node.left, node.right)
        };

        let step = match ord {
            Ordering::Equal if overwrite => {
                let old = mem::replace(&mut self.nodes.get_mut(id).value, value);
                return Ok((id, Step::Replaced(old)));
            }
            Ordering::Equal => return Ok((id, Step::Rejected(id, value))),
            Ordering::Less => {
                let (child, step) = self.insert_at(left, key, value, overwrite)?;
                self.nodes.get_mut(id).left = Some(child);
                step
            }
            Ordering::Greater => {
                let (child, step) = self.insert_at(right, key, value, overwrite)?;
                self.nodes.get_mut(id).right = Some(child);
                step
            }
        };

        // Only a new node changes the shape of the tree
        match step {
            Step::Created => Ok((rebalance(&mut self.nodes, id), step)),
            _ => Ok((id, step)),
        }
    }
}

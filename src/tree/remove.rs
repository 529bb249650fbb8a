//! Internal removal implementation
//!
//! Removal happens in two phases: first the entry is unlinked and the tree rebalanced on the way
//! back up to the root, and only then is the removed key handed to the [`Release`] strategy. This
//! means a panicking strategy can never observe (or leave behind) a tree that's out of balance.

use crate::public_traits::{Compare, Duplicate, Release};
use crate::AvlTree;
use std::cmp::Ordering;
use std::mem;

use super::balance::rebalance;
use super::node::{Arena, NodeId};

impl<K, V, C, D, R> AvlTree<K, V, C, D, R>
where
    C: Compare<K>,
    D: Duplicate<K>,
    R: Release<K>,
{
    /// Removes the entry with a key equal to `key`, returning its value
    ///
    /// The stored key is passed to the tree's [`Release`] strategy. If there's no such entry, the
    /// tree is unchanged and `None` is returned.
    ///
    /// ```
    /// use avltree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert!(tree.insert(5, "five", false).is_new());
    /// assert_eq!(tree.erase(&5), Some("five"));
    /// assert_eq!(tree.erase(&5), None);
    /// assert!(tree.is_empty());
    /// ```
    pub fn erase(&mut self, key: &K) -> Option<V> {
        let root = self.root?;
        let (new_root, removed) = self.erase_at(root, key);
        self.root = new_root;

        let (stored_key, value) = removed?;
        self.size -= 1;
        self.release.release(stored_key);
        Some(value)
    }

    /// (*Internal*) Recursive removal from the subtree rooted at `id`, returning the new root of
    /// the subtree alongside the removed key and value, if any
    fn erase_at(&mut self, id: NodeId, key: &K) -> (Option<NodeId>, Option<(K, V)>) {
        let (ord, left, right) = {
            let node = self.nodes.get(id);
            (self.compare.compare(key, &node.key), node.left, node.right)
        };

        match ord {
            Ordering::Less => {
                let Some(left) = left else {
                    return (Some(id), None);
                };
                let (new_left, removed) = self.erase_at(left, key);
                self.nodes.get_mut(id).left = new_left;
                match removed {
                    Some(_) => (Some(rebalance(&mut self.nodes, id)), removed),
                    None => (Some(id), None),
                }
            }
            Ordering::Greater => {
                let Some(right) = right else {
                    return (Some(id), None);
                };
                let (new_right, removed) = self.erase_at(right, key);
                self.nodes.get_mut(id).right = new_right;
                match removed {
                    Some(_) => (Some(rebalance(&mut self.nodes, id)), removed),
                    None => (Some(id), None),
                }
            }
            Ordering::Equal => match (left, right) {
                (Some(_), Some(right)) => {
                    // Two children: the in-order successor takes this node's place, without
                    // moving this node at all.
                    let (new_right, successor) = remove_min(&mut self.nodes, right);
                    let successor = self.nodes.recycle(successor);
                    debug_println!("erase: {id:?} replaced by its successor");

                    let node = self.nodes.get_mut(id);
                    node.right = new_right;
                    let old_key = mem::replace(&mut node.key, successor.key);
                    let old_value = mem::replace(&mut node.value, successor.value);

                    let new_root = rebalance(&mut self.nodes, id);
                    (Some(new_root), Some((old_key, old_value)))
                }
                (child, None) | (None, child) => {
                    debug_println!("erase: {id:?} replaced by {child:?}");
                    let node = self.nodes.recycle(id);
                    (child, Some((node.key, node.value)))
                }
            },
        }
    }
}

/// (*Internal*) Unlinks the leftmost node of the subtree, rebalancing the path to it
///
/// Returns the new root of the subtree, alongside the unlinked node. The unlinked node is left in
/// the arena, with no children, for the caller to recycle.
fn remove_min<K, V>(nodes: &mut Arena<K, V>, id: NodeId) -> (Option<NodeId>, NodeId) {
    let node = nodes.get_mut(id);
    match node.left {
        Some(left) => {
            let (new_left, min) = remove_min(nodes, left);
            nodes.get_mut(id).left = new_left;
            (Some(rebalance(nodes, id)), min)
        }
        None => (node.right.take(), id),
    }
}

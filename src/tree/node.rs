//! Node type and height bookkeeping
//!
//! Nodes don't own their children directly; every node lives in the tree's [`Arena`], and child
//! links are [`NodeId`]s into it. This keeps rotations down to a handful of index swaps, and means
//! a subtree can always be referred to by a plain `Copy` handle.

use crate::recycle::{RecycleVec, SlotId};

/// Handle to a node stored in an [`Arena`]
pub(crate) type NodeId = SlotId;

/// Storage for all of the nodes in a single tree
pub(crate) type Arena<K, V> = RecycleVec<Node<K, V>>;

/// Height of the empty subtree
///
/// Leaves have height zero, so that `height = 1 + max(left, right)` holds everywhere.
pub(crate) const EMPTY_HEIGHT: i32 = -1;

pub(crate) struct Node<K, V> {
    pub key: K,
    pub value: V,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    /// Cached height of the subtree rooted at this node
    pub height: i32,
}

impl<K, V> Node<K, V> {
    /// Creates a new node with no children
    pub fn leaf(key: K, value: V) -> Self {
        Node {
            key,
            value,
            left: None,
            right: None,
            height: 0,
        }
    }
}

/// Returns the cached height of the subtree, or [`EMPTY_HEIGHT`] if there isn't one
pub(crate) fn height<K, V>(nodes: &Arena<K, V>, subtree: Option<NodeId>) -> i32 {
    match subtree {
        Some(id) => nodes.get(id).height,
        None => EMPTY_HEIGHT,
    }
}

/// Returns `height(left) - height(right)` for the node
///
/// Positive values mean the node is left-heavy. The AVL invariant is that this is always within
/// `-1..=1` once an operation completes.
pub(crate) fn balance_factor<K, V>(nodes: &Arena<K, V>, id: NodeId) -> i32 {
    let node = nodes.get(id);
    height(nodes, node.left) - height(nodes, node.right)
}

/// Recomputes the cached height of the node from the cached heights of its children
pub(crate) fn update_height<K, V>(nodes: &mut Arena<K, V>, id: NodeId) {
    let node = nodes.get(id);
    let h = 1 + height(nodes, node.left).max(height(nodes, node.right));
    nodes.get_mut(id).height = h;
}

//! Rotations, and the rebalancing step that runs after every structural change
//!
//! Everything here operates on a single subtree and returns the (possibly new) root of that
//! subtree; it's up to the caller to store the result wherever the old root was linked from.
//! Nothing here looks further up the tree: insertion and removal call [`rebalance`] at each level
//! on their way back to the root, which is enough to restore the AVL invariant after a single
//! insertion or removal.

use super::node::{balance_factor, update_height, Arena, NodeId};

/// Rotates the subtree left, promoting the right child to the root
///
/// ```text
///     a                 b
///    / \               / \
///   x   b      =>     a   z
///      / \           / \
///     y   z         x   y
/// ```
///
/// ## Panics
///
/// Panics if the node has no right child.
pub(super) fn rotate_left<K, V>(nodes: &mut Arena<K, V>, a: NodeId) -> NodeId {
    let Some(b) = nodes.get(a).right else {
        panic!("cannot rotate {a:?} left without a right child");
    };

    debug_println!("rotate left: {a:?} -> {b:?}");

    let y = nodes.get(b).left;
    nodes.get_mut(a).right = y;
    nodes.get_mut(b).left = Some(a);

    // `a` is now below `b`, so it has to be updated first
    update_height(nodes, a);
    update_height(nodes, b);
    b
}

/// Rotates the subtree right, promoting the left child to the root
///
/// ```text
///       a             b
///      / \           / \
///     b   z   =>    x   a
///    / \               / \
///   x   y             y   z
/// ```
///
/// ## Panics
///
/// Panics if the node has no left child.
pub(super) fn rotate_right<K, V>(nodes: &mut Arena<K, V>, a: NodeId) -> NodeId {
    let Some(b) = nodes.get(a).left else {
        panic!("cannot rotate {a:?} right without a left child");
    };

    debug_println!("rotate right: {a:?} -> {b:?}");

    let y = nodes.get(b).right;
    nodes.get_mut(a).left = y;
    nodes.get_mut(b).right = Some(a);

    update_height(nodes, a);
    update_height(nodes, b);
    b
}

/// Refreshes the node's height and, if its children differ in height by more than one, rotates to
/// fix it
///
/// The children must themselves already satisfy the AVL invariant, with correct cached heights.
/// Returns the new root of the subtree.
pub(super) fn rebalance<K, V>(nodes: &mut Arena<K, V>, id: NodeId) -> NodeId {
    update_height(nodes, id);

    match balance_factor(nodes, id) {
        2.. => {
            let Some(left) = nodes.get(id).left else {
                unreachable!("left-heavy node {id:?} has no left child");
            };
            // left-right case: straighten out the left child first
            if balance_factor(nodes, left) < 0 {
                let new_left = rotate_left(nodes, left);
                nodes.get_mut(id).left = Some(new_left);
            }
            rotate_right(nodes, id)
        }
        ..=-2 => {
            let Some(right) = nodes.get(id).right else {
                unreachable!("right-heavy node {id:?} has no right child");
            };
            // right-left case
            if balance_factor(nodes, right) > 0 {
                let new_right = rotate_right(nodes, right);
                nodes.get_mut(id).right = Some(new_right);
            }
            rotate_left(nodes, id)
        }
        _ => id,
    }
}
